//! Random group generation for stress testing.
//!
//! Produces internally consistent groups (itemized splits always sum to
//! their expense amount, to the cent), so generated data exercises the
//! engine without tripping imbalance warnings.

use crate::core::member::{Member, MemberId};
use crate::core::record::{Expense, GroupSnapshot, Payment, Split};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Number of recorded payments to generate.
    pub payment_count: usize,
    /// Fraction of expenses that carry explicit itemized splits; the rest
    /// fall back to equal splitting.
    pub itemized_ratio: f64,
    /// Minimum expense amount in cents.
    pub min_amount_cents: i64,
    /// Maximum expense amount in cents.
    pub max_amount_cents: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            member_count: 5,
            expense_count: 20,
            payment_count: 3,
            itemized_ratio: 0.5,
            min_amount_cents: 100,
            max_amount_cents: 50_000,
        }
    }
}

/// Generate a random group snapshot for testing.
pub fn generate_random_group(config: &GroupConfig) -> GroupSnapshot {
    let mut rng = rand::thread_rng();
    let mut group = GroupSnapshot::new();

    let members: Vec<MemberId> = (0..config.member_count)
        .map(|i| MemberId::new(format!("usr-{:03}", i)))
        .collect();
    for (i, id) in members.iter().enumerate() {
        group.add_member(Member::new(id.as_str(), format!("Member {:03}", i)));
    }

    if members.is_empty() {
        return group;
    }

    for _ in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].clone();
        let cents = rng.gen_range(config.min_amount_cents..=config.max_amount_cents);
        let amount = Decimal::new(cents, 2);

        let mut expense = Expense::new(payer, amount);
        if rng.gen_bool(config.itemized_ratio) {
            let participant_count = rng.gen_range(1..=members.len());
            let mut participants = members.clone();
            for k in 0..participant_count {
                let swap = rng.gen_range(k..members.len());
                participants.swap(k, swap);
            }
            participants.truncate(participant_count);

            let splits = participants
                .into_iter()
                .zip(split_exact(cents, participant_count))
                .map(|(member, share)| Split::new(member, Decimal::new(share, 2)))
                .collect();
            expense = expense.with_splits(splits);
        }
        group.add_expense(expense);
    }

    for _ in 0..config.payment_count {
        if members.len() < 2 {
            break;
        }
        let from_idx = rng.gen_range(0..members.len());
        let mut to_idx = rng.gen_range(0..members.len());
        while to_idx == from_idx {
            to_idx = rng.gen_range(0..members.len());
        }
        let cents = rng.gen_range(config.min_amount_cents..=config.max_amount_cents);
        group.add_payment(Payment::new(
            members[from_idx].clone(),
            members[to_idx].clone(),
            Decimal::new(cents, 2),
        ));
    }

    group
}

/// Divide `cents` into `n` integer shares that sum exactly to `cents`.
fn split_exact(cents: i64, n: usize) -> Vec<i64> {
    let n = n as i64;
    let base = cents / n;
    let remainder = cents % n;
    (0..n).map(|i| base + i64::from(i < remainder)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::aggregate::BalanceEngine;
    use crate::settlement::planner::SettlementPlanner;
    use rust_decimal_macros::dec;

    #[test]
    fn test_split_exact_sums() {
        for cents in [1, 99, 100, 101, 12_345] {
            for n in 1..=6 {
                let shares = split_exact(cents, n);
                assert_eq!(shares.len(), n);
                assert_eq!(shares.iter().sum::<i64>(), cents);
            }
        }
    }

    #[test]
    fn test_generated_group_shape() {
        let config = GroupConfig {
            member_count: 6,
            expense_count: 15,
            payment_count: 4,
            ..Default::default()
        };

        let group = generate_random_group(&config);
        assert_eq!(group.member_count(), 6);
        assert_eq!(group.expense_count(), 15);
        assert_eq!(group.payment_count(), 4);
    }

    #[test]
    fn test_generated_group_is_consistent() {
        let group = generate_random_group(&GroupConfig::default());

        let agg = BalanceEngine::aggregate(&group).unwrap();
        assert!(agg.is_clean(), "generated data must not warn: {:?}", agg.warnings());
        assert!(agg.sheet().residual().abs() <= dec!(0.01));

        let report = agg.report(&group);
        let plan = SettlementPlanner::plan(&report.balances);
        assert!(plan.len() < group.member_count().max(1));
    }
}
