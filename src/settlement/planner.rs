use crate::core::member::MemberId;
use crate::settlement::aggregate::MemberBalance;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One payment instruction produced by the planner: `from` pays `to`
/// exactly `amount`. Amounts are always positive, rounded to 2 decimal
/// places. Instructions are never stored; they are recomputed from the
/// full history on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub from: MemberId,
    pub to: MemberId,
    pub from_name: String,
    pub to_name: String,
    pub amount: Decimal,
}

/// The shortest list of transactions that zeroes a group's balances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    transactions: Vec<SettlementTransaction>,
    /// Balance left unmatched when the input did not sum to zero.
    /// Positive = credit nobody owes, negative = debt nobody collects.
    residual: Decimal,
}

impl SettlementPlan {
    pub fn transactions(&self) -> &[SettlementTransaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Unmatched remainder. Zero whenever the input balances summed to zero
    /// after rounding to cents.
    pub fn residual(&self) -> Decimal {
        self.residual
    }

    /// Total amount moved by the plan.
    pub fn total_transferred(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

impl fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement Plan ===")?;
        if self.transactions.is_empty() {
            writeln!(f, "Everyone is settled up. No transactions required.")?;
        } else {
            for t in &self.transactions {
                writeln!(f, "  {} pays {} to {}", t.from_name, t.amount, t.to_name)?;
            }
            writeln!(f, "Transactions:      {}", self.len())?;
            writeln!(f, "Total transferred: {}", self.total_transferred())?;
        }
        if self.residual != Decimal::ZERO {
            writeln!(f, "Unmatched residual: {}", self.residual)?;
        }
        Ok(())
    }
}

/// Remaining position of one member during matching, in integer cents.
struct Cursor {
    member: MemberId,
    name: String,
    remaining: i64,
}

/// The settlement planning engine.
///
/// Collapses net balances into a minimum-cardinality transaction list using
/// greedy largest-first matching. All matching arithmetic runs in integer
/// minor units (cents); decimal amounts appear only at the boundary.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Compute the settlement plan for a set of member balances.
    ///
    /// # Algorithm
    ///
    /// 1. Round every balance to integer cents.
    /// 2. Partition into creditors (> 0) and debtors (< 0); sort both by
    ///    magnitude, largest first. Ties keep input order (stable sort).
    /// 3. Walk both lists with one cursor each, transferring
    ///    `min(credit, |debt|)` per step and advancing whichever cursor
    ///    reaches exactly zero.
    ///
    /// Emits at most `creditors + debtors - 1` transactions. An input that
    /// does not sum to zero leaves a remainder on one side, reported via
    /// [`SettlementPlan::residual`] rather than dropped.
    pub fn plan(balances: &[MemberBalance]) -> SettlementPlan {
        let mut creditors: Vec<Cursor> = balances
            .iter()
            .filter_map(|b| match to_minor_units(b.balance) {
                cents if cents > 0 => Some(Cursor {
                    member: b.member.clone(),
                    name: b.name.clone(),
                    remaining: cents,
                }),
                _ => None,
            })
            .collect();
        let mut debtors: Vec<Cursor> = balances
            .iter()
            .filter_map(|b| match to_minor_units(b.balance) {
                cents if cents < 0 => Some(Cursor {
                    member: b.member.clone(),
                    name: b.name.clone(),
                    remaining: cents,
                }),
                _ => None,
            })
            .collect();

        // Largest credit first; most negative debt first.
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| a.remaining.cmp(&b.remaining));

        let mut transactions = Vec::new();
        let mut i = 0;
        let mut j = 0;

        while i < creditors.len() && j < debtors.len() {
            let amount = creditors[i].remaining.min(-debtors[j].remaining);

            if amount > 0 {
                transactions.push(SettlementTransaction {
                    from: debtors[j].member.clone(),
                    to: creditors[i].member.clone(),
                    from_name: debtors[j].name.clone(),
                    to_name: creditors[i].name.clone(),
                    amount: to_major_units(amount),
                });
            }

            creditors[i].remaining -= amount;
            debtors[j].remaining += amount;

            if creditors[i].remaining == 0 {
                i += 1;
            }
            if debtors[j].remaining == 0 {
                j += 1;
            }
        }

        let leftover: i64 = creditors[i..]
            .iter()
            .chain(debtors[j..].iter())
            .map(|c| c.remaining)
            .sum();
        if leftover != 0 {
            log::debug!("settlement left {} cents unmatched", leftover);
        }

        SettlementPlan {
            transactions,
            residual: to_major_units(leftover),
        }
    }
}

/// Round a decimal amount to integer cents.
fn to_minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp(0)
        .to_i64()
        .unwrap_or(0)
}

/// Convert integer cents back to a 2-decimal-place amount.
fn to_major_units(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
