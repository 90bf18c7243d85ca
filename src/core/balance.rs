use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net position of every member in a group.
///
/// A positive balance means the member is owed money (net creditor).
/// A negative balance means the member owes money (net debtor).
///
/// Alongside the net position, the sheet tracks how much each member has
/// consumed across all splits, independent of who paid. Visualization
/// consumers use that total for node sizing.
///
/// A sheet is derived fresh from a snapshot on every query and is never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// MemberId -> net balance. Positive = creditor, negative = debtor.
    balances: HashMap<MemberId, Decimal>,
    /// MemberId -> total consumed across all splits.
    spent: HashMap<MemberId, Decimal>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member at zero balance and zero spend.
    pub fn ensure_member(&mut self, member: MemberId) {
        self.balances.entry(member.clone()).or_insert(Decimal::ZERO);
        self.spent.entry(member).or_insert(Decimal::ZERO);
    }

    /// True when the member has been registered on this sheet.
    pub fn contains(&self, member: &MemberId) -> bool {
        self.balances.contains_key(member)
    }

    /// Increase a member's net position.
    pub fn credit(&mut self, member: &MemberId, amount: Decimal) {
        *self.balances.entry(member.clone()).or_insert(Decimal::ZERO) += amount;
    }

    /// Decrease a member's net position.
    pub fn debit(&mut self, member: &MemberId, amount: Decimal) {
        *self.balances.entry(member.clone()).or_insert(Decimal::ZERO) -= amount;
    }

    /// Add to a member's total-spent accumulator.
    pub fn add_spent(&mut self, member: &MemberId, amount: Decimal) {
        *self.spent.entry(member.clone()).or_insert(Decimal::ZERO) += amount;
    }

    /// Net position of a member. Unregistered members read as zero.
    pub fn balance(&self, member: &MemberId) -> Decimal {
        self.balances.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total consumed by a member across all splits.
    pub fn spent(&self, member: &MemberId) -> Decimal {
        self.spent.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    /// All net positions.
    pub fn balances(&self) -> &HashMap<MemberId, Decimal> {
        &self.balances
    }

    /// Sum of all net positions. Zero for consistent input.
    pub fn residual(&self) -> Decimal {
        self.balances.values().sum()
    }

    /// Verify the sheet balances to zero within `epsilon`.
    pub fn is_balanced(&self, epsilon: Decimal) -> bool {
        self.residual().abs() <= epsilon
    }

    /// Total amount that still needs to move: the sum of positive positions
    /// (equal to the sum of |negative| positions when the sheet balances).
    pub fn total_outstanding(&self) -> Decimal {
        self.balances
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }
}
