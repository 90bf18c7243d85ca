use crate::core::member::{Member, MemberId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One member's share of an expense.
///
/// Shares need not be equal across an expense, and the engine does not
/// require them to sum to the expense amount; a mismatch surfaces as an
/// imbalance warning after aggregation instead of being rejected up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub member: MemberId,
    pub share: Decimal,
}

impl Split {
    pub fn new(member: MemberId, share: Decimal) -> Self {
        Self { member, share }
    }
}

/// A recorded purchase paid by one member on behalf of the group.
///
/// An expense either carries explicit [`Split`]s or none at all; in the
/// latter case its amount is divided equally across every current group
/// member.
///
/// Expenses are immutable once created.
///
/// # Examples
///
/// ```
/// use splitledger::core::member::MemberId;
/// use splitledger::core::record::Expense;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(MemberId::new("usr-alice"), dec!(90))
///     .with_description("Dinner at the harbor");
///
/// assert_eq!(dinner.amount(), dec!(90));
/// assert!(!dinner.has_explicit_splits());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    id: Uuid,
    /// The member who paid the full amount.
    payer: MemberId,
    /// The amount paid. Must be positive.
    amount: Decimal,
    /// Explicit shares. Empty means equal split across the group.
    splits: Vec<Split>,
    /// When this expense was recorded.
    created_at: DateTime<Utc>,
    /// Optional free-text description.
    description: Option<String>,
}

impl Expense {
    /// Create a new expense with no explicit splits (equal-split fallback).
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn new(payer: MemberId, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Expense amount must be positive, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            payer,
            amount,
            splits: Vec::new(),
            created_at: Utc::now(),
            description: None,
        }
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, payer: MemberId, amount: Decimal) -> Self {
        assert!(amount > Decimal::ZERO);
        Self {
            id,
            payer,
            amount,
            splits: Vec::new(),
            created_at: Utc::now(),
            description: None,
        }
    }

    /// Attach explicit splits, replacing any previous ones.
    pub fn with_splits(mut self, splits: Vec<Split>) -> Self {
        self.splits = splits;
        self
    }

    /// Append a single explicit split.
    pub fn with_split(mut self, member: MemberId, share: Decimal) -> Self {
        self.splits.push(Split::new(member, share));
        self
    }

    /// Set a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// True when the expense carries explicit shares; false triggers the
    /// equal-split fallback during aggregation.
    pub fn has_explicit_splits(&self) -> bool {
        !self.splits.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A recorded real-world payment between two members.
///
/// Represents debt already discharged outside any computed plan: the payer's
/// prior debt shrinks by the amount, the payee's prior credit shrinks by the
/// same amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for this payment.
    id: Uuid,
    /// The member who handed over the money.
    from: MemberId,
    /// The member who received it.
    to: MemberId,
    /// The amount paid. Must be positive.
    amount: Decimal,
    /// When this payment was recorded.
    created_at: DateTime<Utc>,
    /// Optional note.
    note: Option<String>,
}

impl Payment {
    /// Create a new payment.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn new(from: MemberId, to: MemberId, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Payment amount must be positive, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            created_at: Utc::now(),
            note: None,
        }
    }

    /// Create a payment with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, from: MemberId, to: MemberId, amount: Decimal) -> Self {
        assert!(amount > Decimal::ZERO);
        Self {
            id,
            from,
            to,
            amount,
            created_at: Utc::now(),
            note: None,
        }
    }

    /// Set a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn from(&self) -> &MemberId {
        &self.from
    }

    pub fn to(&self) -> &MemberId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// A fully materialized view of one group's ledger.
///
/// This is the engine's sole input: the surrounding application retrieves
/// members, expenses and payments however it likes and hands them over as a
/// plain value. The engine holds no connection, cache, or other implicit
/// state of its own.
///
/// Member order is preserved as given; reports and equal-split edges follow
/// it, which keeps output deterministic for a given snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    members: Vec<Member>,
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
}

impl GroupSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn add_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.expenses.is_empty() && self.payments.is_empty()
    }

    /// True when `id` belongs to one of the group's members.
    pub fn contains_member(&self, id: &MemberId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    /// Display name for a member, if present.
    pub fn member_name(&self, id: &MemberId) -> Option<&str> {
        self.members
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m.name.as_str())
    }

    /// Gross total of all expenses.
    pub fn total_expenses(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// Gross total of all recorded payments.
    pub fn total_payments(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount()).sum()
    }
}
