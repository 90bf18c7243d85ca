use crate::core::balance::BalanceSheet;
use crate::core::member::MemberId;
use crate::core::record::GroupSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Fatal precondition violations during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An equal-split expense cannot be divided across zero members.
    #[error("cannot split expense {expense_id} equally across an empty group")]
    EmptyGroup { expense_id: Uuid },
}

/// Data-consistency anomalies detected during aggregation.
///
/// Warnings accompany a best-effort result; they never abort the
/// computation. Each one is also emitted through the `log` facade.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum LedgerWarning {
    /// A split references someone outside the group; its share was skipped.
    #[error("expense {expense_id}: split for unknown member {member} ({share}) skipped")]
    OrphanSplit {
        expense_id: Uuid,
        member: MemberId,
        share: Decimal,
    },
    /// An expense's payer is not in the group; the credit was skipped.
    #[error("expense {expense_id}: payer {payer} is not a group member, credit of {amount} skipped")]
    OrphanPayer {
        expense_id: Uuid,
        payer: MemberId,
        amount: Decimal,
    },
    /// A payment references someone outside the group; that side was skipped.
    #[error("payment {payment_id}: unknown member {member} skipped")]
    OrphanPayment { payment_id: Uuid, member: MemberId },
    /// Balances do not sum to zero beyond the rounding epsilon.
    #[error("balances do not sum to zero (residual {residual}); upstream records are inconsistent")]
    Imbalance { residual: Decimal },
}

/// One member's presentation-ready net position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: MemberId,
    pub name: String,
    /// Net balance rounded to 2 decimal places.
    pub balance: Decimal,
}

/// Answer to a balance query: group totals plus one rounded balance
/// per member, in member order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub total_expenses: Decimal,
    pub per_person_share: Decimal,
    pub balances: Vec<MemberBalance>,
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Group Balances ===")?;
        writeln!(f, "Total expenses:   {}", self.total_expenses)?;
        writeln!(f, "Per-person share: {}", self.per_person_share)?;
        for b in &self.balances {
            let status = if b.balance > Decimal::ZERO {
                "gets back"
            } else if b.balance < Decimal::ZERO {
                "owes"
            } else {
                "settled up"
            };
            writeln!(f, "  {:<20} {} {}", b.name, status, b.balance.abs())?;
        }
        Ok(())
    }
}

/// Outcome of folding a group's records into net positions.
///
/// Holds full-precision balances; rounding to 2 decimal places happens only
/// when a [`BalanceReport`] is produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    sheet: BalanceSheet,
    total_expenses: Decimal,
    warnings: Vec<LedgerWarning>,
}

impl Aggregation {
    /// The full-precision balance sheet.
    pub fn sheet(&self) -> &BalanceSheet {
        &self.sheet
    }

    /// Gross total of all expenses in the snapshot.
    pub fn total_expenses(&self) -> Decimal {
        self.total_expenses
    }

    /// Anomalies detected during the fold.
    pub fn warnings(&self) -> &[LedgerWarning] {
        &self.warnings
    }

    /// True when no anomalies were detected.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Presentation mapping: rounded balances with display names, in the
    /// snapshot's member order.
    pub fn report(&self, snapshot: &GroupSnapshot) -> BalanceReport {
        let member_count = snapshot.member_count();
        let per_person_share = if member_count == 0 {
            Decimal::ZERO
        } else {
            (self.total_expenses / Decimal::from(member_count)).round_dp(2)
        };

        let balances = snapshot
            .members()
            .iter()
            .map(|m| MemberBalance {
                member: m.id.clone(),
                name: m.name.clone(),
                balance: self.sheet.balance(&m.id).round_dp(2),
            })
            .collect();

        BalanceReport {
            total_expenses: self.total_expenses.round_dp(2),
            per_person_share,
            balances,
        }
    }
}

/// The balance aggregation engine.
///
/// One fold from snapshot to net positions; balance, settlement and graph
/// queries all consume this single computation and apply only their own
/// presentation mapping on top.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Rounding epsilon for the zero-sum check: one cent per member.
    fn epsilon(member_count: usize) -> Decimal {
        Decimal::new(1, 2) * Decimal::from(member_count.max(1))
    }

    /// Fold every expense and payment into one net balance per member.
    ///
    /// # Algorithm
    ///
    /// 1. Every member starts at zero.
    /// 2. Per expense: debit each explicit split's member by its share, or,
    ///    when no explicit splits exist, debit every member an equal share;
    ///    then credit the payer the full amount. Expense order is irrelevant.
    /// 3. Per payment: credit the payer, debit the payee.
    /// 4. Accumulation stays at full decimal precision; consumers round.
    ///
    /// Splits, payers, or payment parties outside the member set are skipped
    /// with a warning. A non-zero residual beyond one cent per member yields
    /// an [`LedgerWarning::Imbalance`].
    pub fn aggregate(snapshot: &GroupSnapshot) -> Result<Aggregation, LedgerError> {
        let mut sheet = BalanceSheet::new();
        let mut warnings = Vec::new();
        let member_count = snapshot.member_count();

        for member in snapshot.members() {
            sheet.ensure_member(member.id.clone());
        }

        let mut total_expenses = Decimal::ZERO;

        for expense in snapshot.expenses() {
            total_expenses += expense.amount();

            if expense.has_explicit_splits() {
                for split in expense.splits() {
                    if sheet.contains(&split.member) {
                        sheet.debit(&split.member, split.share);
                        sheet.add_spent(&split.member, split.share);
                    } else {
                        log::warn!(
                            "expense {}: split for unknown member {} skipped",
                            expense.id(),
                            split.member
                        );
                        warnings.push(LedgerWarning::OrphanSplit {
                            expense_id: expense.id(),
                            member: split.member.clone(),
                            share: split.share,
                        });
                    }
                }
            } else {
                if member_count == 0 {
                    return Err(LedgerError::EmptyGroup {
                        expense_id: expense.id(),
                    });
                }
                let share = expense.amount() / Decimal::from(member_count);
                for member in snapshot.members() {
                    sheet.debit(&member.id, share);
                    sheet.add_spent(&member.id, share);
                }
            }

            if sheet.contains(expense.payer()) {
                sheet.credit(expense.payer(), expense.amount());
            } else {
                log::warn!(
                    "expense {}: payer {} is not a group member",
                    expense.id(),
                    expense.payer()
                );
                warnings.push(LedgerWarning::OrphanPayer {
                    expense_id: expense.id(),
                    payer: expense.payer().clone(),
                    amount: expense.amount(),
                });
            }
        }

        for payment in snapshot.payments() {
            if sheet.contains(payment.from()) {
                sheet.credit(payment.from(), payment.amount());
            } else {
                log::warn!(
                    "payment {}: unknown payer {} skipped",
                    payment.id(),
                    payment.from()
                );
                warnings.push(LedgerWarning::OrphanPayment {
                    payment_id: payment.id(),
                    member: payment.from().clone(),
                });
            }
            if sheet.contains(payment.to()) {
                sheet.debit(payment.to(), payment.amount());
            } else {
                log::warn!(
                    "payment {}: unknown payee {} skipped",
                    payment.id(),
                    payment.to()
                );
                warnings.push(LedgerWarning::OrphanPayment {
                    payment_id: payment.id(),
                    member: payment.to().clone(),
                });
            }
        }

        let residual = sheet.residual();
        if residual.abs() > Self::epsilon(member_count) {
            log::warn!("group balances do not sum to zero: residual {}", residual);
            warnings.push(LedgerWarning::Imbalance { residual });
        }

        Ok(Aggregation {
            sheet,
            total_expenses,
            warnings,
        })
    }
}
