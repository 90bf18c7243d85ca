use crate::core::member::MemberId;
use crate::core::record::GroupSnapshot;
use crate::settlement::aggregate::{Aggregation, BalanceEngine, LedgerError};
use crate::settlement::planner::{SettlementPlan, SettlementPlanner};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node per member, carrying its net balance and the total it has
/// consumed across all splits (used by visualization consumers for sizing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtNode {
    pub id: MemberId,
    pub name: String,
    pub balance: Decimal,
    pub total_spent: Decimal,
}

/// A directed debt edge: `from` owes (or paid) `to` the given amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtEdge {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

/// Two alternate edge sets over the same member nodes.
///
/// The raw set preserves causality: one edge per original split (split
/// member → payer) and per recorded payment (payer → payee). The optimized
/// set is the settlement plan: one edge per planned transaction
/// (debtor → creditor). Self-edges never appear in either set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtGraph {
    nodes: Vec<DebtNode>,
    raw_edges: Vec<DebtEdge>,
    optimized_edges: Vec<DebtEdge>,
}

impl DebtGraph {
    pub fn nodes(&self) -> &[DebtNode] {
        &self.nodes
    }

    pub fn raw_edges(&self) -> &[DebtEdge] {
        &self.raw_edges
    }

    pub fn optimized_edges(&self) -> &[DebtEdge] {
        &self.optimized_edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn raw_edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    pub fn optimized_edge_count(&self) -> usize {
        self.optimized_edges.len()
    }

    /// How much the optimized edge set shrinks the raw one, in percent.
    /// Returns 0.0 for a graph with no raw edges.
    pub fn compression_percent(&self) -> f64 {
        if self.raw_edges.is_empty() {
            return 0.0;
        }
        let raw = self.raw_edges.len() as f64;
        let optimized = self.optimized_edges.len() as f64;
        (1.0 - optimized / raw) * 100.0
    }
}

impl fmt::Display for DebtGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Debt Graph ===")?;
        writeln!(f, "Nodes:           {}", self.node_count())?;
        writeln!(f, "Raw edges:       {}", self.raw_edge_count())?;
        writeln!(f, "Optimized edges: {}", self.optimized_edge_count())?;
        writeln!(f, "Compression:     {:.1}%", self.compression_percent())?;
        Ok(())
    }
}

/// Builds the two debt views from a group snapshot.
pub struct DebtGraphBuilder;

impl DebtGraphBuilder {
    /// Run the full pipeline: aggregate balances, plan the settlement, and
    /// assemble both edge sets.
    pub fn build(snapshot: &GroupSnapshot) -> Result<DebtGraph, LedgerError> {
        let aggregation = BalanceEngine::aggregate(snapshot)?;
        let report = aggregation.report(snapshot);
        let plan = SettlementPlanner::plan(&report.balances);
        Ok(Self::assemble(snapshot, &aggregation, &plan))
    }

    /// Structural mapping from already-computed pieces. No arithmetic beyond
    /// presentation rounding happens here.
    pub fn assemble(
        snapshot: &GroupSnapshot,
        aggregation: &Aggregation,
        plan: &SettlementPlan,
    ) -> DebtGraph {
        let sheet = aggregation.sheet();

        let nodes = snapshot
            .members()
            .iter()
            .map(|m| DebtNode {
                id: m.id.clone(),
                name: m.name.clone(),
                balance: sheet.balance(&m.id).round_dp(2),
                total_spent: sheet.spent(&m.id).round_dp(2),
            })
            .collect();

        let mut raw_edges = Vec::new();
        let member_count = snapshot.member_count();

        for expense in snapshot.expenses() {
            if expense.has_explicit_splits() {
                for split in expense.splits() {
                    // Skip self-edges and splits pointing outside the group.
                    if &split.member != expense.payer()
                        && snapshot.contains_member(&split.member)
                        && snapshot.contains_member(expense.payer())
                    {
                        raw_edges.push(DebtEdge {
                            from: split.member.clone(),
                            to: expense.payer().clone(),
                            amount: split.share.round_dp(2),
                        });
                    }
                }
            } else if member_count > 0 {
                let share = (expense.amount() / Decimal::from(member_count)).round_dp(2);
                for member in snapshot.members() {
                    if &member.id != expense.payer() && snapshot.contains_member(expense.payer()) {
                        raw_edges.push(DebtEdge {
                            from: member.id.clone(),
                            to: expense.payer().clone(),
                            amount: share,
                        });
                    }
                }
            }
        }

        for payment in snapshot.payments() {
            if snapshot.contains_member(payment.from()) && snapshot.contains_member(payment.to()) {
                raw_edges.push(DebtEdge {
                    from: payment.from().clone(),
                    to: payment.to().clone(),
                    amount: payment.amount().round_dp(2),
                });
            }
        }

        let optimized_edges = plan
            .transactions()
            .iter()
            .map(|t| DebtEdge {
                from: t.from.clone(),
                to: t.to.clone(),
                amount: t.amount,
            })
            .collect();

        DebtGraph {
            nodes,
            raw_edges,
            optimized_edges,
        }
    }
}
