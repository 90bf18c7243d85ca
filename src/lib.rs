//! # splitledger
//!
//! Shared-expense ledger balance and settlement engine.
//!
//! Given a snapshot of a group's members, expenses (with their splits) and
//! recorded payments, this engine derives each member's signed net balance
//! and collapses those balances into a minimum-cardinality set of settling
//! transactions, plus raw/optimized debt graph views for visualization.
//!
//! The engine is a pure computation: it performs no I/O, holds no global
//! state, and recomputes every result fresh from the snapshot it is handed.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: members, expense/payment records, balance sheets
//! - **settlement** — Balance aggregation and greedy settlement planning
//! - **graph** — Raw vs. optimized debt graph construction
//! - **simulation** — Random group generation for stress testing

pub mod core;
pub mod graph;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::member::{Member, MemberId};
    pub use crate::core::record::{Expense, GroupSnapshot, Payment, Split};
    pub use crate::graph::debt_graph::{DebtEdge, DebtGraph, DebtGraphBuilder, DebtNode};
    pub use crate::settlement::aggregate::{
        Aggregation, BalanceEngine, BalanceReport, LedgerError, LedgerWarning, MemberBalance,
    };
    pub use crate::settlement::planner::{
        SettlementPlan, SettlementPlanner, SettlementTransaction,
    };
}
