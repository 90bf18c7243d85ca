//! Raw and optimized debt graph views for visualization consumers.

pub mod debt_graph;
