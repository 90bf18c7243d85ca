//! Balance aggregation and settlement planning.

pub mod aggregate;
pub mod planner;
