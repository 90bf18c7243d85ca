//! Random group generation for stress testing and benchmarks.

pub mod random_group;
