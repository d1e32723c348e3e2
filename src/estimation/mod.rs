//! The project estimation engine.
//!
//! Leaf-first: [`pert`] turns three-point durations into an expected
//! duration, [`cost`] prices role allocations, [`critical_path`] finds the
//! longest dependent chain in the task graph, and [`estimator`] composes
//! them into a [`ProjectEstimate`].
//!
//! Everything here is pure and synchronous: no I/O and no shared state.

pub mod cost;
pub mod critical_path;
pub mod estimator;
pub mod pert;

pub use cost::RateTable;
pub use critical_path::CriticalPath;
pub use estimator::{EstimateId, Estimator, ProjectEstimate, ResourceAllocation};
pub use pert::ThreePoint;
