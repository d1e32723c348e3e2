//! Core domain records for the estimation engine.
//!
//! This module contains the task records produced from untrusted upstream
//! input and the dependency graph built over them.

pub mod dag;
pub mod project;
pub mod task;

pub use dag::{DependencyGraph, TaskNode};
pub use project::ProjectId;
pub use task::{RoleAllocation, TaskDescriptor, TaskEstimate};
