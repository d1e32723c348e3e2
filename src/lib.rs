pub mod config;
pub mod core;
pub mod error;
pub mod estimation;
pub mod intake;
pub mod log;

pub use crate::core::{ProjectId, TaskDescriptor, TaskEstimate};
pub use error::{Error, Result};
pub use estimation::{Estimator, ProjectEstimate, RateTable};
