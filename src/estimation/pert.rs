//! Three-point (PERT) duration estimation.
//!
//! `expected = (optimistic + 4 * most_likely + pessimistic) / 6`
//!
//! The formula is applied verbatim. An inverted triple (optimistic greater
//! than pessimistic) is neither reordered nor clamped, so its expected value
//! can fall outside the `[optimistic, pessimistic]` range. Callers own the
//! sanity of their inputs.

use serde::{Deserialize, Serialize};

use crate::core::TaskDescriptor;

/// Fallback optimistic duration, in days.
pub const DEFAULT_OPTIMISTIC_DAYS: f64 = 5.0;
/// Fallback most-likely duration, in days.
pub const DEFAULT_MOST_LIKELY_DAYS: f64 = 10.0;
/// Fallback pessimistic duration, in days.
pub const DEFAULT_PESSIMISTIC_DAYS: f64 = 15.0;

/// PERT expected value of a three-point estimate.
pub fn expected(optimistic: f64, most_likely: f64, pessimistic: f64) -> f64 {
    (optimistic + 4.0 * most_likely + pessimistic) / 6.0
}

/// A resolved optimistic / most-likely / pessimistic triple, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePoint {
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
}

impl ThreePoint {
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    /// Resolve possibly missing points, substituting the documented
    /// fallback for each absent one independently.
    pub fn from_parts(
        optimistic: Option<f64>,
        most_likely: Option<f64>,
        pessimistic: Option<f64>,
    ) -> Self {
        Self {
            optimistic: optimistic.unwrap_or(DEFAULT_OPTIMISTIC_DAYS),
            most_likely: most_likely.unwrap_or(DEFAULT_MOST_LIKELY_DAYS),
            pessimistic: pessimistic.unwrap_or(DEFAULT_PESSIMISTIC_DAYS),
        }
    }

    pub fn for_task(task: &TaskDescriptor) -> Self {
        let points = Self::from_parts(
            task.optimistic_days,
            task.most_likely_days,
            task.pessimistic_days,
        );
        if task.optimistic_days.is_none()
            || task.most_likely_days.is_none()
            || task.pessimistic_days.is_none()
        {
            tracing::debug!(task = %task.id, ?points, "filled missing durations with defaults");
        }
        if points.is_inverted() {
            tracing::debug!(task = %task.id, ?points, "duration triple is out of order, applying formula as-is");
        }
        points
    }

    pub fn expected(&self) -> f64 {
        expected(self.optimistic, self.most_likely, self.pessimistic)
    }

    /// True when the points break `optimistic <= most_likely <= pessimistic`.
    pub fn is_inverted(&self) -> bool {
        self.optimistic > self.most_likely || self.most_likely > self.pessimistic
    }
}

impl Default for ThreePoint {
    fn default() -> Self {
        Self::new(
            DEFAULT_OPTIMISTIC_DAYS,
            DEFAULT_MOST_LIKELY_DAYS,
            DEFAULT_PESSIMISTIC_DAYS,
        )
    }
}
