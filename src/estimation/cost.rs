//! Role-based cost roll-up.
//!
//! Cost is a single-point figure: most-likely hours times the hourly rate
//! of the role, summed per task and then per project. Optimistic and
//! pessimistic hours are carried on the allocation but never priced.
//! Rates and costs are opaque numeric units.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{RoleAllocation, TaskDescriptor};

/// Rate applied to roles missing from the table.
pub const DEFAULT_HOURLY_RATE: f64 = 1000.0;

/// Hourly rates keyed by exact role name, plus the fallback rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub default_rate: f64,
    pub roles: BTreeMap<String, f64>,
}

impl RateTable {
    /// A table with no mapped roles.
    pub fn new(default_rate: f64) -> Self {
        Self {
            default_rate,
            roles: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, role: &str, rate: f64) -> Self {
        self.roles.insert(role.to_string(), rate);
        self
    }

    /// Hourly rate for `role`, falling back to the default rate.
    pub fn rate_for(&self, role: &str) -> f64 {
        match self.roles.get(role) {
            Some(rate) => *rate,
            None => {
                tracing::debug!(role, default_rate = self.default_rate, "unmapped role");
                self.default_rate
            }
        }
    }

    pub fn role_cost(&self, allocation: &RoleAllocation) -> f64 {
        allocation.hours_most_likely * self.rate_for(&allocation.role)
    }

    pub fn task_cost(&self, task: &TaskDescriptor) -> f64 {
        task.roles.iter().map(|a| self.role_cost(a)).sum()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(DEFAULT_HOURLY_RATE)
            .with_rate("Junior Developer", 400.0)
            .with_rate("Mid Developer", 800.0)
            .with_rate("Senior Developer", 1500.0)
            .with_rate("Architect", 2500.0)
            .with_rate("QA Engineer", 600.0)
            .with_rate("Project Manager", 1800.0)
            .with_rate("UI/UX Designer", 1200.0)
            .with_rate("DevOps Engineer", 1800.0)
    }
}

/// Most-likely hours summed per role across a set of tasks.
pub fn hours_by_role<'a, I>(tasks: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a TaskDescriptor>,
{
    let mut hours = BTreeMap::new();
    for allocation in tasks.into_iter().flat_map(|t| t.roles.iter()) {
        *hours.entry(allocation.role.clone()).or_insert(0.0) += allocation.hours_most_likely;
    }
    hours
}
