//! Estimation orchestrator.
//!
//! Turns a raw task list and a rate table into a [`ProjectEstimate`]:
//! per-task durations and costs first, then the dependency graph and its
//! critical path once every expected duration is known.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::core::{DependencyGraph, ProjectId, TaskDescriptor, TaskEstimate};
use crate::error::{Error, Result};
use crate::estimation::cost::{hours_by_role, RateTable};
use crate::estimation::critical_path::{self, CriticalPath};
use crate::estimation::pert::ThreePoint;
use crate::intake::decomposition;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Unique identifier for a computed estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstimateId(pub Uuid);

impl EstimateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EstimateId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EstimateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The rate table an estimate was priced with, plus the effort it priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub rates: BTreeMap<String, f64>,
    pub default_rate: f64,
    /// Most-likely hours summed per role.
    pub hours_by_role: BTreeMap<String, f64>,
}

/// A finished project plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEstimate {
    pub id: EstimateId,
    pub project_id: ProjectId,
    pub tasks: Vec<TaskEstimate>,
    pub total_cost: f64,
    /// Length of the critical path, or of every task back to back when no
    /// critical path could be resolved.
    pub total_duration_days: f64,
    /// Task ids, earliest first. Empty for empty or cyclic plans.
    pub critical_path: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub resource_allocation: ResourceAllocation,
    pub created_at: DateTime<Utc>,
}

impl ProjectEstimate {
    pub fn task(&self, id: &str) -> Option<&TaskEstimate> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Computes project estimates against a fixed rate table.
///
/// Holds no state between runs, so one estimator can serve any number of
/// independent task lists, including concurrently.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    rates: RateTable,
}

impl Estimator {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Estimate a task list starting now.
    pub fn estimate(
        &self,
        project_id: ProjectId,
        tasks: Vec<TaskDescriptor>,
    ) -> Result<ProjectEstimate> {
        self.estimate_at(project_id, tasks, Utc::now())
    }

    /// Parse an upstream decomposition response and estimate it, starting now.
    pub fn estimate_response(
        &self,
        project_id: ProjectId,
        response: &str,
    ) -> Result<ProjectEstimate> {
        let tasks = decomposition::parse_tasks(response)?;
        self.estimate(project_id, tasks)
    }

    /// Estimate a task list with an explicit start instant.
    ///
    /// The only failure is [`Error::MalformedInput`] for a list that reuses
    /// a task id. Every per-task anomaly is absorbed with its fallback.
    pub fn estimate_at(
        &self,
        project_id: ProjectId,
        tasks: Vec<TaskDescriptor>,
        started_at: DateTime<Utc>,
    ) -> Result<ProjectEstimate> {
        reject_duplicate_ids(&tasks)?;

        let hours_by_role = hours_by_role(&tasks);
        let tasks: Vec<TaskEstimate> = tasks
            .into_iter()
            .map(|task| {
                let durations = ThreePoint::for_task(&task);
                let cost = self.rates.task_cost(&task);
                TaskEstimate::new(task, durations, cost)
            })
            .collect();

        let path = {
            let graph = DependencyGraph::build(&tasks);
            critical_path::resolve(&graph)
        };

        let total_cost: f64 = tasks.iter().map(|t| t.cost).sum();
        let total_duration_days = total_duration(&tasks, &path);
        let end_date = end_date(started_at, total_duration_days);

        tracing::info!(
            project = %project_id,
            tasks = tasks.len(),
            total_cost,
            total_duration_days,
            critical_path = path.tasks.len(),
            "project estimated"
        );

        Ok(ProjectEstimate {
            id: EstimateId::new(),
            project_id,
            tasks,
            total_cost,
            total_duration_days,
            critical_path: path.tasks,
            start_date: started_at,
            end_date,
            resource_allocation: ResourceAllocation {
                rates: self.rates.roles.clone(),
                default_rate: self.rates.default_rate,
                hours_by_role,
            },
            created_at: Utc::now(),
        })
    }
}

fn reject_duplicate_ids(tasks: &[TaskDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    match tasks.iter().find(|t| !seen.insert(t.id.as_str())) {
        Some(dup) => Err(Error::MalformedInput(format!(
            "duplicate task id '{}'",
            dup.id
        ))),
        None => Ok(()),
    }
}

/// Sum of expected days along the critical path; with no path, the sum over
/// every task, as if the whole plan ran serially.
fn total_duration(tasks: &[TaskEstimate], path: &CriticalPath) -> f64 {
    if path.is_empty() {
        if !tasks.is_empty() {
            tracing::warn!("no critical path, serializing all task durations");
        }
        return tasks.iter().map(|t| t.expected_days).sum();
    }
    let on_path: HashSet<&str> = path.tasks.iter().map(String::as_str).collect();
    tasks
        .iter()
        .filter(|t| on_path.contains(t.id.as_str()))
        .map(|t| t.expected_days)
        .sum()
}

fn end_date(start: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds((days * MILLIS_PER_DAY).round() as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or_else(|| {
            tracing::warn!(days, "end date out of range, clamping");
            DateTime::<Utc>::MAX_UTC
        })
}
