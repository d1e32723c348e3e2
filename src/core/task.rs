//! Task records flowing through the estimation engine.
//!
//! A [`TaskDescriptor`] is what the upstream generative model proposes and
//! is untrusted: every field tolerates absence or a wrong JSON type and
//! falls back to a documented default. A [`TaskEstimate`] is the engine's
//! immutable, computed view of one descriptor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::estimation::pert::ThreePoint;

/// Fallback role name when an allocation omits it.
pub const DEFAULT_ROLE: &str = "Developer";
/// Fallback most-likely hours when an allocation omits them.
pub const DEFAULT_ROLE_HOURS: f64 = 40.0;
pub const DEFAULT_TITLE: &str = "Unnamed Task";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_RISK: &str = "medium";
pub const DEFAULT_PRIORITY: &str = "medium";

/// Hours one role is expected to spend on a task.
///
/// Only `hours_most_likely` feeds the headline cost; the other two points
/// are kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRoleAllocation")]
pub struct RoleAllocation {
    pub role: String,
    pub hours_optimistic: Option<f64>,
    pub hours_most_likely: f64,
    pub hours_pessimistic: Option<f64>,
}

impl RoleAllocation {
    pub fn new(role: &str, hours_most_likely: f64) -> Self {
        Self {
            role: role.to_string(),
            hours_optimistic: None,
            hours_most_likely,
            hours_pessimistic: None,
        }
    }
}

#[derive(Deserialize)]
struct RawRoleAllocation {
    #[serde(default, deserialize_with = "lenient::string")]
    role: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    hours_optimistic: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    hours_most_likely: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    hours_pessimistic: Option<f64>,
}

impl From<RawRoleAllocation> for RoleAllocation {
    fn from(raw: RawRoleAllocation) -> Self {
        let role = raw.role.unwrap_or_else(|| {
            tracing::debug!("role allocation without a role name, using '{}'", DEFAULT_ROLE);
            DEFAULT_ROLE.to_string()
        });
        let hours_most_likely = raw.hours_most_likely.unwrap_or_else(|| {
            tracing::debug!(role = %role, "missing most-likely hours, using {}", DEFAULT_ROLE_HOURS);
            DEFAULT_ROLE_HOURS
        });
        Self {
            role,
            hours_optimistic: raw.hours_optimistic,
            hours_most_likely,
            hours_pessimistic: raw.hours_pessimistic,
        }
    }
}

/// One unit of work as proposed by the upstream producer.
///
/// Durations stay optional here; the duration estimator owns their
/// fallbacks. Everything else is resolved to its default on parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTaskDescriptor")]
pub struct TaskDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub acceptance_criteria: Vec<String>,
    /// Ids of tasks that must finish first. May name unknown tasks.
    pub dependencies: Vec<String>,
    pub roles: Vec<RoleAllocation>,
    pub optimistic_days: Option<f64>,
    pub most_likely_days: Option<f64>,
    pub pessimistic_days: Option<f64>,
    pub risk: String,
    pub priority: String,
}

impl TaskDescriptor {
    /// Create a descriptor with the given id and title and every other
    /// field at its default.
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            acceptance_criteria: Vec::new(),
            dependencies: Vec::new(),
            roles: Vec::new(),
            optimistic_days: None,
            most_likely_days: None,
            pessimistic_days: None,
            risk: DEFAULT_RISK.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
        }
    }

    pub fn with_durations(mut self, optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        self.optimistic_days = Some(optimistic);
        self.most_likely_days = Some(most_likely);
        self.pessimistic_days = Some(pessimistic);
        self
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_role(mut self, role: &str, hours_most_likely: f64) -> Self {
        self.roles.push(RoleAllocation::new(role, hours_most_likely));
        self
    }
}

#[derive(Deserialize)]
struct RawTaskDescriptor {
    #[serde(default, deserialize_with = "lenient::string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    acceptance_criteria: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    dependencies: Vec<String>,
    #[serde(default, deserialize_with = "lenient::roles")]
    roles: Vec<RoleAllocation>,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    optimistic_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    most_likely_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pessimistic_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    risk: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    priority: Option<String>,
}

impl From<RawTaskDescriptor> for TaskDescriptor {
    fn from(raw: RawTaskDescriptor) -> Self {
        let id = match raw.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                let generated = Uuid::new_v4().to_string();
                tracing::debug!(id = %generated, "task without an id, generated one");
                generated
            }
        };
        Self {
            id,
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: raw.description.unwrap_or_default(),
            category: raw.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            acceptance_criteria: raw.acceptance_criteria,
            dependencies: raw.dependencies,
            roles: raw.roles,
            optimistic_days: raw.optimistic_days,
            most_likely_days: raw.most_likely_days,
            pessimistic_days: raw.pessimistic_days,
            risk: raw.risk.unwrap_or_else(|| DEFAULT_RISK.to_string()),
            priority: raw.priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
        }
    }
}

/// A descriptor with its durations resolved and its expected duration and
/// cost computed. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEstimate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub acceptance_criteria: Vec<String>,
    pub dependencies: Vec<String>,
    pub roles: Vec<RoleAllocation>,
    pub optimistic_days: f64,
    pub most_likely_days: f64,
    pub pessimistic_days: f64,
    /// PERT mean of the three duration points.
    pub expected_days: f64,
    /// Single-point cost anchored on most-likely hours.
    pub cost: f64,
    pub risk: String,
    pub priority: String,
}

impl TaskEstimate {
    pub fn new(descriptor: TaskDescriptor, durations: ThreePoint, cost: f64) -> Self {
        Self {
            id: descriptor.id,
            title: descriptor.title,
            description: descriptor.description,
            category: descriptor.category,
            acceptance_criteria: descriptor.acceptance_criteria,
            dependencies: descriptor.dependencies,
            roles: descriptor.roles,
            optimistic_days: durations.optimistic,
            most_likely_days: durations.most_likely,
            pessimistic_days: durations.pessimistic,
            expected_days: durations.expected(),
            cost,
            risk: descriptor.risk,
            priority: descriptor.priority,
        }
    }
}

/// Deserializers that never fail on a wrong JSON type.
mod lenient {
    use super::RoleAllocation;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_string(Value::deserialize(deserializer)?))
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_string).collect(),
            Value::String(single) => vec![single],
            _ => Vec::new(),
        })
    }

    pub fn non_negative<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let number = non_negative_number(&value);
        if number.is_none() && !value.is_null() {
            tracing::debug!(value = %value, "ignoring malformed numeric field");
        }
        Ok(number)
    }

    pub fn roles<'de, D>(deserializer: D) -> Result<Vec<RoleAllocation>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            _ => return Ok(Vec::new()),
        };
        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    fn scalar_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn non_negative_number(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        (number.is_finite() && number >= 0.0).then_some(number)
    }
}
