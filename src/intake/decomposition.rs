//! Parsing of the upstream model's task decomposition.
//!
//! The response is untrusted text. It may be wrapped in a markdown code
//! fence and may be either `{"tasks": [...], "project_summary": {...}}` or a
//! bare task array. Anything that cannot yield a list of task objects is
//! [`Error::MalformedInput`]; everything inside a task object is tolerated.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

use crate::core::TaskDescriptor;
use crate::error::{Error, Result};

/// A fenced block whose opening and closing markers each start a line. The
/// body runs to the last closing marker. JSON strings cannot hold a raw
/// newline, so backticks inside a string value never match either marker.
static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*```[A-Za-z0-9_-]*[ \t]*\r?\n(.*)^[ \t]*```[ \t]*\r?$").unwrap()
});

/// Overall assessment the model may attach to its task list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSummary {
    pub total_estimated_days: Option<f64>,
    pub complexity_assessment: Option<String>,
    pub key_risks: Vec<String>,
    pub recommended_team_size: Option<String>,
    pub critical_success_factors: Vec<String>,
}

/// A parsed decomposition response.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub tasks: Vec<TaskDescriptor>,
    pub project_summary: Option<ProjectSummary>,
}

/// Return the body of the fenced block, or the trimmed text when there is
/// none. A fence opening the text whose closing marker is missing, or sits
/// at the end of the last body line, is dropped too.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(body) = CODE_FENCE_RE.captures(trimmed).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

/// Parse a full decomposition response.
pub fn parse(response: &str) -> Result<Decomposition> {
    // Fences are only looked for once the text fails to parse as it is.
    let value: Value = match serde_json::from_str(response.trim()) {
        Ok(value) => value,
        Err(_) => serde_json::from_str(strip_code_fence(response)).map_err(|e| {
            Error::MalformedInput(format!("response is not valid JSON: {}", e))
        })?,
    };

    let (tasks, summary) = match value {
        Value::Array(items) => (Value::Array(items), None),
        Value::Object(mut map) => {
            let tasks = map.remove("tasks").ok_or_else(|| {
                Error::MalformedInput("response has no 'tasks' field".to_string())
            })?;
            (tasks, map.remove("project_summary"))
        }
        other => {
            return Err(Error::MalformedInput(format!(
                "expected a task list, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(Decomposition {
        tasks: task_list(tasks)?,
        project_summary: summary.and_then(project_summary),
    })
}

/// Parse a response and keep only its tasks.
pub fn parse_tasks(response: &str) -> Result<Vec<TaskDescriptor>> {
    parse(response).map(|d| d.tasks)
}

/// Convert a JSON value into descriptors. The value must be an array whose
/// every element is an object.
pub fn task_list(value: Value) -> Result<Vec<TaskDescriptor>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::MalformedInput(format!(
                "'tasks' must be a list, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            if !item.is_object() {
                return Err(Error::MalformedInput(format!(
                    "task #{} is {}, not an object",
                    position,
                    json_kind(&item)
                )));
            }
            serde_json::from_value(item)
                .map_err(|e| Error::MalformedInput(format!("task #{}: {}", position, e)))
        })
        .collect()
}

fn project_summary(value: Value) -> Option<ProjectSummary> {
    match serde_json::from_value(value) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unreadable project summary");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
