//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Canned upstream model responses
//! - Predefined task sets
//! - A fixed project start instant

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use pertplan::{Estimator, ProjectEstimate, ProjectId, RateTable, TaskDescriptor};

/// Fixed start instant so end dates are comparable across runs.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Rate table from the cost example: A=400, B=800, default 1000.
pub fn small_rates() -> RateTable {
    RateTable::new(1000.0)
        .with_rate("A", 400.0)
        .with_rate("B", 800.0)
}

/// A task whose three duration points are all `days`.
pub fn fixed(id: &str, days: f64, deps: &[&str]) -> TaskDescriptor {
    TaskDescriptor::new(id, id)
        .with_durations(days, days, days)
        .with_dependencies(deps)
}

/// T1 -> {T2, T3} -> T4 with expected days 1, 5, 2, 1.
pub fn diamond() -> Vec<TaskDescriptor> {
    vec![
        fixed("T1", 1.0, &[]),
        fixed("T2", 5.0, &["T1"]),
        fixed("T3", 2.0, &["T1"]),
        fixed("T4", 1.0, &["T2", "T3"]),
    ]
}

/// Run the estimator at the fixed start instant.
pub fn estimate(rates: RateTable, tasks: Vec<TaskDescriptor>) -> ProjectEstimate {
    Estimator::new(rates)
        .estimate_at(ProjectId::new(), tasks, start())
        .expect("estimate should succeed")
}

/// A realistic model reply: prose, a fenced JSON document, more prose.
pub fn web_shop_response() -> String {
    let document = json!({
        "tasks": [
            {
                "id": "T1",
                "title": "Requirements analysis",
                "description": "Gather and document requirements",
                "category": "Planning",
                "acceptance_criteria": ["Requirements signed off"],
                "dependencies": [],
                "roles": [{"role": "Project Manager", "hours_optimistic": 16, "hours_most_likely": 24, "hours_pessimistic": 40}],
                "optimistic_days": 2,
                "most_likely_days": 3,
                "pessimistic_days": 7,
                "risk": "low",
                "priority": "high"
            },
            {
                "id": "T2",
                "title": "Database schema",
                "category": "Database Design",
                "dependencies": ["T1"],
                "roles": [{"role": "Architect", "hours_most_likely": 16}],
                "optimistic_days": 1,
                "most_likely_days": 2,
                "pessimistic_days": 3
            },
            {
                "id": "T3",
                "title": "Backend API",
                "category": "Backend Development",
                "dependencies": ["T2", "T0"],
                "roles": [
                    {"role": "Senior Developer", "hours_most_likely": 80},
                    {"role": "Mid Developer", "hours_most_likely": 40}
                ],
                "optimistic_days": 8,
                "most_likely_days": 10,
                "pessimistic_days": 18
            },
            {
                "id": "T4",
                "title": "Storefront UI",
                "category": "Frontend Development",
                "dependencies": ["T1"],
                "roles": [{"role": "UI/UX Designer", "hours_most_likely": 32}],
                "optimistic_days": "four",
                "most_likely_days": 6,
                "pessimistic_days": 8
            },
            {
                "id": "T5",
                "title": "Integration testing",
                "category": "Testing",
                "dependencies": ["T3", "T4"],
                "roles": [{"role": "QA Engineer", "hours_most_likely": 24}, {"role": "Intern"}],
                "optimistic_days": 2,
                "most_likely_days": 3,
                "pessimistic_days": 4
            }
        ],
        "project_summary": {
            "total_estimated_days": 25,
            "complexity_assessment": "medium",
            "key_risks": ["Payment provider integration"],
            "recommended_team_size": "3-5 developers",
            "critical_success_factors": ["Early schema sign-off"]
        }
    });
    format!(
        "Here is the breakdown you asked for:\n\n```json\n{}\n```\n\nLet me know if you need changes.",
        serde_json::to_string_pretty(&document).unwrap()
    )
}

/// Sum of expected days of the given tasks in an estimate.
pub fn expected_days_of(estimate: &ProjectEstimate, ids: &[String]) -> f64 {
    ids.iter()
        .map(|id| estimate.task(id).expect("id on path must exist").expected_days)
        .sum()
}

/// JSON for a task list of `n` tasks in a single chain.
pub fn chain_json(n: usize) -> Value {
    let tasks: Vec<Value> = (1..=n)
        .map(|i| {
            let deps: Vec<String> = if i == 1 {
                Vec::new()
            } else {
                vec![format!("T{}", i - 1)]
            };
            json!({
                "id": format!("T{}", i),
                "dependencies": deps,
                "optimistic_days": 1,
                "most_likely_days": 1,
                "pessimistic_days": 1
            })
        })
        .collect();
    json!({ "tasks": tasks })
}
