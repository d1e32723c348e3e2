//! End-to-end estimation tests.
//!
//! These tests verify the complete path from a raw model response to a
//! project estimate, including cost roll-up, critical path and dates.

use chrono::TimeDelta;

use pertplan::intake::decomposition;
use pertplan::{Estimator, ProjectId, RateTable};

use crate::fixtures::{
    diamond, estimate, expected_days_of, fixed, small_rates, start, web_shop_response,
};

/// Full pipeline over a fenced, prose-wrapped response.
#[test]
fn test_web_shop_response_end_to_end() {
    let tasks = decomposition::parse_tasks(&web_shop_response()).unwrap();
    let estimate = estimate(RateTable::default(), tasks);

    assert_eq!(estimate.tasks.len(), 5);
    assert_eq!(estimate.critical_path, vec!["T1", "T2", "T3", "T5"]);
    assert_eq!(estimate.total_duration_days, 19.5);
    assert_eq!(estimate.total_cost, 328_000.0);
    assert_eq!(
        estimate.end_date,
        start() + TimeDelta::days(19) + TimeDelta::hours(12)
    );
}

/// The defaulted optimistic point and unmapped role show up in the output.
#[test]
fn test_web_shop_fallbacks_are_visible() {
    let tasks = decomposition::parse_tasks(&web_shop_response()).unwrap();
    let estimate = estimate(RateTable::default(), tasks);

    let storefront = estimate.task("T4").unwrap();
    assert_eq!(storefront.optimistic_days, 5.0);
    assert!((storefront.expected_days - 37.0 / 6.0).abs() < 1e-9);

    let testing = estimate.task("T5").unwrap();
    assert_eq!(testing.roles[1].role, "Intern");
    assert_eq!(testing.roles[1].hours_most_likely, 40.0);
    assert_eq!(testing.cost, 24.0 * 600.0 + 40.0 * 1000.0);

    let hours = &estimate.resource_allocation.hours_by_role;
    assert_eq!(hours.get("Intern"), Some(&40.0));
    assert_eq!(hours.get("Senior Developer"), Some(&80.0));
}

#[test]
fn test_summary_is_kept_alongside_tasks() {
    let decomposition = decomposition::parse(&web_shop_response()).unwrap();
    let summary = decomposition.project_summary.unwrap();
    assert_eq!(summary.total_estimated_days, Some(25.0));
    assert_eq!(summary.recommended_team_size.as_deref(), Some("3-5 developers"));
}

/// Diamond graph: the path through the heavier branch wins.
#[test]
fn test_diamond_critical_path() {
    let estimate = estimate(RateTable::default(), diamond());

    assert_eq!(estimate.critical_path, vec!["T1", "T2", "T4"]);
    assert_eq!(estimate.total_duration_days, 7.0);
    assert_eq!(
        expected_days_of(&estimate, &estimate.critical_path),
        estimate.total_duration_days
    );
}

/// Every critical path id appears exactly once in the task list.
#[test]
fn test_critical_path_ids_are_unique_tasks() {
    let estimate = estimate(RateTable::default(), diamond());
    for id in &estimate.critical_path {
        assert_eq!(estimate.tasks.iter().filter(|t| &t.id == id).count(), 1);
    }
}

/// The project is never shorter than its longest task.
#[test]
fn test_duration_covers_longest_task() {
    let tasks = vec![
        fixed("T1", 2.0, &[]),
        fixed("T2", 3.0, &["T1"]),
        fixed("T3", 9.0, &[]),
        fixed("T4", 0.5, &["T2"]),
    ];
    let estimate = estimate(RateTable::default(), tasks);
    let longest = estimate
        .tasks
        .iter()
        .map(|t| t.expected_days)
        .fold(0.0, f64::max);

    assert!(estimate.total_duration_days >= longest);
    assert_eq!(estimate.critical_path, vec!["T3"]);
}

/// Cost example: 10h at 400 plus 5h at the 1000 default.
#[test]
fn test_cost_example() {
    let tasks = vec![fixed("T1", 1.0, &[]).with_role("A", 10.0).with_role("C", 5.0)];
    let estimate = estimate(small_rates(), tasks);
    assert_eq!(estimate.total_cost, 9000.0);
    assert_eq!(estimate.resource_allocation.rates.len(), 2);
}

/// Same input and start instant give the same plan.
#[test]
fn test_idempotent_runs() {
    let estimator = Estimator::new(small_rates());
    let tasks = diamond();

    let first = estimator
        .estimate_at(ProjectId::new(), tasks.clone(), start())
        .unwrap();
    let second = estimator
        .estimate_at(ProjectId::new(), tasks, start())
        .unwrap();

    assert_eq!(first.total_cost, second.total_cost);
    assert_eq!(first.total_duration_days, second.total_duration_days);
    assert_eq!(first.critical_path, second.critical_path);
    assert_eq!(first.tasks, second.tasks);
}

/// Runs on separate task lists share nothing and can proceed in parallel.
#[test]
fn test_concurrent_runs_are_independent() {
    let estimator = Estimator::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let estimator = &estimator;
                scope.spawn(move || {
                    let tasks: Vec<_> = (1..=n)
                        .map(|i| {
                            let id = format!("T{}", i);
                            let prev = format!("T{}", i - 1);
                            let deps: Vec<&str> = if i == 1 { vec![] } else { vec![prev.as_str()] };
                            fixed(&id, 2.0, &deps)
                        })
                        .collect();
                    estimator
                        .estimate_at(ProjectId::new(), tasks, start())
                        .unwrap()
                        .total_duration_days
                })
            })
            .collect();

        for (n, handle) in (1..=4).zip(handles) {
            assert_eq!(handle.join().unwrap(), 2.0 * n as f64);
        }
    });
}

/// Serialized estimates carry the fields downstream storage expects.
#[test]
fn test_estimate_serialization_shape() {
    let estimate = estimate(RateTable::default(), diamond());
    let json = serde_json::to_value(&estimate).unwrap();

    for key in [
        "id",
        "project_id",
        "tasks",
        "total_cost",
        "total_duration_days",
        "critical_path",
        "start_date",
        "end_date",
        "resource_allocation",
        "created_at",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(json["tasks"][0]["expected_days"], 1.0);
    assert!(json["resource_allocation"]["rates"].is_object());
}
