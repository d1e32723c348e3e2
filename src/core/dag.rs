//! Task dependency graph.
//!
//! The graph is built fresh for every estimate from the declared
//! dependency ids of each task. An edge `A -> B` means B depends on A, so A
//! must finish before B starts. Each node carries the task's expected
//! duration as its weight.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::core::task::TaskEstimate;

/// A node of the dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub id: String,
    pub expected_days: f64,
}

/// Directed graph over task ids, weighted by expected duration.
///
/// References to unknown task ids are dropped silently instead of being
/// rejected, so a noisy producer never makes construction fail. Duplicate
/// ids are not deduplicated here; lookups by id resolve to the last node
/// added under that id.
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<TaskNode, ()>,
    /// Index mapping from task id to NodeIndex for fast lookups.
    task_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            task_index: HashMap::new(),
        }
    }

    /// Build the graph for a task list: one node per task, one edge per
    /// resolvable declared dependency.
    pub fn build(tasks: &[TaskEstimate]) -> Self {
        let mut graph = Self::new();
        for task in tasks {
            graph.add_task(&task.id, task.expected_days);
        }

        let mut dropped = 0usize;
        for task in tasks {
            for dep in &task.dependencies {
                if !graph.add_dependency(dep, &task.id) {
                    tracing::debug!(task = %task.id, dependency = %dep, "dropping dangling dependency");
                    dropped += 1;
                }
            }
        }

        tracing::debug!(
            tasks = graph.task_count(),
            dependencies = graph.dependency_count(),
            dropped,
            "dependency graph built"
        );
        graph
    }

    /// Add a task node. Always adds a new node, even for a repeated id.
    pub fn add_task(&mut self, id: &str, expected_days: f64) -> NodeIndex {
        let index = self.graph.add_node(TaskNode {
            id: id.to_string(),
            expected_days,
        });
        self.task_index.insert(id.to_string(), index);
        index
    }

    /// Record that `to` depends on `from`.
    ///
    /// Returns `false` and leaves the graph untouched when either id is
    /// unknown. Repeating an existing dependency does not add a second edge.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> bool {
        match (self.task_index.get(from), self.task_index.get(to)) {
            (Some(&from_index), Some(&to_index)) => {
                self.graph.update_edge(from_index, to_index, ());
                true
            }
            _ => false,
        }
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Get the underlying graph for algorithms that need direct access.
    pub fn graph(&self) -> &DiGraph<TaskNode, ()> {
        &self.graph
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("tasks", &self.task_count())
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}
