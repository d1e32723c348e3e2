//! Critical path resolution: the longest node-weighted path through the
//! dependency graph.
//!
//! Nodes are relaxed in topological order, each keeping the heaviest path
//! that ends on it and a pointer to its predecessor on that path. The path
//! is read back from the heaviest leaf. A cyclic graph has no topological
//! order and resolves to an empty path instead of an error.

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::DependencyGraph;

/// An ordered run of task ids, earliest first, with its total duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub tasks: Vec<String>,
    pub total_days: f64,
}

impl CriticalPath {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t == id)
    }
}

/// Resolve the critical path of `graph`.
///
/// On ties any one of the heaviest paths is returned; its total always
/// equals the true maximum. Empty and cyclic graphs yield an empty path.
pub fn resolve(graph: &DependencyGraph) -> CriticalPath {
    if graph.is_empty() {
        return CriticalPath::default();
    }
    let dag = graph.graph();

    let order = match toposort(dag, None) {
        Ok(order) => order,
        Err(cycle) => {
            tracing::warn!(
                task = %dag[cycle.node_id()].id,
                "dependency cycle detected, no critical path"
            );
            return CriticalPath::default();
        }
    };

    // Heaviest path ending at each node, including the node itself.
    let mut distance: Vec<f64> = dag.node_weights().map(|n| n.expected_days).collect();
    let mut predecessor: Vec<Option<NodeIndex>> = vec![None; dag.node_count()];

    for &node in &order {
        let node_distance = distance[node.index()];
        for edge in dag.edges_directed(node, Direction::Outgoing) {
            let target = edge.target();
            let candidate = node_distance + dag[target].expected_days;
            // `>=` so every non-root node points back towards a root even
            // when zero-length tasks tie.
            if candidate >= distance[target.index()] {
                distance[target.index()] = candidate;
                predecessor[target.index()] = Some(node);
            }
        }
    }

    let end = dag
        .externals(Direction::Outgoing)
        .max_by(|a, b| {
            distance[a.index()]
                .partial_cmp(&distance[b.index()])
                .unwrap_or(Ordering::Equal)
        });
    let Some(end) = end else {
        return CriticalPath::default();
    };

    let mut tasks = vec![dag[end].id.clone()];
    let mut current = end;
    while let Some(prev) = predecessor[current.index()] {
        tasks.push(dag[prev].id.clone());
        current = prev;
    }
    tasks.reverse();

    tracing::trace!(path = ?tasks, total_days = distance[end.index()], "critical path resolved");
    CriticalPath {
        tasks,
        total_days: distance[end.index()],
    }
}
