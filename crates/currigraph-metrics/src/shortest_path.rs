use currigraph_core::{CurriGraphError, NodeId, Result, UnreachablePairPolicy};
use currigraph_graph::CourseGraph;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

/// Per-unit time guard for the all-pairs hot path. Checked inside the
/// Dijkstra loop so a pathologically large aggregate degrades its own row
/// instead of stalling the batch.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn check(&self) -> Result<()> {
        if Instant::now() > self.at {
            Err(CurriGraphError::TimeBudgetExceeded(self.budget))
        } else {
            Ok(())
        }
    }
}

/// Dijkstra from `source` with edge weight `1 - similarity`. Returns the
/// distance to every reachable node, including the source at 0.0.
pub fn single_source(
    graph: &CourseGraph,
    source: &str,
    deadline: Option<Deadline>,
) -> Result<HashMap<NodeId, f64>> {
    let mut settled: HashMap<NodeId, f64> = HashMap::new();
    if !graph.contains_node(source) {
        return Ok(settled);
    }
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), source.to_string())));

    while let Some(Reverse((distance, node))) = heap.pop() {
        if let Some(deadline) = deadline {
            deadline.check()?;
        }
        if settled.contains_key(&node) {
            continue;
        }
        for (neighbor, similarity) in graph.neighbors(&node) {
            if !settled.contains_key(neighbor) {
                heap.push(Reverse((
                    OrderedFloat(distance.0 + (1.0 - similarity)),
                    neighbor.clone(),
                )));
            }
        }
        settled.insert(node, distance.0);
    }
    Ok(settled)
}

/// All-pairs weighted shortest paths over the graph's own node set.
pub fn all_pairs(
    graph: &CourseGraph,
    deadline: Option<Deadline>,
) -> Result<HashMap<NodeId, HashMap<NodeId, f64>>> {
    let mut lengths = HashMap::with_capacity(graph.node_count());
    for node in graph.node_ids() {
        lengths.insert(node.clone(), single_source(graph, node, deadline)?);
    }
    Ok(lengths)
}

/// Weighted shortest-path distances for unordered pairs `i < j` of the
/// subgraph. Unreachable pairs are excluded or counted at 1.0 depending on
/// the configured policy.
pub fn pairwise_distances(
    subgraph: &CourseGraph,
    policy: UnreachablePairPolicy,
    deadline: Option<Deadline>,
) -> Result<Vec<f64>> {
    if subgraph.node_count() <= 1 {
        return Ok(Vec::new());
    }
    let lengths = all_pairs(subgraph, deadline)?;
    let nodes: Vec<&NodeId> = subgraph.node_ids().collect();
    let mut distances = Vec::new();
    for (i, u) in nodes.iter().enumerate() {
        let from_u = &lengths[*u];
        for v in nodes.iter().skip(i + 1) {
            match from_u.get(*v) {
                Some(distance) => distances.push(*distance),
                None => {
                    if policy == UnreachablePairPolicy::MaxDistance {
                        distances.push(1.0);
                    }
                }
            }
        }
    }
    Ok(distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_graph;
    use approx::assert_relative_eq;

    #[test]
    fn single_source_accumulates_distances() {
        // A -0.9- B -0.8- C: d(A,B) = 0.1, d(B,C) = 0.2, d(A,C) = 0.3.
        let graph = line_graph(&[("A-100", "B-100", 0.9), ("B-100", "C-100", 0.8)]);
        let from_a = single_source(&graph, "A-100|2021F", None).unwrap();
        assert_relative_eq!(from_a["A-100|2021F"], 0.0);
        assert_relative_eq!(from_a["B-100|2021F"], 0.1, max_relative = 1e-9);
        assert_relative_eq!(from_a["C-100|2021F"], 0.3, max_relative = 1e-9);
    }

    #[test]
    fn shortest_path_beats_direct_edge() {
        // Direct A-C edge is worse than the two-hop route through B.
        let graph = line_graph(&[
            ("A-100", "B-100", 0.95),
            ("B-100", "C-100", 0.95),
            ("A-100", "C-100", 0.5),
        ]);
        let from_a = single_source(&graph, "A-100|2021F", None).unwrap();
        assert_relative_eq!(from_a["C-100|2021F"], 0.1, max_relative = 1e-9);
    }

    #[test]
    fn unreachable_pairs_follow_policy() {
        // Two disconnected edges: A-B and C-D.
        let graph = line_graph(&[("A-100", "B-100", 0.9), ("C-100", "D-100", 0.9)]);
        let excluded =
            pairwise_distances(&graph, UnreachablePairPolicy::Exclude, None).unwrap();
        assert_eq!(excluded.len(), 2);
        let padded =
            pairwise_distances(&graph, UnreachablePairPolicy::MaxDistance, None).unwrap();
        assert_eq!(padded.len(), 6);
        assert_eq!(padded.iter().filter(|d| **d == 1.0).count(), 4);
    }

    #[test]
    fn exhausted_deadline_reports_budget_error() {
        let graph = line_graph(&[("A-100", "B-100", 0.9)]);
        let deadline = Deadline {
            at: Instant::now() - Duration::from_secs(1),
            budget: Duration::from_secs(0),
        };
        assert!(single_source(&graph, "A-100|2021F", Some(deadline)).is_err());
    }
}
