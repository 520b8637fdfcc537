use currigraph_core::NodeId;
use currigraph_graph::CourseGraph;
use std::collections::{HashSet, VecDeque};

/// Connected components, sorted by size descending (ties broken by the
/// smallest member id so the ordering is stable across runs).
pub fn connected_components(graph: &CourseGraph) -> Vec<Vec<NodeId>> {
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut components = Vec::new();
    for start in graph.node_ids() {
        if visited.contains(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited.insert(start);
        while let Some(node) = queue.pop_front() {
            component.push(node.clone());
            for (neighbor, _) in graph.neighbors(node) {
                if !visited.contains(neighbor) {
                    visited.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));
    components
}

/// Nodes of the largest component, or empty for an empty graph.
pub fn largest_component(graph: &CourseGraph) -> Vec<NodeId> {
    connected_components(graph).into_iter().next().unwrap_or_default()
}

/// Unweighted hop-diameter of a connected graph: the longest BFS
/// eccentricity over all nodes. 0 for empty or singleton graphs.
pub fn hop_diameter(graph: &CourseGraph) -> usize {
    let mut diameter = 0;
    for start in graph.node_ids() {
        let mut visited: HashSet<&NodeId> = HashSet::from([start]);
        let mut queue: VecDeque<(&NodeId, usize)> = VecDeque::from([(start, 0)]);
        while let Some((node, level)) = queue.pop_front() {
            diameter = diameter.max(level);
            for (neighbor, _) in graph.neighbors(node) {
                if !visited.contains(neighbor) {
                    visited.insert(neighbor);
                    queue.push_back((neighbor, level + 1));
                }
            }
        }
    }
    diameter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{graph_from, line_graph};

    #[test]
    fn splits_disconnected_pieces() {
        let graph = graph_from(
            &["E-100"],
            &[("A-100", "B-100", 0.9), ("B-100", "C-100", 0.9), ("D-100", "F-100", 0.8)],
        );
        let components = connected_components(&graph);
        let sizes: Vec<usize> = components.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 1]);
        assert_eq!(largest_component(&graph).len(), 3);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let graph = graph_from(&[], &[]);
        assert!(connected_components(&graph).is_empty());
        assert!(largest_component(&graph).is_empty());
    }

    #[test]
    fn hop_diameter_counts_hops_not_weights() {
        let graph = line_graph(&[
            ("A-100", "B-100", 0.99),
            ("B-100", "C-100", 0.99),
            ("C-100", "D-100", 0.99),
        ]);
        assert_eq!(hop_diameter(&graph), 3);
    }

    #[test]
    fn singleton_has_zero_diameter() {
        let graph = graph_from(&["A-100"], &[]);
        assert_eq!(hop_diameter(&graph), 0);
    }
}
