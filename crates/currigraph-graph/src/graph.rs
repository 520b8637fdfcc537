use currigraph_core::{CourseOffering, NodeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Undirected edge key, always stored `(min, max)` so `(u, v)` and `(v, u)`
/// resolve to the same entry.
pub type EdgeKey = (NodeId, NodeId);

pub fn edge_key(u: &str, v: &str) -> EdgeKey {
    if u <= v {
        (u.to_string(), v.to_string())
    } else {
        (v.to_string(), u.to_string())
    }
}

/// Immutable weighted similarity graph. Built once per input snapshot and
/// shared read-only afterwards; every "filter" is a pure transform that
/// returns a new value instead of mutating this one.
///
/// Node and edge maps are BTreeMaps so iteration order, and therefore every
/// derived metric, is deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    nodes: BTreeMap<NodeId, CourseOffering>,
    edges: BTreeMap<EdgeKey, f64>,
    adjacency: HashMap<NodeId, Vec<(NodeId, f64)>>,
}

impl CourseGraph {
    pub fn from_parts(nodes: BTreeMap<NodeId, CourseOffering>, edges: BTreeMap<EdgeKey, f64>) -> Self {
        let mut adjacency: HashMap<NodeId, Vec<(NodeId, f64)>> = HashMap::new();
        for node in nodes.keys() {
            adjacency.entry(node.clone()).or_default();
        }
        for ((u, v), sim) in &edges {
            adjacency.entry(u.clone()).or_default().push((v.clone(), *sim));
            adjacency.entry(v.clone()).or_default().push((u.clone(), *sim));
        }
        Self {
            nodes,
            edges,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn offering(&self, id: &str) -> Option<&CourseOffering> {
        self.nodes.get(id)
    }

    pub fn offerings(&self) -> impl Iterator<Item = (&NodeId, &CourseOffering)> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, f64)> {
        self.edges.iter().map(|(k, sim)| (k, *sim))
    }

    /// Neighbors of `id` with their similarity, or an empty slice for an
    /// unknown node.
    pub fn neighbors(&self, id: &str) -> &[(NodeId, f64)] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn similarity(&self, u: &str, v: &str) -> Option<f64> {
        self.edges.get(&edge_key(u, v)).copied()
    }

    /// Distance between adjacent nodes: `1 - similarity`.
    pub fn distance(&self, u: &str, v: &str) -> Option<f64> {
        self.similarity(u, v).map(|sim| 1.0 - sim)
    }

    /// New graph keeping only edges with `similarity >= min_similarity`.
    /// The node set is unchanged; the base graph is not touched.
    pub fn filtered_view(&self, min_similarity: f64) -> CourseGraph {
        let edges = self
            .edges
            .iter()
            .filter(|(_, sim)| **sim >= min_similarity)
            .map(|(k, sim)| (k.clone(), *sim))
            .collect();
        CourseGraph::from_parts(self.nodes.clone(), edges)
    }

    /// New graph keeping an edge only when it ranks within the top `k`
    /// neighbors by similarity for both of its endpoints, ranked on this
    /// graph. Deterministic replacement for sequential per-node pruning.
    pub fn top_k_view(&self, k: usize) -> CourseGraph {
        let mut kept: BTreeSet<EdgeKey> = BTreeSet::new();
        let mut rank_ok: HashMap<&NodeId, BTreeSet<EdgeKey>> = HashMap::new();
        for (node, neighbors) in &self.adjacency {
            let mut ranked: Vec<&(NodeId, f64)> = neighbors.iter().collect();
            ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            let top: BTreeSet<EdgeKey> = ranked
                .into_iter()
                .take(k)
                .map(|(other, _)| edge_key(node, other))
                .collect();
            rank_ok.insert(node, top);
        }
        for key in self.edges.keys() {
            let (u, v) = key;
            let in_u = rank_ok.get(u).is_some_and(|set| set.contains(key));
            let in_v = rank_ok.get(v).is_some_and(|set| set.contains(key));
            if in_u && in_v {
                kept.insert(key.clone());
            }
        }
        let edges = self
            .edges
            .iter()
            .filter(|(key, _)| kept.contains(*key))
            .map(|(k, sim)| (k.clone(), *sim))
            .collect();
        CourseGraph::from_parts(self.nodes.clone(), edges)
    }

    /// Induced subgraph on the given node ids (unknown ids are ignored).
    /// Keeps an edge only when both endpoints are in the set.
    pub fn induced_subgraph(&self, ids: &[NodeId]) -> CourseGraph {
        let wanted: BTreeSet<&NodeId> = ids.iter().filter(|id| self.contains_node(id)).collect();
        let nodes: BTreeMap<NodeId, CourseOffering> = wanted
            .iter()
            .map(|id| ((*id).clone(), self.nodes[*id].clone()))
            .collect();
        let edges: BTreeMap<EdgeKey, f64> = self
            .edges
            .iter()
            .filter(|((u, v), _)| wanted.contains(u) && wanted.contains(v))
            .map(|(k, sim)| (k.clone(), *sim))
            .collect();
        CourseGraph::from_parts(nodes, edges)
    }
}
