use crate::canon::{canon_node_id, clean_codes};
use crate::graph::{edge_key, CourseGraph, EdgeKey};
use currigraph_core::{CourseOffering, NodeId, SimilarityRecord};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Accumulates similarity observations into the base graph. Self-pairs are
/// dropped (heavily cross-listed courses get compared against themselves
/// upstream) and repeated observations of a pair keep the MAX similarity.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: BTreeMap<NodeId, CourseOffering>,
    edges: BTreeMap<EdgeKey, f64>,
    self_pairs: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[SimilarityRecord]) -> Self {
        let mut builder = Self::new();
        for record in records {
            builder.add_record(record);
        }
        builder
    }

    fn register_node(&mut self, codes: &[String], semester: &str) -> NodeId {
        let id = canon_node_id(codes, semester);
        self.nodes.entry(id.clone()).or_insert_with(|| CourseOffering {
            codes: clean_codes(codes),
            semester: semester.trim().to_string(),
        });
        id
    }

    pub fn add_record(&mut self, record: &SimilarityRecord) {
        let source = self.register_node(&record.codes, &record.semester);
        for comparison in &record.compared {
            let target = self.register_node(&comparison.codes, &comparison.semester);
            if source == target {
                self.self_pairs += 1;
                continue;
            }
            let key = edge_key(&source, &target);
            let entry = self.edges.entry(key).or_insert(comparison.similarity);
            if comparison.similarity > *entry {
                *entry = comparison.similarity;
            }
        }
    }

    pub fn build(self) -> CourseGraph {
        if self.self_pairs > 0 {
            debug!(self_pairs = self.self_pairs, "dropped self-comparison artifacts");
        }
        let graph = CourseGraph::from_parts(self.nodes, self.edges);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built similarity graph"
        );
        graph
    }
}
