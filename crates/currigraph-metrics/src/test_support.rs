use currigraph_core::{ComparedCourse, FallbackOrder, SimilarityRecord};
use currigraph_graph::{select_unit, CourseGraph, GraphBuilder, NodeIndex, RosterSelection};

const SEMESTER: &str = "2021F";

/// Graph with the given isolated nodes and weighted edges, all in one
/// semester. Node ids come out as `CODE|2021F`.
pub fn graph_from(isolated: &[&str], edges: &[(&str, &str, f64)]) -> CourseGraph {
    let mut records: Vec<SimilarityRecord> = isolated
        .iter()
        .map(|code| SimilarityRecord {
            codes: vec![code.to_string()],
            semester: SEMESTER.to_string(),
            compared: Vec::new(),
        })
        .collect();
    records.extend(edges.iter().map(|(u, v, sim)| SimilarityRecord {
        codes: vec![u.to_string()],
        semester: SEMESTER.to_string(),
        compared: vec![ComparedCourse {
            codes: vec![v.to_string()],
            semester: SEMESTER.to_string(),
            similarity: *sim,
        }],
    }));
    GraphBuilder::from_records(&records).build()
}

pub fn line_graph(edges: &[(&str, &str, f64)]) -> CourseGraph {
    graph_from(&[], edges)
}

/// Two offerings in different departments joined by one strong edge.
pub fn cross_department_graph() -> CourseGraph {
    line_graph(&[("MATH-111", "HIST-101", 0.9)])
}

/// Selection mapping `codes` against the graph in the shared semester,
/// with an explicit listed-codes set.
pub fn selection_of(graph: &CourseGraph, codes: &[&str], listed: &[&str]) -> RosterSelection {
    let index = NodeIndex::build(graph);
    let mut selection = select_unit(
        &index,
        &[(
            SEMESTER.to_string(),
            codes.iter().map(|c| c.to_string()).collect(),
        )],
        FallbackOrder::Lexicographic,
    );
    selection.listed_codes = listed.iter().map(|c| c.to_string()).collect();
    selection
}
