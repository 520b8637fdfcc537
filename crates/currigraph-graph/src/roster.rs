use crate::graph::CourseGraph;
use currigraph_core::{
    alias, parse_semester, semester_sort_key, FallbackOrder, NodeId, UnmappedCourse,
    COURSE_CODE_RE, SEMESTER_RE,
};
use std::collections::HashMap;

/// Indices of roster header columns that look like semesters (`2324F`).
pub fn semester_columns(headers: &[String]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| SEMESTER_RE.is_match(h.trim()))
        .map(|(i, _)| i)
        .collect()
}

/// Parse one roster cell into course codes. Cells are either JSON string
/// arrays (`["ECON-111","MATH-121"]`) or free text from which codes are
/// regex-extracted; both paths uppercase and alias-normalize.
pub fn parse_roster_cell(cell: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(cell) {
        return list
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| alias::normalize_code(&c.to_ascii_uppercase()))
            .collect();
    }
    COURSE_CODE_RE
        .find_iter(cell)
        .map(|m| alias::normalize_code(&m.as_str().to_ascii_uppercase()))
        .collect()
}

/// Lookup table from (code, semester) to graph nodes, with the documented
/// fallback for roster entries whose exact semester is not in the graph.
#[derive(Debug, Default)]
pub struct NodeIndex {
    exact: HashMap<(String, String), NodeId>,
    by_code: HashMap<String, Vec<(String, NodeId)>>,
}

impl NodeIndex {
    /// Build from the base graph. Mapping always runs against the full
    /// graph, not a pruned view, so lookups stay robust under top-K.
    pub fn build(graph: &CourseGraph) -> Self {
        let mut exact = HashMap::new();
        let mut by_code: HashMap<String, Vec<(String, NodeId)>> = HashMap::new();
        for (id, offering) in graph.offerings() {
            for code in &offering.codes {
                exact.insert((code.clone(), offering.semester.clone()), id.clone());
                by_code
                    .entry(code.clone())
                    .or_default()
                    .push((offering.semester.clone(), id.clone()));
            }
        }
        for candidates in by_code.values_mut() {
            candidates.sort();
        }
        Self { exact, by_code }
    }

    /// Exact (code, semester) match, then fallback: prefer the latest node
    /// for the code sharing the roster semester's term letter; otherwise
    /// the latest node for the code across any semester. "Latest" is
    /// decided by the configured comparator.
    pub fn lookup(&self, code: &str, semester: &str, order: FallbackOrder) -> Option<&NodeId> {
        if let Some(node) = self.exact.get(&(code.to_string(), semester.to_string())) {
            return Some(node);
        }
        let candidates = self.by_code.get(code)?;
        let target_term = parse_semester(semester).map(|(_, letter)| letter);
        if let Some(letter) = target_term {
            let same_term = candidates
                .iter()
                .filter(|(s, _)| parse_semester(s).map(|(_, l)| l) == Some(letter));
            if let Some(found) = Self::latest(same_term, order) {
                return Some(found);
            }
        }
        Self::latest(candidates.iter(), order)
    }

    fn latest<'a>(
        candidates: impl Iterator<Item = &'a (String, NodeId)>,
        order: FallbackOrder,
    ) -> Option<&'a NodeId> {
        candidates
            .max_by(|a, b| match order {
                FallbackOrder::Lexicographic => a.cmp(b),
                FallbackOrder::YearThenTerm => semester_sort_key(&a.0)
                    .cmp(&semester_sort_key(&b.0))
                    .then_with(|| a.1.cmp(&b.1)),
            })
            .map(|(_, node)| node)
    }
}

/// A unit's roster resolved against the graph. `listed_codes` keeps every
/// parsed code, mapped or not, because the subject-diversity metrics run
/// on listed codes rather than graph nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSelection {
    pub mapped: Vec<NodeId>,
    pub unmapped: Vec<UnmappedCourse>,
    pub listed_codes: Vec<String>,
}

/// Map a unit's per-semester course lists onto graph nodes. Unmapped
/// entries are recorded, never dropped; mapped ids come back sorted and
/// deduplicated.
pub fn select_unit(
    index: &NodeIndex,
    courses_by_semester: &[(String, Vec<String>)],
    order: FallbackOrder,
) -> RosterSelection {
    let mut selection = RosterSelection::default();
    for (semester, codes) in courses_by_semester {
        for code in codes {
            selection.listed_codes.push(code.clone());
            match index.lookup(code, semester, order) {
                Some(node) => selection.mapped.push(node.clone()),
                None => selection.unmapped.push(UnmappedCourse {
                    code: code.clone(),
                    semester: semester.clone(),
                }),
            }
        }
    }
    selection.mapped.sort();
    selection.mapped.dedup();
    selection
}
