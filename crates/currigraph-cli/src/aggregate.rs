use currigraph_core::{semester_sort_key, UnmappedCourse};
use currigraph_graph::{CourseGraph, RosterSelection};
use std::collections::{BTreeMap, BTreeSet};

/// Token used for both the all-majors and all-semesters rollups.
pub const ALL: &str = "ALL";

/// One row of the major panel: a (major, semester) cell, an ALL-majors
/// rollup per semester, or a per-major ALL-semesters rollup. `n_majors`
/// carries the panel's coverage count: 1 for a plain cell, the number of
/// majors present for a semester rollup, and the number of semesters the
/// major appears in for a major rollup.
#[derive(Debug, Clone)]
pub struct MajorUnit {
    pub semester: String,
    pub major: String,
    pub n_majors: usize,
    pub selection: RosterSelection,
}

fn selection_for(nodes: &[(&String, &currigraph_core::CourseOffering)]) -> RosterSelection {
    let mut mapped: Vec<String> = nodes.iter().map(|(id, _)| (*id).clone()).collect();
    mapped.sort();
    mapped.dedup();
    let mut listed_codes = Vec::new();
    for (_, offering) in nodes {
        listed_codes.extend(offering.codes.iter().cloned());
    }
    RosterSelection {
        mapped,
        unmapped: Vec::new(),
        listed_codes,
    }
}

/// Build the major panel from the graph itself: majors are the
/// alias-normalized department prefixes observed on nodes, and a major's
/// roster is every offering it owns. A (major, semester) cell with no
/// offerings still gets a row, its absence recorded as an unmapped
/// diagnostic rather than silently skipped.
pub fn major_units(graph: &CourseGraph) -> Vec<MajorUnit> {
    let mut semesters: BTreeSet<String> = BTreeSet::new();
    let mut majors: BTreeSet<String> = BTreeSet::new();
    for (_, offering) in graph.offerings() {
        semesters.insert(offering.semester.clone());
        majors.extend(offering.subjects());
    }

    // (major, semester) -> member nodes, computed in one pass.
    let mut cells: BTreeMap<(String, String), Vec<(&String, &currigraph_core::CourseOffering)>> =
        BTreeMap::new();
    for (id, offering) in graph.offerings() {
        for subject in offering.subjects() {
            cells
                .entry((subject, offering.semester.clone()))
                .or_default()
                .push((id, offering));
        }
    }

    let mut ordered_semesters: Vec<&String> = semesters.iter().collect();
    ordered_semesters.sort_by_key(|s| semester_sort_key(s));

    let mut units = Vec::new();
    for semester in &ordered_semesters {
        let mut majors_present = 0usize;
        for major in &majors {
            let members = cells
                .get(&((*major).clone(), (*semester).clone()))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let mut selection = selection_for(members);
            if members.is_empty() {
                selection.unmapped.push(UnmappedCourse {
                    code: (*major).clone(),
                    semester: (*semester).clone(),
                });
            } else {
                majors_present += 1;
            }
            units.push(MajorUnit {
                semester: (*semester).clone(),
                major: (*major).clone(),
                n_majors: 1,
                selection,
            });
        }

        // ALL-majors rollup for this semester.
        let members: Vec<(&String, &currigraph_core::CourseOffering)> = graph
            .offerings()
            .filter(|(_, offering)| &offering.semester == *semester)
            .collect();
        units.push(MajorUnit {
            semester: (*semester).clone(),
            major: ALL.to_string(),
            n_majors: majors_present,
            selection: selection_for(&members),
        });
    }

    // Per-major rollup across every semester.
    for major in &majors {
        let mut members: Vec<(&String, &currigraph_core::CourseOffering)> = Vec::new();
        let mut semesters_with_major: BTreeSet<&String> = BTreeSet::new();
        for semester in &ordered_semesters {
            if let Some(cell) = cells.get(&(major.clone(), (*semester).clone())) {
                members.extend(cell.iter().copied());
                semesters_with_major.insert(semester);
            }
        }
        units.push(MajorUnit {
            semester: ALL.to_string(),
            major: major.clone(),
            n_majors: semesters_with_major.len(),
            selection: selection_for(&members),
        });
    }
    units
}
