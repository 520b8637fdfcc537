use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical node identity: sorted, alias-normalized course codes joined
/// with `|`, followed by the semester token (e.g. `AMST-200|EDST-200|2223F`).
pub type NodeId = String;

/// Course codes like `ECON-111` or `PSYC-498D`, including slash-joined
/// cross-listing prefixes such as `AMST/ENGL-221`.
pub static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]{2,5}-\d{2,4}[A-Za-z]?").expect("course code regex"));

/// Semester tokens: four digits plus an uppercase term letter, e.g. `2324F`.
pub static SEMESTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})([A-Z])$").expect("semester regex"));

static COURSE_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(\d{3})").expect("course level regex"));

/// One course offering in one semester. `codes` is sorted and non-empty;
/// more than one code means the offering is cross-listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOffering {
    pub codes: Vec<String>,
    pub semester: String,
}

impl CourseOffering {
    pub fn is_cross_listed(&self) -> bool {
        self.codes.len() > 1
    }

    /// Alias-normalized department prefixes of all codes, deduplicated.
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = self
            .codes
            .iter()
            .flat_map(|code| subjects_of_code(code))
            .collect();
        subjects.sort();
        subjects.dedup();
        subjects
    }
}

/// Normalized similarity observation after loading: one source offering and
/// its compared neighbors. Codes are already plain `Vec<String>` here; the
/// string-or-list duck typing of the raw JSON never leaves the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRecord {
    pub codes: Vec<String>,
    pub semester: String,
    pub compared: Vec<ComparedCourse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparedCourse {
    pub codes: Vec<String>,
    pub semester: String,
    pub similarity: f64,
}

/// A roster entry that could not be matched to any graph node, kept for
/// diagnostics instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedCourse {
    pub code: String,
    pub semester: String,
}

impl fmt::Display for UnmappedCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.semester)
    }
}

/// Academic term letter. Chronological order within a year is F < J < S;
/// unknown letters sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Term {
    Fall,
    January,
    Spring,
    Other,
}

impl Term {
    pub fn from_letter(letter: char) -> Self {
        match letter {
            'F' => Term::Fall,
            'J' => Term::January,
            'S' => Term::Spring,
            _ => Term::Other,
        }
    }
}

/// Split a semester token into `(year, term_letter)`, or `None` when it does
/// not match the `^\d{4}[A-Z]$` shape.
pub fn parse_semester(semester: &str) -> Option<(String, char)> {
    let caps = SEMESTER_RE.captures(semester.trim())?;
    let year = caps.get(1)?.as_str().to_string();
    let letter = caps.get(2)?.as_str().chars().next()?;
    Some((year, letter))
}

/// Sort key for semester tokens: year first, then F < J < S, unknown last.
pub fn semester_sort_key(semester: &str) -> (String, Term) {
    match parse_semester(semester) {
        Some((year, letter)) => (year, Term::from_letter(letter)),
        None => (semester.to_string(), Term::Other),
    }
}

/// Department prefixes of one code, split on `/` for slash-joined
/// cross-listings (`AMST/ENGL-221` -> `["AMST", "ENGL"]`), uppercased and
/// alias-normalized. Codes with no alphabetic prefix yield nothing.
pub fn subjects_of_code(code: &str) -> Vec<String> {
    let prefix = match code.split_once('-') {
        Some((prefix, _)) => prefix.trim(),
        None => return Vec::new(),
    };
    prefix
        .split('/')
        .map(str::trim)
        .filter(|p| p.len() >= 2 && p.len() <= 5 && p.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|p| crate::alias::normalize_department(&p.to_ascii_uppercase()).to_string())
        .collect()
}

/// Hundreds level from the first three-digit block after the dash:
/// `ECON-361` -> 300. `None` when the code has no such block.
pub fn course_level(code: &str) -> Option<u32> {
    let caps = COURSE_LEVEL_RE.captures(code)?;
    let level: u32 = caps.get(1)?.as_str().parse().ok()?;
    Some((level / 100) * 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_split_slash_prefixes() {
        assert_eq!(subjects_of_code("AMST/ENGL-221"), vec!["AMST", "ENGL"]);
        assert_eq!(subjects_of_code("econ-111"), vec!["ECON"]);
        assert!(subjects_of_code("221").is_empty());
    }

    #[test]
    fn course_level_takes_hundreds() {
        assert_eq!(course_level("ECON-361"), Some(300));
        assert_eq!(course_level("PSYC-498D"), Some(400));
        assert_eq!(course_level("MATH-1"), None);
    }

    #[test]
    fn semester_sort_orders_year_then_term() {
        let mut semesters = vec!["2324S", "2324F", "2223S", "2324J"];
        semesters.sort_by_key(|s| semester_sort_key(s));
        assert_eq!(semesters, vec!["2223S", "2324F", "2324J", "2324S"]);
    }

    #[test]
    fn cross_listed_offering_reports_subjects() {
        let offering = CourseOffering {
            codes: vec!["AMST-200".into(), "EDST-200".into()],
            semester: "2223F".into(),
        };
        assert!(offering.is_cross_listed());
        assert_eq!(offering.subjects(), vec!["AMST", "EDST"]);
    }
}
