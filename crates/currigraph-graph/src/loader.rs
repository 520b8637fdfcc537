use currigraph_core::{ComparedCourse, Result, SimilarityRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw similarity JSON as the embedding collaborator produces it. Course
/// codes arrive either as a single string or a list; that duck typing is
/// normalized here, once, and nothing downstream ever sees it again.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    course_codes: Option<OneOrMany>,
    #[serde(default)]
    semester: String,
    #[serde(default)]
    compared_courses: Option<Vec<RawComparison>>,
}

#[derive(Debug, Deserialize)]
struct RawComparison {
    #[serde(default)]
    course_codes: Option<OneOrMany>,
    #[serde(default)]
    semester: String,
    #[serde(default)]
    similarity_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(code) => vec![code],
            OneOrMany::Many(codes) => codes,
        }
    }
}

/// Load and normalize similarity records. A missing or unreadable file is
/// fatal; individual records missing required fields are skipped with a
/// diagnostic and the rest of the batch continues.
pub fn load_similarity_records(path: &Path) -> Result<Vec<SimilarityRecord>> {
    let raw = fs::read_to_string(path)?;
    let parsed: Vec<RawRecord> = serde_json::from_str(&raw)?;
    info!(entries = parsed.len(), path = %path.display(), "loaded similarity JSON");

    let mut records = Vec::with_capacity(parsed.len());
    let mut skipped_records = 0usize;
    let mut skipped_comparisons = 0usize;

    for (index, entry) in parsed.into_iter().enumerate() {
        let codes = entry
            .course_codes
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if codes.iter().all(|c| c.trim().is_empty()) {
            warn!(index, "similarity record has no course codes, skipping");
            skipped_records += 1;
            continue;
        }

        let mut compared = Vec::new();
        for comparison in entry.compared_courses.unwrap_or_default() {
            let dst_codes = comparison
                .course_codes
                .map(OneOrMany::into_vec)
                .unwrap_or_default();
            if dst_codes.iter().all(|c| c.trim().is_empty()) {
                skipped_comparisons += 1;
                continue;
            }
            let similarity = match comparison.similarity_score {
                Some(score) if (0.0..=1.0).contains(&score) => score,
                Some(score) => {
                    warn!(index, score, "similarity score outside [0, 1], skipping pair");
                    skipped_comparisons += 1;
                    continue;
                }
                None => {
                    skipped_comparisons += 1;
                    continue;
                }
            };
            compared.push(ComparedCourse {
                codes: dst_codes,
                semester: comparison.semester,
                similarity,
            });
        }

        records.push(SimilarityRecord {
            codes,
            semester: entry.semester,
            compared,
        });
    }

    if skipped_records > 0 || skipped_comparisons > 0 {
        debug!(skipped_records, skipped_comparisons, "dropped malformed similarity entries");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_str(json: &str) -> Vec<SimilarityRecord> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        load_similarity_records(file.path()).unwrap()
    }

    #[test]
    fn accepts_string_or_list_codes() {
        let records = load_str(
            r#"[
                {"course_codes": "ECON-111", "semester": "2021F",
                 "compared_courses": [{"course_codes": ["MATH-121"], "semester": "2021F", "similarity_score": 0.8}]},
                {"course_codes": ["AMST-200", "EDST-200"], "semester": "2021F", "compared_courses": []}
            ]"#,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].codes, vec!["ECON-111"]);
        assert_eq!(records[1].codes.len(), 2);
        assert_eq!(records[0].compared[0].similarity, 0.8);
    }

    #[test]
    fn skips_records_without_codes_and_pairs_without_scores() {
        let records = load_str(
            r#"[
                {"semester": "2021F"},
                {"course_codes": "ECON-111", "semester": "2021F",
                 "compared_courses": [
                    {"course_codes": ["MATH-121"], "semester": "2021F"},
                    {"course_codes": ["HIST-101"], "semester": "2021F", "similarity_score": 1.7},
                    {"course_codes": ["PHIL-213"], "semester": "2021F", "similarity_score": 0.5}
                 ]}
            ]"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].compared.len(), 1);
        assert_eq!(records[0].compared[0].codes, vec!["PHIL-213"]);
    }

    #[test]
    fn missing_file_is_fatal() {
        assert!(load_similarity_records(Path::new("/nonexistent/similarity.json")).is_err());
    }
}
