use currigraph_core::AnalysisConfig;
use currigraph_cli::{run_majors, run_students};
use std::fs;
use std::path::PathBuf;

const SIMILARITY_JSON: &str = r#"[
    {"course_codes": ["MATH-111"], "semester": "2324F", "compared_courses": [
        {"course_codes": ["MATH-211"], "semester": "2324F", "similarity_score": 0.92},
        {"course_codes": ["HIST-104"], "semester": "2324F", "similarity_score": 0.35}
    ]},
    {"course_codes": ["AMST-200", "EDST-200"], "semester": "2324F", "compared_courses": [
        {"course_codes": ["HIST-104"], "semester": "2324F", "similarity_score": 0.81}
    ]},
    {"course_codes": ["MATH-211"], "semester": "2223F", "compared_courses": []}
]"#;

const ROSTER_CSV: &str = "StudentID,notes,2324F,2223F\n\
s1,transfer,\"[\"\"MATH-111\"\",\"\"MATH-211\"\"]\",\"['MATH-211']\"\n\
s2,,Took AMST-200 and GHST-999 this fall,\n";

fn write_inputs(dir: &tempfile::TempDir) -> (PathBuf, PathBuf) {
    let graph_json = dir.path().join("similarity.json");
    let roster_csv = dir.path().join("students.csv");
    fs::write(&graph_json, SIMILARITY_JSON).unwrap();
    fs::write(&roster_csv, ROSTER_CSV).unwrap();
    (graph_json, roster_csv)
}

#[test]
fn students_pipeline_writes_reordered_columns() {
    let dir = tempfile::tempdir().unwrap();
    let (graph_json, roster_csv) = write_inputs(&dir);
    let out = dir.path().join("metrics.csv");

    let written = run_students(&graph_json, &roster_csv, &out, &AnalysisConfig::default()).unwrap();
    assert_eq!(written, 2);

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    // Original non-semester columns first, semester columns last in
    // chronological order.
    assert_eq!(headers[0], "StudentID");
    assert_eq!(headers[1], "notes");
    assert_eq!(&headers[headers.len() - 2..], ["2223F", "2324F"]);
    assert!(headers.contains(&"avg_distance".to_string()));
    assert!(headers.contains(&"hhi_index".to_string()));

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    // Student 1: three listed codes, each mapping exactly to its own
    // semester's node (MATH-211 appears in both years as distinct nodes).
    assert_eq!(rows[0].get(col("n_courses_listed")).unwrap(), "3");
    assert_eq!(rows[0].get(col("n_courses_mapped")).unwrap(), "3");
    assert_eq!(rows[0].get(col("n_courses_unmapped")).unwrap(), "0");
    // Student 2: AMST-200 maps to the cross-listed node, GHST-999 cannot.
    assert_eq!(rows[1].get(col("n_courses_mapped")).unwrap(), "1");
    assert_eq!(rows[1].get(col("n_courses_unmapped")).unwrap(), "1");
    assert_eq!(rows[1].get(col("unmapped_example")).unwrap(), "GHST-999 (2324F)");
    assert_eq!(rows[1].get(col("n_crosslisted")).unwrap(), "1");
    // Singleton subgraph sentinels: empty avg_distance, zero eccentricity.
    assert_eq!(rows[1].get(col("avg_distance")).unwrap(), "");
    assert_eq!(rows[1].get(col("ecc_radius_weighted")).unwrap(), "0");
}

#[test]
fn majors_pipeline_emits_rollup_rows() {
    let dir = tempfile::tempdir().unwrap();
    let (graph_json, _) = write_inputs(&dir);
    let out = dir.path().join("majors.csv");

    let written = run_majors(&graph_json, &out, &AnalysisConfig::default()).unwrap();
    assert!(written > 0);

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(&headers[..3], ["semester", "major", "n_majors"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let has = |semester: &str, major: &str| {
        rows.iter()
            .any(|r| r.get(0).unwrap() == semester && r.get(1).unwrap() == major)
    };
    assert!(has("2324F", "MATH"));
    assert!(has("2324F", "ALL"));
    assert!(has("ALL", "MATH"));
    // Semester rollups appear for every observed semester.
    assert!(has("2223F", "ALL"));
}

#[test]
fn missing_similarity_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("metrics.csv");
    let result = run_majors(
        &dir.path().join("missing.json"),
        &out,
        &AnalysisConfig::default(),
    );
    assert!(result.is_err());
}
