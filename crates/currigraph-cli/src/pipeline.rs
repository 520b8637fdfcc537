use crate::aggregate::{major_units, MajorUnit};
use crate::output::{write_majors_csv, write_students_csv};
use anyhow::{Context, Result};
use currigraph_core::AnalysisConfig;
use currigraph_graph::{
    load_similarity_records, parse_roster_cell, select_unit, semester_columns, CourseGraph,
    GraphBuilder, NodeIndex,
};
use currigraph_metrics::{MetricsEngine, MetricsRow};
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Load the similarity JSON and build the base graph plus the working view
/// (top-K pruned when configured). The base graph stays unpruned for node
/// mapping and global Rao distances.
fn build_graphs(graph_json: &Path, config: &AnalysisConfig) -> Result<(CourseGraph, CourseGraph)> {
    let records = load_similarity_records(graph_json)
        .with_context(|| format!("loading similarity JSON from {}", graph_json.display()))?;
    let base = GraphBuilder::from_records(&records).build();
    let working = match config.keep_top_k {
        Some(k) => {
            let pruned = base.top_k_view(k);
            info!(
                k,
                kept = pruned.edge_count(),
                dropped = base.edge_count() - pruned.edge_count(),
                "applied top-K neighbor pruning"
            );
            pruned
        }
        None => base.clone(),
    };
    Ok((base, working))
}

/// Full student pipeline: load, build, compute one row per roster row in
/// parallel, write the metrics CSV. Returns the number of rows written.
pub fn run_students(
    graph_json: &Path,
    students_csv: &Path,
    out_csv: &Path,
    config: &AnalysisConfig,
) -> Result<usize> {
    let (base, working) = build_graphs(graph_json, config)?;
    let index = NodeIndex::build(&base);

    let mut reader = csv::Reader::from_path(students_csv)
        .with_context(|| format!("opening roster CSV {}", students_csv.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading roster header")?
        .iter()
        .map(str::to_string)
        .collect();
    let sem_cols = semester_columns(&headers);
    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<std::result::Result<_, _>>()
        .context("reading roster rows")?;
    info!(
        students = records.len(),
        semester_columns = sem_cols.len(),
        "loaded roster"
    );

    let engine = MetricsEngine::new(&working, &base, config);
    let rows: Vec<MetricsRow> = records
        .par_iter()
        .enumerate()
        .map(|(index_in_file, record)| {
            let courses_by_semester: Vec<(String, Vec<String>)> = sem_cols
                .iter()
                .map(|&col| {
                    (
                        headers[col].clone(),
                        parse_roster_cell(record.get(col).unwrap_or("")),
                    )
                })
                .collect();
            let selection = select_unit(&index, &courses_by_semester, config.fallback_order);
            engine.compute_row(&format!("student #{index_in_file}"), &selection)
        })
        .collect();

    write_students_csv(out_csv, &headers, &sem_cols, &records, &rows)?;
    log_summary(&rows);
    Ok(rows.len())
}

/// NaN-ignoring end-of-run summary, mirroring what the scores used to get
/// eyeballed for after every batch.
fn log_summary(rows: &[MetricsRow]) {
    fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
        let finite: Vec<f64> = values.filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            f64::NAN
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        }
    }
    info!(
        mean_avg_distance = nan_mean(rows.iter().map(|r| r.avg_distance)),
        mean_rao_q_subject = nan_mean(rows.iter().map(|r| r.rao_q_subject)),
        mean_shannon_norm = nan_mean(rows.iter().map(|r| r.shannon_entropy_norm)),
        mean_difficulty = nan_mean(rows.iter().map(|r| r.avg_course_difficulty)),
        "run summary"
    );
}

/// Full major pipeline: the panel's units come from the graph itself, so
/// only the similarity JSON is needed. Returns the number of rows written.
pub fn run_majors(graph_json: &Path, out_csv: &Path, config: &AnalysisConfig) -> Result<usize> {
    let (base, working) = build_graphs(graph_json, config)?;
    let units: Vec<MajorUnit> = major_units(&base);
    info!(units = units.len(), "assembled major panel");

    let engine = MetricsEngine::new(&working, &base, config);
    let rows: Vec<MetricsRow> = units
        .par_iter()
        .map(|unit| {
            let label = format!("{} {}", unit.major, unit.semester);
            engine.compute_row(&label, &unit.selection)
        })
        .collect();

    write_majors_csv(out_csv, &units, &rows)?;
    log_summary(&rows);
    Ok(rows.len())
}
