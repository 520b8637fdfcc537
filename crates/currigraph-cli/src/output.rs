use crate::aggregate::MajorUnit;
use currigraph_core::semester_sort_key;
use currigraph_metrics::MetricsRow;
use std::path::Path;
use tracing::info;

/// Computed columns, in output order. Shared between the student and major
/// writers so both CSVs stay mechanically comparable.
pub const METRIC_COLUMNS: [&str; 22] = [
    "n_courses_listed",
    "n_crosslisted",
    "n_courses_mapped",
    "n_courses_unmapped",
    "n_components",
    "largest_component",
    "avg_distance",
    "max_distance",
    "rao_q_uniform",
    "rao_q_subject",
    "ecc_radius_weighted",
    "ecc_diameter_weighted",
    "avg_clustering_similarity",
    "progression_depth_hops",
    "avg_course_difficulty",
    "shannon_entropy",
    "shannon_entropy_norm",
    "simpson_index",
    "hhi_index",
    "n_subjects",
    "component_sizes_sorted",
    "unmapped_example",
];

/// NaN serializes as an empty field, matching what the original pandas
/// pipeline wrote, so downstream notebooks keep parsing these files.
fn fmt_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value}")
    }
}

fn fmt_sizes(sizes: &[usize]) -> String {
    let inner: Vec<String> = sizes.iter().map(ToString::to_string).collect();
    format!("[{}]", inner.join(", "))
}

pub fn metric_fields(row: &MetricsRow) -> Vec<String> {
    vec![
        row.n_courses_listed.to_string(),
        row.n_crosslisted.to_string(),
        row.n_mapped.to_string(),
        row.n_unmapped.to_string(),
        row.n_components.to_string(),
        row.largest_component.to_string(),
        fmt_float(row.avg_distance),
        fmt_float(row.max_distance),
        fmt_float(row.rao_q_uniform),
        fmt_float(row.rao_q_subject),
        fmt_float(row.ecc_radius),
        fmt_float(row.ecc_diameter),
        fmt_float(row.avg_clustering),
        row.progression_depth.to_string(),
        fmt_float(row.avg_course_difficulty),
        fmt_float(row.shannon_entropy),
        fmt_float(row.shannon_entropy_norm),
        fmt_float(row.simpson_index),
        fmt_float(row.hhi_index),
        row.n_subjects.to_string(),
        fmt_sizes(&row.component_sizes),
        row.unmapped_example.clone(),
    ]
}

/// Student output: original non-semester columns first, then the computed
/// columns, then semester columns sorted chronologically (year, then
/// F < J < S).
pub fn write_students_csv(
    path: &Path,
    headers: &[String],
    semester_cols: &[usize],
    records: &[csv::StringRecord],
    rows: &[MetricsRow],
) -> currigraph_core::Result<()> {
    let mut sorted_semesters = semester_cols.to_vec();
    sorted_semesters.sort_by_key(|&i| semester_sort_key(&headers[i]));
    let other_cols: Vec<usize> = (0..headers.len())
        .filter(|i| !semester_cols.contains(i))
        .collect();

    let mut writer = csv::Writer::from_path(path)?;
    let mut header_row: Vec<&str> = other_cols.iter().map(|&i| headers[i].as_str()).collect();
    header_row.extend(METRIC_COLUMNS);
    header_row.extend(sorted_semesters.iter().map(|&i| headers[i].as_str()));
    writer.write_record(&header_row)?;

    for (record, row) in records.iter().zip(rows) {
        let mut fields: Vec<String> = other_cols
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();
        fields.extend(metric_fields(row));
        fields.extend(
            sorted_semesters
                .iter()
                .map(|&i| record.get(i).unwrap_or("").to_string()),
        );
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    info!(rows = rows.len(), path = %path.display(), "wrote student metrics");
    Ok(())
}

/// Major panel output: unit key columns, then the shared computed columns.
pub fn write_majors_csv(
    path: &Path,
    units: &[MajorUnit],
    rows: &[MetricsRow],
) -> currigraph_core::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header_row = vec!["semester", "major", "n_majors"];
    header_row.extend(METRIC_COLUMNS);
    writer.write_record(&header_row)?;

    for (unit, row) in units.iter().zip(rows) {
        let mut fields = vec![
            unit.semester.clone(),
            unit.major.clone(),
            unit.n_majors.to_string(),
        ];
        fields.extend(metric_fields(row));
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    info!(rows = rows.len(), path = %path.display(), "wrote major metrics");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_floats_serialize_empty() {
        assert_eq!(fmt_float(f64::NAN), "");
        assert_eq!(fmt_float(0.5), "0.5");
    }

    #[test]
    fn sizes_render_like_a_list() {
        assert_eq!(fmt_sizes(&[5, 3, 1]), "[5, 3, 1]");
        assert_eq!(fmt_sizes(&[]), "[]");
    }
}
