use crate::clustering::average_weighted_clustering;
use crate::components::{connected_components, hop_diameter, largest_component};
use crate::diversity::{subject_diversity, SubjectDiversity};
use crate::eccentricity::weighted_eccentricity;
use crate::rao::{rao_q_subject, rao_q_uniform};
use crate::shortest_path::{pairwise_distances, Deadline};
use currigraph_core::{course_level, AnalysisConfig, Result};
use currigraph_graph::{CourseGraph, RosterSelection};
use serde::Serialize;
use tracing::warn;

/// Every metric for one analysis unit, plus diagnostics. A row is a pure
/// function of (graph, selection, config); recomputing it from the same
/// inputs yields the same values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsRow {
    pub n_courses_listed: usize,
    pub n_crosslisted: usize,
    pub n_mapped: usize,
    pub n_unmapped: usize,

    // Cohesion metrics on the filtered view.
    pub n_components: usize,
    pub largest_component: usize,
    pub component_sizes: Vec<usize>,

    // Distance metrics on the unfiltered induced subgraph.
    pub avg_distance: f64,
    pub max_distance: f64,

    pub rao_q_uniform: f64,
    pub rao_q_subject: f64,

    pub ecc_radius: f64,
    pub ecc_diameter: f64,
    pub avg_clustering: f64,
    pub progression_depth: usize,
    pub avg_course_difficulty: f64,

    // Subject diversity from listed codes, graph-independent.
    pub shannon_entropy: f64,
    pub shannon_entropy_norm: f64,
    pub simpson_index: f64,
    pub hhi_index: f64,
    pub n_subjects: usize,

    pub unmapped_example: String,
}

/// Computes metric rows against a shared, read-only graph pair: the
/// working graph (optionally top-K pruned) for induced subgraphs, and the
/// unpruned base graph for global Rao distances.
pub struct MetricsEngine<'a> {
    working: &'a CourseGraph,
    base: &'a CourseGraph,
    config: &'a AnalysisConfig,
}

/// How many unmapped entries and component sizes make it into diagnostics.
const UNMAPPED_PREVIEW: usize = 6;
const COMPONENT_PREVIEW: usize = 10;

impl<'a> MetricsEngine<'a> {
    pub fn new(working: &'a CourseGraph, base: &'a CourseGraph, config: &'a AnalysisConfig) -> Self {
        Self {
            working,
            base,
            config,
        }
    }

    /// Compute one unit's row. Failures in the expensive distance block
    /// (including the per-unit time guard) degrade that block to NaNs and
    /// never propagate; the cheap metrics are always computed.
    pub fn compute_row(&self, unit: &str, selection: &RosterSelection) -> MetricsRow {
        let deadline = self.config.unit_time_budget.map(Deadline::after);
        let subgraph = self.working.induced_subgraph(&selection.mapped);
        let n_mapped = subgraph.node_count();

        let n_crosslisted = selection
            .mapped
            .iter()
            .filter_map(|id| self.working.offering(id))
            .filter(|offering| offering.is_cross_listed())
            .count();

        let (avg_distance, max_distance, rao_uniform, rao_subject, ecc) =
            match self.distance_block(&subgraph, selection, n_mapped, deadline) {
                Ok(values) => values,
                Err(error) => {
                    warn!(unit, %error, "distance metrics degraded to NaN");
                    (f64::NAN, f64::NAN, f64::NAN, f64::NAN, (f64::NAN, f64::NAN))
                }
            };

        let avg_clustering = if n_mapped <= 1 {
            f64::NAN
        } else {
            average_weighted_clustering(&subgraph)
        };

        let filtered = subgraph.filtered_view(self.config.min_similarity);
        let components = connected_components(&filtered);
        let component_sizes: Vec<usize> = components.iter().map(Vec::len).collect();
        let n_components = component_sizes.len();
        let largest = component_sizes.first().copied().unwrap_or(0);

        let progression_depth = {
            let members = largest_component(&filtered);
            if members.len() <= 1 {
                0
            } else {
                hop_diameter(&filtered.induced_subgraph(&members))
            }
        };

        let SubjectDiversity {
            shannon,
            shannon_norm,
            simpson,
            hhi,
            n_subjects,
        } = subject_diversity(&selection.listed_codes, self.config.log_base);

        MetricsRow {
            n_courses_listed: selection.listed_codes.len(),
            n_crosslisted,
            n_mapped,
            n_unmapped: selection.unmapped.len(),
            n_components,
            largest_component: largest,
            component_sizes: component_sizes.into_iter().take(COMPONENT_PREVIEW).collect(),
            avg_distance,
            max_distance,
            rao_q_uniform: rao_uniform,
            rao_q_subject: rao_subject,
            ecc_radius: ecc.0,
            ecc_diameter: ecc.1,
            avg_clustering,
            progression_depth,
            avg_course_difficulty: average_course_difficulty(&selection.listed_codes),
            shannon_entropy: shannon,
            shannon_entropy_norm: shannon_norm,
            simpson_index: simpson,
            hhi_index: hhi,
            n_subjects,
            unmapped_example: selection
                .unmapped
                .iter()
                .take(UNMAPPED_PREVIEW)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// The Dijkstra-heavy metrics, grouped so one deadline covers them.
    #[allow(clippy::type_complexity)]
    fn distance_block(
        &self,
        subgraph: &CourseGraph,
        selection: &RosterSelection,
        n_mapped: usize,
        deadline: Option<Deadline>,
    ) -> Result<(f64, f64, f64, f64, (f64, f64))> {
        let distances = pairwise_distances(subgraph, self.config.unreachable_pairs, deadline)?;
        let (avg_distance, max_distance) = if n_mapped <= 1 || distances.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            let mean = distances.iter().sum::<f64>() / distances.len() as f64;
            let max = distances.iter().fold(0.0_f64, |acc, d| acc.max(*d));
            (mean, max)
        };
        let rao_uniform = rao_q_uniform(n_mapped, &distances);
        let rao_subject = rao_q_subject(
            self.base,
            subgraph,
            &selection.mapped,
            &selection.listed_codes,
            self.config.rao_mode,
            deadline,
        )?;
        let ecc = weighted_eccentricity(subgraph, deadline)?;
        Ok((avg_distance, max_distance, rao_uniform, rao_subject, ecc))
    }
}

/// Mean hundreds-level across all listed codes; NaN when no code carries a
/// three-digit level.
pub fn average_course_difficulty(listed_codes: &[String]) -> f64 {
    let levels: Vec<f64> = listed_codes
        .iter()
        .filter_map(|code| course_level(code))
        .map(|level| level as f64)
        .collect();
    if levels.is_empty() {
        f64::NAN
    } else {
        levels.iter().sum::<f64>() / levels.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{graph_from, selection_of};
    use approx::assert_relative_eq;
    use currigraph_core::UnmappedCourse;

    fn sample_graph() -> CourseGraph {
        graph_from(
            &["E-400"],
            &[
                ("A-100", "B-200", 0.9),
                ("B-200", "C-300", 0.8),
                ("C-300", "D-100", 0.4),
            ],
        )
    }

    #[test]
    fn zero_mapped_nodes_hit_the_sentinel_row() {
        let graph = sample_graph();
        let config = AnalysisConfig::default();
        let engine = MetricsEngine::new(&graph, &graph, &config);
        let row = engine.compute_row("empty", &RosterSelection::default());
        assert_eq!(row.n_mapped, 0);
        assert_eq!(row.n_components, 0);
        assert_eq!(row.largest_component, 0);
        assert!(row.avg_distance.is_nan());
        assert!(row.max_distance.is_nan());
        assert!(row.rao_q_uniform.is_nan());
        assert!(row.ecc_radius.is_nan());
        assert!(row.avg_clustering.is_nan());
        assert_eq!(row.progression_depth, 0);
    }

    #[test]
    fn single_mapped_node_hits_the_sentinel_row() {
        let graph = sample_graph();
        let config = AnalysisConfig::default();
        let engine = MetricsEngine::new(&graph, &graph, &config);
        let selection = selection_of(&graph, &["E-400"], &["E-400"]);
        let row = engine.compute_row("singleton", &selection);
        assert_eq!(row.n_mapped, 1);
        assert!(row.avg_distance.is_nan());
        assert_eq!(row.rao_q_uniform, 0.0);
        assert_eq!((row.ecc_radius, row.ecc_diameter), (0.0, 0.0));
        assert!(row.avg_clustering.is_nan());
        assert_eq!(row.n_components, 1);
        assert_eq!(row.largest_component, 1);
        assert_eq!(row.progression_depth, 0);
    }

    #[test]
    fn connected_pair_has_expected_metrics() {
        let graph = sample_graph();
        let config = AnalysisConfig::default();
        let engine = MetricsEngine::new(&graph, &graph, &config);
        let selection = selection_of(&graph, &["A-100", "B-200"], &["A-100", "B-200"]);
        let row = engine.compute_row("pair", &selection);
        assert_eq!(row.n_mapped, 2);
        assert_relative_eq!(row.avg_distance, 0.1, max_relative = 1e-9);
        assert_relative_eq!(row.max_distance, 0.1, max_relative = 1e-9);
        assert_relative_eq!(row.rao_q_uniform, 0.05, max_relative = 1e-9);
        assert_relative_eq!(row.ecc_radius, 0.1, max_relative = 1e-9);
        // 0.9 >= 0.75 so the pair stays connected in the filtered view.
        assert_eq!(row.n_components, 1);
        assert_eq!(row.progression_depth, 1);
        assert_relative_eq!(row.avg_course_difficulty, 150.0);
    }

    #[test]
    fn weak_edges_fragment_the_filtered_view_only() {
        let graph = sample_graph();
        let config = AnalysisConfig::default();
        let engine = MetricsEngine::new(&graph, &graph, &config);
        let selection = selection_of(&graph, &["C-300", "D-100"], &["C-300", "D-100"]);
        let row = engine.compute_row("weak", &selection);
        // Distances still use the 0.4 edge...
        assert_relative_eq!(row.avg_distance, 0.6, max_relative = 1e-9);
        // ...but the filtered view at 0.75 drops it.
        assert_eq!(row.n_components, 2);
        assert_eq!(row.largest_component, 1);
        assert_eq!(row.progression_depth, 0);
    }

    #[test]
    fn unmapped_preview_is_truncated_and_ordered() {
        let graph = sample_graph();
        let config = AnalysisConfig::default();
        let engine = MetricsEngine::new(&graph, &graph, &config);
        let mut selection = RosterSelection::default();
        for i in 0..8 {
            selection.unmapped.push(UnmappedCourse {
                code: format!("GHST-10{i}"),
                semester: "2021F".into(),
            });
        }
        let row = engine.compute_row("ghosts", &selection);
        assert_eq!(row.n_unmapped, 8);
        assert_eq!(row.unmapped_example.matches(',').count(), 5);
        assert!(row.unmapped_example.starts_with("GHST-100 (2021F)"));
    }
}
