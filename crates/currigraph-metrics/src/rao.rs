use crate::diversity::subject_probs;
use crate::shortest_path::{all_pairs, single_source, Deadline};
use currigraph_core::{NodeId, RaoMode, Result};
use currigraph_graph::CourseGraph;
use std::collections::{HashMap, HashSet};

/// Rao's quadratic entropy with uniform node probabilities:
/// `Q = ((N - 1) / N) * mean(pairwise distances)`.
/// NaN for zero nodes, 0.0 for a single node, NaN when the distance pool
/// is empty (every pair unreachable under the exclude policy).
pub fn rao_q_uniform(n_mapped: usize, pairwise: &[f64]) -> f64 {
    match n_mapped {
        0 => f64::NAN,
        1 => 0.0,
        n => {
            if pairwise.is_empty() {
                f64::NAN
            } else {
                let mean = pairwise.iter().sum::<f64>() / pairwise.len() as f64;
                ((n - 1) as f64 / n as f64) * mean
            }
        }
    }
}

/// Rao's quadratic entropy over subjects: `Q = Σ_i Σ_j p_i p_j d_ij` with
/// p_i from the listed codes (cross-listing weight-split) and d_ij the mean
/// observed distance between courses tagged i and courses tagged j.
///
/// The distance source depends on the mode: geodesic distances on the
/// unit's induced subgraph, geodesic distances on the full base graph
/// restricted to the unit's mapped nodes, or direct-edge lookups. Subject
/// pairs with no observation fall back to distance 1.0; d_ii is 0.
pub fn rao_q_subject(
    base: &CourseGraph,
    subgraph: &CourseGraph,
    mapped: &[NodeId],
    listed_codes: &[String],
    mode: RaoMode,
    deadline: Option<Deadline>,
) -> Result<f64> {
    let probs = subject_probs(listed_codes);
    if probs.is_empty() {
        return Ok(f64::NAN);
    }
    if probs.len() == 1 {
        return Ok(0.0);
    }
    if mapped.len() <= 1 {
        return Ok(f64::NAN);
    }

    let graph_for_subjects = match mode {
        RaoMode::Global => base,
        _ => subgraph,
    };
    let node_subjects: HashMap<&NodeId, Vec<String>> = mapped
        .iter()
        .filter_map(|id| graph_for_subjects.offering(id).map(|o| (id, o.subjects())))
        .collect();

    let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();
    let mut observe = |si: &[String], sj: &[String], distance: f64| {
        for i in si {
            for j in sj {
                if i == j {
                    continue;
                }
                let entry = sums.entry((i.clone(), j.clone())).or_insert((0.0, 0));
                entry.0 += distance;
                entry.1 += 1;
            }
        }
    };

    match mode {
        RaoMode::Geodesic => {
            let lengths = all_pairs(subgraph, deadline)?;
            for (u, from_u) in &lengths {
                let Some(su) = node_subjects.get(u) else { continue };
                for (v, distance) in from_u {
                    if v == u {
                        continue;
                    }
                    let Some(sv) = node_subjects.get(v) else { continue };
                    observe(su, sv, *distance);
                }
            }
        }
        RaoMode::Global => {
            let mapped_set: HashSet<&NodeId> = mapped.iter().collect();
            for u in mapped {
                let Some(su) = node_subjects.get(u) else { continue };
                let from_u = single_source(base, u, deadline)?;
                for (v, distance) in &from_u {
                    if v == u || !mapped_set.contains(v) {
                        continue;
                    }
                    let Some(sv) = node_subjects.get(v) else { continue };
                    observe(su, sv, *distance);
                }
            }
        }
        RaoMode::Edge => {
            for (i, u) in mapped.iter().enumerate() {
                let Some(su) = node_subjects.get(u) else { continue };
                for v in mapped.iter().skip(i + 1) {
                    let Some(sv) = node_subjects.get(v) else { continue };
                    let distance = subgraph.distance(u, v).unwrap_or(1.0);
                    observe(su, sv, distance);
                    observe(sv, su, distance);
                }
            }
        }
    }

    let d = |i: &str, j: &str| -> f64 {
        if i == j {
            return 0.0;
        }
        match sums.get(&(i.to_string(), j.to_string())) {
            Some((sum, count)) if *count > 0 => sum / *count as f64,
            _ => 1.0,
        }
    };

    let mut q = 0.0;
    for (i, p_i) in &probs {
        for (j, p_j) in &probs {
            q += p_i * p_j * d(i, j);
        }
    }
    Ok(q)
}
