use currigraph_graph::CourseGraph;

/// Mean local clustering coefficient with similarity as the edge weight,
/// averaged over every node of the subgraph.
///
/// Per-node coefficient is the geometric-mean generalization: triangle
/// contributions are cbrt of the product of the three edge weights, each
/// normalized by the maximum weight in the subgraph, scaled by
/// 1 / (k * (k - 1)). Nodes with fewer than two neighbors contribute 0.
/// NaN for graphs with at most one node.
pub fn average_weighted_clustering(subgraph: &CourseGraph) -> f64 {
    let n = subgraph.node_count();
    if n <= 1 {
        return f64::NAN;
    }
    let max_weight = subgraph.edges().map(|(_, sim)| sim).fold(0.0_f64, f64::max);
    if max_weight <= 0.0 {
        // No usable edges: every local coefficient is 0.
        return 0.0;
    }

    let mut total = 0.0;
    for node in subgraph.node_ids() {
        let neighbors = subgraph.neighbors(node);
        let degree = neighbors.len();
        if degree < 2 {
            continue;
        }
        let mut triangles = 0.0;
        for (i, (v, sim_uv)) in neighbors.iter().enumerate() {
            for (w, sim_uw) in neighbors.iter().skip(i + 1) {
                if let Some(sim_vw) = subgraph.similarity(v, w) {
                    triangles += ((sim_uv / max_weight)
                        * (sim_uw / max_weight)
                        * (sim_vw / max_weight))
                        .cbrt();
                }
            }
        }
        total += 2.0 * triangles / (degree as f64 * (degree - 1) as f64);
    }
    total / n as f64
}
