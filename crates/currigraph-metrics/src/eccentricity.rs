use crate::components::largest_component;
use crate::shortest_path::{single_source, Deadline};
use currigraph_core::Result;
use currigraph_graph::CourseGraph;

/// Weighted radius and diameter on the largest connected component of the
/// subgraph. (NaN, NaN) for an empty subgraph, (0.0, 0.0) for a singleton
/// component.
pub fn weighted_eccentricity(
    subgraph: &CourseGraph,
    deadline: Option<Deadline>,
) -> Result<(f64, f64)> {
    if subgraph.node_count() == 0 {
        return Ok((f64::NAN, f64::NAN));
    }
    let members = largest_component(subgraph);
    if members.len() <= 1 {
        return Ok((0.0, 0.0));
    }
    let component = subgraph.induced_subgraph(&members);

    let mut radius = f64::INFINITY;
    let mut diameter = 0.0_f64;
    for node in component.node_ids() {
        let lengths = single_source(&component, node, deadline)?;
        let eccentricity = lengths.values().fold(0.0_f64, |acc, d| acc.max(*d));
        radius = radius.min(eccentricity);
        diameter = diameter.max(eccentricity);
    }
    Ok((radius, diameter))
}
