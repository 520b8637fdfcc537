pub mod clustering;
pub mod components;
pub mod diversity;
pub mod eccentricity;
pub mod engine;
pub mod rao;
pub mod shortest_path;

#[cfg(test)]
pub(crate) mod test_support;

pub use clustering::average_weighted_clustering;
pub use components::{connected_components, hop_diameter, largest_component};
pub use diversity::{subject_diversity, subject_probs, SubjectDiversity};
pub use eccentricity::weighted_eccentricity;
pub use engine::{average_course_difficulty, MetricsEngine, MetricsRow};
pub use rao::{rao_q_subject, rao_q_uniform};
pub use shortest_path::{all_pairs, pairwise_distances, single_source, Deadline};
