pub mod builder;
pub mod canon;
pub mod graph;
pub mod loader;
pub mod roster;

pub use builder::GraphBuilder;
pub use canon::{canon_node_id, clean_codes};
pub use graph::{edge_key, CourseGraph, EdgeKey};
pub use loader::load_similarity_records;
pub use roster::{parse_roster_cell, select_unit, semester_columns, NodeIndex, RosterSelection};
