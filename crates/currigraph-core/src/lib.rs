pub mod alias;
pub mod config;
pub mod error;
pub mod types;

pub use alias::*;
pub use config::*;
pub use error::*;
pub use types::*;
