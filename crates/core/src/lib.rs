pub mod config;
pub mod error;

pub use config::{ClusteringConfig, Config};
pub use error::*;
