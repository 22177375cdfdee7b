pub mod algorithms;
pub mod engine;
pub mod representatives;
pub mod types;

pub use algorithms::distance::{cosine_similarity, euclidean};
pub use algorithms::kmeans::{kmeans, kmeans_with_rng, KmeansConfig, KmeansResult};
pub use engine::{ClusterEngine, ClusterOutput};
pub use representatives::{representatives, Representative, DEFAULT_TOP_N};
pub use types::{ClusterId, ClusterSummary};
