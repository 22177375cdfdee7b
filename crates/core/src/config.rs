use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub clustering: ClusteringConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            clustering: ClusteringConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  clustering:  k={}, max_iterations={}, tolerance={}, top_n={}",
            self.clustering
                .k
                .map(|k| k.to_string())
                .unwrap_or_else(|| "(unset)".to_string()),
            self.clustering.max_iterations,
            self.clustering.tolerance,
            self.clustering.top_n,
        );
    }

    /// Return a view safe for API responses.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "clustering": {
                "k": self.clustering.k,
                "max_iterations": self.clustering.max_iterations,
                "tolerance": self.clustering.tolerance,
                "top_n": self.clustering.top_n,
            },
        })
    }
}

// ── Clustering ────────────────────────────────────────────────

/// Defaults for clustering runs. `k` has no sensible default and stays
/// unset unless the environment provides one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub k: Option<usize>,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub top_n: usize,
}

impl ClusteringConfig {
    fn from_env() -> Self {
        Self {
            k: env_opt("CLUSTER_K").and_then(|v| v.parse().ok()),
            max_iterations: env_usize("CLUSTER_MAX_ITERATIONS", 100),
            tolerance: env_f64("CLUSTER_TOLERANCE", 1e-4),
            top_n: env_usize("CLUSTER_TOP_N", 5),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            k: None,
            max_iterations: 100,
            tolerance: 1e-4,
            top_n: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clustering_defaults() {
        let config = ClusteringConfig::default();
        assert_eq!(config.k, None);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn summary_has_no_surprises() {
        let config = Config {
            clustering: ClusteringConfig::default(),
        };
        let summary = config.summary();
        assert_eq!(summary["clustering"]["max_iterations"], 100);
        assert_eq!(summary["clustering"]["top_n"], 5);
    }
}
