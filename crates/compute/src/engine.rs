use std::time::Instant;

use tracing::info;

use shoal_core::ShoalError;

use crate::algorithms::kmeans::{kmeans, KmeansConfig, KmeansResult};
use crate::representatives::{representatives, Representative, DEFAULT_TOP_N};
use crate::types::ClusterSummary;

/// Everything one clustering pass produces: the raw driver result,
/// per-cluster summaries, and ranked representatives.
#[derive(Debug)]
pub struct ClusterOutput<P> {
    pub result: KmeansResult,
    pub summaries: Vec<ClusterSummary>,
    pub representatives: Vec<Vec<Representative<P>>>,
}

/// Front door for callers: cluster a batch of embeddings and derive the
/// per-cluster summary data in one call.
pub struct ClusterEngine {
    config: KmeansConfig,
    top_n: usize,
}

impl ClusterEngine {
    pub fn new(config: KmeansConfig) -> Self {
        Self {
            config,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Keep `top_n` representatives per cluster instead of the default.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Cluster `vectors` and rank the index-aligned `payloads` within
    /// each resulting cluster.
    pub fn run<P>(
        &self,
        vectors: &[Vec<f64>],
        payloads: Vec<P>,
    ) -> Result<ClusterOutput<P>, ShoalError> {
        let start = Instant::now();

        let result = kmeans(vectors, &self.config)?;
        let summaries = ClusterSummary::from_result(&result);
        let representatives = representatives(vectors, payloads, &result, self.top_n);

        info!(
            "Clustering complete in {:.1}ms: k={}, {} vectors, {} iterations",
            start.elapsed().as_secs_f64() * 1000.0,
            self.config.k,
            vectors.len(),
            result.iterations,
        );

        Ok(ClusterOutput {
            result,
            summaries,
            representatives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![11.0, 10.0],
        ]
    }

    #[test]
    fn full_pass_produces_consistent_output() {
        let vectors = two_groups();
        let engine = ClusterEngine::new(KmeansConfig::new(2).with_seed(9)).with_top_n(2);

        let output = engine.run(&vectors, vec!["a", "b", "c", "d", "e", "f"]).unwrap();

        assert_eq!(output.result.centroids.len(), 2);
        assert_eq!(output.summaries.len(), 2);
        assert_eq!(output.representatives.len(), 2);
        assert_eq!(
            output.summaries.iter().map(|s| s.member_count).sum::<usize>(),
            6
        );
        for reps in &output.representatives {
            assert!(reps.len() <= 2);
        }
    }

    #[test]
    fn facade_matches_manual_pipeline_under_same_seed() {
        let vectors = two_groups();
        let config = KmeansConfig::new(2).with_seed(17);

        let manual_result = kmeans(&vectors, &config).unwrap();
        let manual_reps =
            representatives(&vectors, vec![0, 1, 2, 3, 4, 5], &manual_result, DEFAULT_TOP_N);

        let output = ClusterEngine::new(config)
            .run(&vectors, vec![0, 1, 2, 3, 4, 5])
            .unwrap();

        assert_eq!(output.result.assignments, manual_result.assignments);
        assert_eq!(output.result.centroids, manual_result.centroids);
        for (a, b) in output.representatives.iter().zip(manual_reps.iter()) {
            let ids_a: Vec<i32> = a.iter().map(|r| r.payload).collect();
            let ids_b: Vec<i32> = b.iter().map(|r| r.payload).collect();
            assert_eq!(ids_a, ids_b);
        }
    }

    #[test]
    fn propagates_driver_errors() {
        let vectors = vec![vec![1.0, 2.0]];
        let engine = ClusterEngine::new(KmeansConfig::new(3));
        let err = engine.run(&vectors, vec!["only"]).unwrap_err();
        assert!(matches!(err, ShoalError::InsufficientData { .. }));
    }
}
