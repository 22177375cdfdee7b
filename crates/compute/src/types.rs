use serde::{Deserialize, Serialize};

use crate::algorithms::kmeans::KmeansResult;

/// Index identifying a cluster within one run. Carries no meaning beyond
/// the run that produced it; external id generation belongs to callers.
pub type ClusterId = usize;

/// Metadata about one cluster, derived from a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: ClusterId,
    pub centroid: Vec<f64>,
    pub member_count: usize,
}

impl ClusterSummary {
    /// Build one summary per cluster from a K-means result.
    pub fn from_result(result: &KmeansResult) -> Vec<Self> {
        let mut counts = vec![0usize; result.centroids.len()];
        for &cluster in &result.assignments {
            counts[cluster] += 1;
        }

        result
            .centroids
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(id, (centroid, member_count))| Self {
                id,
                centroid: centroid.clone(),
                member_count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> KmeansResult {
        KmeansResult {
            centroids: vec![vec![0.0, 0.0], vec![10.0, 10.0]],
            assignments: vec![0, 0, 1, 0, 1],
            iterations: 3,
            converged: true,
            inertia: 1.5,
        }
    }

    #[test]
    fn member_counts_total_n() {
        let summaries = ClusterSummary::from_result(&result());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].member_count, 3);
        assert_eq!(summaries[1].member_count, 2);
        assert_eq!(
            summaries.iter().map(|s| s.member_count).sum::<usize>(),
            5
        );
    }

    #[test]
    fn ids_follow_centroid_order() {
        let summaries = ClusterSummary::from_result(&result());
        assert_eq!(summaries[0].id, 0);
        assert_eq!(summaries[0].centroid, vec![0.0, 0.0]);
        assert_eq!(summaries[1].id, 1);
        assert_eq!(summaries[1].centroid, vec![10.0, 10.0]);
    }

    #[test]
    fn summaries_serialize_for_sinks() {
        let summaries = ClusterSummary::from_result(&result());
        let json = serde_json::to_value(&summaries).unwrap();
        assert_eq!(json[0]["member_count"], 3);
        assert_eq!(json[1]["centroid"][0], 10.0);
    }
}
