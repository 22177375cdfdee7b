//! Post-clustering projection: rank each cluster's members by cosine
//! similarity to the cluster centroid and keep the best few.

use std::cmp::Ordering;

use serde::Serialize;

use crate::algorithms::distance::cosine_similarity;
use crate::algorithms::kmeans::KmeansResult;

/// Default number of representatives kept per cluster.
pub const DEFAULT_TOP_N: usize = 5;

/// A cluster member ranked by similarity to its cluster centroid.
#[derive(Debug, Clone, Serialize)]
pub struct Representative<P> {
    /// Caller payload, carried through untouched.
    pub payload: P,
    /// Cosine similarity between the member vector and the centroid.
    pub similarity: f64,
}

/// Select the `top_n` most representative members of every cluster.
///
/// `payloads` is index-aligned with `vectors` and never inspected; each
/// one ends up in the cluster its vector was assigned to. Output lists
/// are sorted by descending similarity (stable, so ties keep input
/// order) and may be shorter than `top_n`. A cluster with no members
/// yields an empty list.
///
/// # Panics
/// Panics if `payloads` or the result's assignments disagree with
/// `vectors` in length.
pub fn representatives<P>(
    vectors: &[Vec<f64>],
    payloads: Vec<P>,
    result: &KmeansResult,
    top_n: usize,
) -> Vec<Vec<Representative<P>>> {
    assert_eq!(
        vectors.len(),
        payloads.len(),
        "representatives: payloads must be index-aligned with vectors"
    );
    assert_eq!(
        vectors.len(),
        result.assignments.len(),
        "representatives: result does not match vectors"
    );

    let mut clusters: Vec<Vec<Representative<P>>> =
        (0..result.centroids.len()).map(|_| Vec::new()).collect();

    for ((vector, payload), &cluster) in vectors
        .iter()
        .zip(payloads)
        .zip(result.assignments.iter())
    {
        let similarity = cosine_similarity(vector, &result.centroids[cluster]);
        clusters[cluster].push(Representative {
            payload,
            similarity,
        });
    }

    for members in clusters.iter_mut() {
        members.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        members.truncate(top_n);
    }

    clusters
}
