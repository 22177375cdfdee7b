use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use shoal_core::ShoalError;

use super::distance::squared_euclidean;

/// Configuration for a single K-means run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KmeansConfig {
    /// Number of clusters.
    pub k: usize,
    /// Upper bound on refinement iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Convergence threshold: the run stops once the fraction of vectors
    /// changing cluster between iterations drops below this value.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Explicit seed for the random source. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-4
}

impl KmeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            seed: None,
        }
    }

    /// Configure a deterministic seed. Repeated runs on the same input
    /// then produce identical results.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of a full batch K-means run.
#[derive(Debug, Clone, Serialize)]
pub struct KmeansResult {
    /// Final centroid vectors, indexed by cluster id.
    ///
    /// When the run converged, these are the centroids the final
    /// assignment was evaluated against: the update step for the
    /// converged pass is skipped.
    pub centroids: Vec<Vec<f64>>,
    /// Cluster index for each input vector, in input order.
    pub assignments: Vec<usize>,
    /// Number of refinement iterations performed (1-indexed).
    pub iterations: usize,
    /// True when the tolerance test ended the run, false when the
    /// iteration cap did. Neither outcome is an error.
    pub converged: bool,
    /// Sum of squared distances from each vector to its assigned centroid.
    pub inertia: f64,
}

/// Run Lloyd's K-means with K-means++ seeding.
///
/// Seeds a [`StdRng`] from `config.seed` when set, otherwise from
/// entropy. Use [`kmeans_with_rng`] to supply the random source directly.
pub fn kmeans(vectors: &[Vec<f64>], config: &KmeansConfig) -> Result<KmeansResult, ShoalError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    kmeans_with_rng(vectors, config, &mut rng)
}

/// Run Lloyd's K-means with K-means++ seeding and a caller-supplied
/// random source.
///
/// `rng` drives centroid seeding and empty-cluster recovery; everything
/// else is deterministic, so a fixed `rng` gives reproducible output.
/// `config.seed` is ignored on this path.
///
/// # Errors
/// * [`ShoalError::InsufficientData`] when `vectors` is empty or shorter
///   than `config.k`.
/// * [`ShoalError::DimensionMismatch`] when the vectors do not all share
///   the first vector's length (checked before any seeding).
///
/// # Panics
/// Panics if `config.k` is 0.
pub fn kmeans_with_rng<R: Rng>(
    vectors: &[Vec<f64>],
    config: &KmeansConfig,
    rng: &mut R,
) -> Result<KmeansResult, ShoalError> {
    assert!(config.k >= 1, "kmeans: k must be at least 1");
    validate(vectors, config.k)?;

    let n = vectors.len();
    let start = std::time::Instant::now();

    let mut centroids = kmeanspp_init(vectors, config.k, rng);

    // Sentinel: every vector counts as changed on the first pass.
    let mut assignments = vec![usize::MAX; n];
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iterations {
        iterations += 1;

        // Assignment step: reassign every vector to its nearest centroid.
        let mut changed = 0usize;
        for (i, vector) in vectors.iter().enumerate() {
            let nearest = nearest_centroid(vector, &centroids);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed += 1;
            }
        }

        let changed_fraction = changed as f64 / n as f64;
        debug!(
            "Iteration {}: {} of {} assignments changed ({:.4})",
            iterations, changed, n, changed_fraction
        );

        if changed_fraction < config.tolerance {
            // Stable. Keep the centroids this assignment was evaluated
            // against; the update for the converged pass is skipped.
            converged = true;
            break;
        }

        update_centroids(vectors, &assignments, &mut centroids, rng);
    }

    let mut inertia = 0.0;
    for (vector, &cluster) in vectors.iter().zip(assignments.iter()) {
        inertia += squared_euclidean(vector, &centroids[cluster]);
    }

    info!(
        "K-means: k={}, {} points, {} iterations, inertia={:.2}, {} ({:.1}ms)",
        config.k,
        n,
        iterations,
        inertia,
        if converged { "converged" } else { "hit iteration cap" },
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(KmeansResult {
        centroids,
        assignments,
        iterations,
        converged,
        inertia,
    })
}

/// Entry validation: enough vectors for k, uniform dimension.
fn validate(vectors: &[Vec<f64>], k: usize) -> Result<(), ShoalError> {
    if vectors.is_empty() || vectors.len() < k {
        return Err(ShoalError::InsufficientData {
            found: vectors.len(),
            k,
        });
    }

    let dim = vectors[0].len();
    for (index, vector) in vectors.iter().enumerate() {
        if vector.len() != dim {
            return Err(ShoalError::DimensionMismatch {
                index,
                expected: dim,
                found: vector.len(),
            });
        }
    }

    Ok(())
}

// ── Internal steps ───────────────────────────────────────────

/// K-means++ initialization: pick k centroids with D²-weighted sampling.
///
/// The first centroid is drawn uniformly; each subsequent one with
/// probability proportional to its squared distance to the nearest
/// already-chosen centroid. Points coinciding with a chosen centroid
/// carry weight 0 and are never drawn. Centroids are copies of the
/// chosen vectors, never aliases into the input.
fn kmeanspp_init<R: Rng>(vectors: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut centroids = Vec::with_capacity(k);

    let first = rng.gen_range(0..n);
    centroids.push(vectors[first].clone());

    let mut weights = vec![0.0f64; n];
    while centroids.len() < k {
        let mut total = 0.0;
        for (i, vector) in vectors.iter().enumerate() {
            let nearest = centroids
                .iter()
                .map(|c| squared_euclidean(vector, c))
                .fold(f64::MAX, f64::min);
            weights[i] = nearest;
            total += nearest;
        }

        let chosen = if total > 0.0 {
            weighted_index(&weights, total, rng)
        } else {
            // Every point coincides with an existing centroid; any pick
            // works, keep it uniform.
            rng.gen_range(0..n)
        };

        centroids.push(vectors[chosen].clone());
    }

    centroids
}

/// Draw an index with probability proportional to its weight.
/// Caller guarantees `total > 0`.
fn weighted_index<R: Rng>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let mut target = rng.gen::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        target -= w;
        if target <= 0.0 && w > 0.0 {
            return i;
        }
    }
    // Floating-point slack left target slightly positive: take the last
    // index that had any weight.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Find the index of the nearest centroid. Ties go to the lowest index,
/// keeping results reproducible for a fixed centroid order.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_euclidean(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    best_idx
}

/// Update step: recompute each centroid as the elementwise mean of its
/// assigned vectors.
///
/// A cluster that attracted no members is reseeded with a uniformly
/// random input vector, so every pass ends with exactly k centroids.
fn update_centroids<R: Rng>(
    vectors: &[Vec<f64>],
    assignments: &[usize],
    centroids: &mut Vec<Vec<f64>>,
    rng: &mut R,
) {
    let k = centroids.len();
    let dim = vectors[0].len();

    let mut new_centroids = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (vector, &cluster) in vectors.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for (j, &val) in vector.iter().enumerate() {
            new_centroids[cluster][j] += val;
        }
    }

    for (c, centroid) in new_centroids.iter_mut().enumerate() {
        if counts[c] > 0 {
            let count = counts[c] as f64;
            for val in centroid.iter_mut() {
                *val /= count;
            }
        } else {
            let reseed = rng.gen_range(0..vectors.len());
            debug!("Cluster {} emptied, reseeded from vector {}", c, reseed);
            centroid.clone_from(&vectors[reseed]);
        }
    }

    *centroids = new_centroids;
}
