use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShoalError {
    #[error("Insufficient data: {found} vectors for k={k}")]
    InsufficientData { found: usize, k: usize },

    #[error("Dimension mismatch: vector {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}
