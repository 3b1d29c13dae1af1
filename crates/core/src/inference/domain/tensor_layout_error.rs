use thiserror::Error;

/// A model produced output that does not match the documented layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorLayoutError {
    #[error("expected detection tensor of shape [1, 1, N, 7], got {0:?}")]
    DetectionShape(Vec<usize>),
    #[error("expected {expected} class probabilities, got {actual}")]
    ProbabilityCount { expected: usize, actual: usize },
}
