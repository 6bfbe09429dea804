//! Error types for labeled array operations.

use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised while building or reshaping labeled arrays.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("array has {ndim} axes but {labels} dimension labels were given")]
    DimensionCount { ndim: usize, labels: usize },

    #[error("dimension '{0}' appears more than once")]
    DuplicateDimension(String),

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("index {index} is out of bounds for dimension '{dim}' of length {len}")]
    IndexOutOfBounds { dim: String, index: usize, len: usize },

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("invalid array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    #[error("attribute '{key}' is not a {expected}")]
    AttributeType { key: String, expected: &'static str },

    #[error("invalid time format: {0}")]
    InvalidTime(String),
}
