//! Error types for compositing.

use sat_common::CommonError;
use thiserror::Error;

/// Errors that can occur while building or running a compositor.
#[derive(Error, Debug)]
pub enum CompositorError {
    /// The number of fractions does not match the number of inputs.
    #[error("fractions and projectables must have the same length ({fractions} fractions, {projectables} projectables)")]
    FractionCountMismatch {
        fractions: usize,
        projectables: usize,
    },

    /// A compositor received the wrong number of inputs.
    #[error("{compositor} expects {expected} inputs, got {actual}")]
    WrongInputCount {
        compositor: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Inputs cannot be aligned onto a common grid.
    #[error("incompatible areas: {0}")]
    IncompatibleAreas(String),

    /// Nothing to blend.
    #[error("no input arrays")]
    NoInputs,

    /// Compositor parameters are invalid.
    #[error("invalid compositor configuration: {0}")]
    InvalidConfig(String),

    /// Composite definition file could not be parsed.
    #[error("failed to parse composite definitions: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Composite definition file could not be read.
    #[error("failed to read composite definitions: {0}")]
    Io(#[from] std::io::Error),

    /// Composite name not present in the definitions.
    #[error("composite not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CompositorError {
    pub fn incompatible_areas(msg: impl Into<String>) -> Self {
        Self::IncompatibleAreas(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type for compositor operations.
pub type Result<T> = std::result::Result<T, CompositorError>;
