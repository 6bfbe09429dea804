//! Error types for level-1b reading.

use sat_common::CommonError;
use thiserror::Error;

/// Result type for reader operations.
pub type L1bResult<T> = Result<T, L1bError>;

/// Error types for level-1b reading.
#[derive(Error, Debug)]
pub enum L1bError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Labeled array error (bad dims, time attribute, ...)
    #[error(transparent)]
    Common(#[from] CommonError),
}
