//! Error types for dpt-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal representation details.

use thiserror::Error;

/// Errors that can occur while constructing or mutating a [`crate::region::ConnectedRegion`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A region failed invariant validation at construction or mutation time:
    /// non-monotonic/overlapping intervals, an empty leading/trailing row,
    /// a pixel set that is not 4-connected, or a row range that does not
    /// fit within `shape`.
    #[error("invalid region: {reason}")]
    InvalidRegion { reason: String },

    /// A coordinate fell outside `shape` in a membership or paint query.
    #[error("coordinate ({row}, {col}) is out of bounds for shape {shape:?}")]
    OutOfBounds {
        row: i64,
        col: i64,
        shape: (usize, usize),
    },
}

/// Result type alias for dpt-core operations.
pub type Result<T> = std::result::Result<T, Error>;
