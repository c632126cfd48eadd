//! Error types for dpt-region

use thiserror::Error;

/// Errors that can occur during labelling and adjacency tracking.
#[derive(Debug, Error)]
pub enum RegionError {
    /// A lower-level region-store error (invariant violation while building
    /// an initial region from the label raster).
    #[error("core error: {0}")]
    Core(#[from] dpt_core::Error),
}

/// Result type for dpt-region operations.
pub type RegionResult<T> = std::result::Result<T, RegionError>;
