//! dpt-region - Connected-component labelling and adjacency tracking for the
//! dpt discrete pulse transform engine.
//!
//! - **[`label::connected_regions`]** - two-pass union-find labeller turning
//!   a dense raster into a populated `RegionStore`.
//! - **[`AdjacencyIndex`]** - the region-adjacency graph, addressed by
//!   `RegionId` and kept in sync across merges.

pub mod adjacency;
pub mod error;
pub mod label;

pub use adjacency::AdjacencyIndex;
pub use error::{RegionError, RegionResult};
pub use label::connected_regions;
