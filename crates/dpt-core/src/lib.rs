//! dpt-core - Core region data structures for the dpt discrete pulse
//! transform engine.
//!
//! This crate provides the compressed, never-densified representation at
//! the heart of the LULU decomposition:
//!
//! - **[`ConnectedRegion`]** - a 4-connected, constant-value pixel set
//!   stored as per-row column intervals, with boundary enumeration, merge,
//!   and in-place mutation.
//! - **[`RegionStore`]** - an arena of live regions addressed by stable
//!   [`RegionId`]s.
//! - **[`Raster`]** - the only dense type in the engine, used at the system
//!   boundary (input images, label rasters, reconstructed output).

pub mod error;
pub mod raster;
pub mod region;
pub mod store;

pub use error::{Error, Result};
pub use raster::Raster;
pub use region::{ConnectedRegion, Interval, PaintMode};
pub use store::{RegionId, RegionStore};
