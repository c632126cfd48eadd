//! dpt - 2D discrete pulse transform via LULU operators.
//!
//! Decomposes an integer raster into additive pulses over maximal
//! 4-connected constant-value regions by alternately stripping local minima
//! (L) and local maxima (U) at ascending region areas, and reconstructs a
//! raster from a (possibly thresholded) subset of those pulses.
//!
//! # Example
//!
//! ```
//! use dpt::{decompose, reconstruct, Operator};
//! use dpt_core::Raster;
//!
//! let image = Raster::from_rows(vec![vec![1, 1, 2], vec![1, 1, 2], vec![3, 3, 3]]);
//! let pulses = decompose(&image, Operator::Lu).unwrap();
//! let result = reconstruct(&pulses, image.shape(), None, None).unwrap();
//! assert_eq!(result.raster().data(), image.data());
//! ```

pub mod decompose;
pub mod pulse;
pub mod reconstruct;
#[cfg(feature = "rand-support")]
pub mod testing;

pub use decompose::{decompose, decompose_cancellable, DecomposeError, Operator};
pub use dpt_region::connected_regions;
pub use pulse::{PulseMap, PulseRecord};
pub use reconstruct::{reconstruct, Reconstruction, ReconstructError};

// Re-export the core data types consumers need to inspect regions directly.
pub use dpt_core::{ConnectedRegion, Error as CoreError, Interval, PaintMode, Raster, RegionId, RegionStore};
