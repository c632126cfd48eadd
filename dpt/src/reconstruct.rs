//! Rasterises a subset of pulses back into an image.

use dpt_core::{PaintMode, Raster};
use thiserror::Error;

use crate::pulse::PulseMap;

/// Errors from [`reconstruct`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    /// A pulse's region geometry was recorded against a different raster
    /// shape than the one the caller asked to reconstruct into.
    #[error("reconstruction shape {expected:?} does not match pulse shape {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// The result of [`reconstruct`]: the painted raster plus a per-area
/// contribution summary.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    raster: Raster<i64>,
    areas: Vec<usize>,
    counts: Vec<usize>,
    total_pulses: usize,
}

impl Reconstruction {
    /// The reconstructed raster.
    pub fn raster(&self) -> &Raster<i64> {
        &self.raster
    }

    /// Sorted, ascending, unique areas that contributed at least one pulse
    /// within the requested threshold.
    pub fn areas(&self) -> &[usize] {
        &self.areas
    }

    /// Pulse count contributing at each entry of [`Reconstruction::areas`],
    /// same index alignment.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of pulses painted.
    pub fn total_pulses(&self) -> usize {
        self.total_pulses
    }
}

/// Paints every pulse with `min_area <= area <= max_area` (defaults `0,
/// usize::MAX`) additively into a zero raster of `shape`. With no
/// thresholds, the result equals the raster `pulses` was decomposed from.
pub fn reconstruct(
    pulses: &PulseMap,
    shape: (usize, usize),
    min_area: Option<usize>,
    max_area: Option<usize>,
) -> Result<Reconstruction, ReconstructError> {
    let min_area = min_area.unwrap_or(0);
    let max_area = max_area.unwrap_or(usize::MAX);

    let mut raster = Raster::filled(shape, 0i64);
    let mut areas = Vec::new();
    let mut counts = Vec::new();
    let mut total_pulses = 0;

    for (area, records) in pulses.groups() {
        if area < min_area || area > max_area {
            continue;
        }
        let mut count = 0;
        for record in records {
            let region = record.region();
            if region.shape() != shape {
                return Err(ReconstructError::ShapeMismatch {
                    expected: shape,
                    found: region.shape(),
                });
            }
            region.paint(&mut raster, record.value_delta(), PaintMode::Add);
            count += 1;
        }
        if count > 0 {
            areas.push(area);
            counts.push(count);
            total_pulses += count;
        }
    }

    Ok(Reconstruction {
        raster,
        areas,
        counts,
        total_pulses,
    })
}
