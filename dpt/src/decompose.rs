//! The LULU driver: repeatedly strips local extrema at ascending areas,
//! merging each into its closest-value neighbour and recording the
//! difference as a pulse.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use dpt_core::Raster;
use dpt_region::{connected_regions, AdjacencyIndex};
use thiserror::Error;

use crate::pulse::PulseMap;

/// Which of L (remove local minima) or U (remove local maxima) runs first
/// at each area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// L then U at each area.
    #[default]
    Lu,
    /// U then L at each area.
    Ul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Minimum,
    Maximum,
}

impl Operator {
    fn passes(self) -> [Extremum; 2] {
        match self {
            Operator::Lu => [Extremum::Minimum, Extremum::Maximum],
            Operator::Ul => [Extremum::Maximum, Extremum::Minimum],
        }
    }
}

/// Errors a decomposition can surface to the caller. Invariant violations
/// inside the region store (bad intervals, merging non-adjacent regions)
/// are programmer errors and panic instead of appearing here — see the
/// error-handling policy.
#[derive(Debug, Error)]
pub enum DecomposeError {
    /// The initial labelling failed to build a valid region store. Should
    /// not occur for a raster of finite integers; surfaced rather than
    /// panicking because it originates from user-supplied image data.
    #[error("labelling error: {0}")]
    Label(#[from] dpt_region::RegionError),

    /// Cooperative cancellation fired at an area boundary. `partial` holds
    /// every pulse emitted before the flag was observed; reconstructing
    /// from it will not reproduce the original raster.
    #[error("decomposition cancelled")]
    Cancelled { partial: PulseMap },
}

/// Decomposes `image` into pulses using `operator`, with no cancellation
/// support.
pub fn decompose(image: &Raster<i64>, operator: Operator) -> Result<PulseMap, DecomposeError> {
    decompose_cancellable(image, operator, None)
}

/// Decomposes `image` into pulses, checking `cancel` at each area boundary.
/// If `cancel` is observed `true`, returns `Err(DecomposeError::Cancelled)`
/// with every pulse emitted so far.
///
/// The region that survives once the raster is reduced to a single area
/// carries a non-zero value in general (the image's DC term); it is emitted
/// as a final pulse so the sum over all pulses reproduces the original
/// raster exactly, matching `original_source/examples/reconstruct.py`'s
/// reconstruction identity.
pub fn decompose_cancellable(
    image: &Raster<i64>,
    operator: Operator,
    cancel: Option<&AtomicBool>,
) -> Result<PulseMap, DecomposeError> {
    let shape = image.shape();
    let (_labels, mut store, ids) = connected_regions(image)?;
    let mut adjacency = AdjacencyIndex::build(&store, &ids);
    let mut pulses = PulseMap::new();

    let total_area = shape.0 * shape.1;
    let mut area = 1usize;
    while store.len() > 1 && area <= total_area {
        if let Some(flag) = cancel {
            if flag.load(Ordering::SeqCst) {
                return Err(DecomposeError::Cancelled { partial: pulses });
            }
        }
        for pass in operator.passes() {
            run_pass_to_fixpoint(&mut store, &mut adjacency, &mut pulses, area, pass);
        }
        area += 1;
    }

    let remaining = store.live_ids();
    debug_assert!(
        remaining.len() <= 1,
        "decomposition must terminate with at most one region covering the raster"
    );
    if let [final_id] = remaining[..] {
        let area = store.nnz(final_id);
        let value = store.get_value(final_id);
        let snapshot = store.snapshot(final_id);
        pulses.emit(area, snapshot, value);
    }

    Ok(pulses)
}

/// Drives a single L or U pass to completion at the given `area`: every
/// region with that area satisfying the extremum condition is absorbed
/// into its closest-value neighbour, with newly-equal-area merge results
/// added to the same pass's work queue.
fn run_pass_to_fixpoint(
    store: &mut dpt_core::RegionStore,
    adjacency: &mut AdjacencyIndex,
    pulses: &mut PulseMap,
    area: usize,
    kind: Extremum,
) {
    let mut queue: VecDeque<dpt_core::RegionId> = store
        .live_ids()
        .into_iter()
        .filter(|&id| store.nnz(id) == area)
        .collect();

    while let Some(x) = queue.pop_front() {
        if store.get(x).is_none() {
            continue; // merged away earlier in this pass
        }
        if store.nnz(x) != area {
            continue; // grew past this area via an earlier merge
        }

        let neighbours = adjacency.neighbours(x).clone();
        let v_x = store.get_value(x);
        let values: Vec<i64> = neighbours.iter().map(|&n| store.get_value(n)).collect();

        let is_extremum = match kind {
            Extremum::Maximum => values.is_empty() || v_x > *values.iter().max().unwrap(),
            Extremum::Minimum => values.is_empty() || v_x < *values.iter().min().unwrap(),
        };
        if !is_extremum || neighbours.is_empty() {
            continue;
        }

        let absorber = neighbours
            .iter()
            .copied()
            .min_by_key(|&n| ((store.get_value(n) - v_x).abs(), n))
            .expect("neighbours is non-empty");

        let delta = v_x - store.get_value(absorber);
        let snapshot = store.snapshot(x);
        pulses.emit(area, snapshot, delta);

        let merged = store
            .merge(absorber, x)
            .expect("a chosen absorber is, by construction, 4-adjacent to x");
        adjacency.on_merge(absorber, x);

        if store.nnz(merged) == area {
            queue.push_back(merged);
        }
    }
}
