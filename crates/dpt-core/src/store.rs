//! `RegionStore`: an arena of live [`ConnectedRegion`]s addressed by stable
//! IDs.
//!
//! The region adjacency graph is cyclic and dense (every region borders
//! several others, symmetrically), so nothing here holds an owning
//! back-reference; everything else (`AdjacencyIndex`, `PulseEmitter`) refers
//! to regions by [`RegionId`] only.

use std::num::NonZeroU32;

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::region::{ConnectedRegion, Interval, PaintMode};

/// A stable identifier for a region owned by a [`RegionStore`].
///
/// `NonZeroU32`-backed so `Option<RegionId>` is pointer-sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(NonZeroU32);

impl RegionId {
    fn from_index(index: usize) -> Self {
        RegionId(NonZeroU32::new(index as u32 + 1).expect("index + 1 is never zero"))
    }

    fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0.get())
    }
}

/// Owning arena of [`ConnectedRegion`]s. Merged-away regions free their slot
/// for reuse, so live storage shrinks monotonically as a decomposition
/// proceeds.
#[derive(Debug, Default)]
pub struct RegionStore {
    slots: Vec<Option<ConnectedRegion>>,
    free: Vec<u32>,
}

impl RegionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and inserts a new region, returning its ID.
    pub fn create(
        &mut self,
        shape: (usize, usize),
        value: i64,
        start_row: usize,
        row_spans: Vec<Vec<Interval>>,
    ) -> Result<RegionId> {
        let region = ConnectedRegion::create(shape, value, start_row, row_spans)?;
        Ok(self.insert(region))
    }

    /// Inserts an already-validated region, returning its ID. Used by
    /// `Labeller`, which constructs regions directly.
    pub fn insert(&mut self, region: ConnectedRegion) -> RegionId {
        if let Some(slot) = self.free.pop() {
            let idx = slot as usize;
            self.slots[idx] = Some(region);
            RegionId::from_index(idx)
        } else {
            self.slots.push(Some(region));
            RegionId::from_index(self.slots.len() - 1)
        }
    }

    /// Borrows a live region, or `None` if `id` does not (or no longer)
    /// address one.
    pub fn get(&self, id: RegionId) -> Option<&ConnectedRegion> {
        self.slots.get(id.to_index()).and_then(|s| s.as_ref())
    }

    fn get_mut(&mut self, id: RegionId) -> Option<&mut ConnectedRegion> {
        self.slots.get_mut(id.to_index()).and_then(|s| s.as_mut())
    }

    /// Borrows a live region, panicking with a diagnostic if `id` is stale.
    /// A stale ID reaching the store is a driver bug, not user input (see
    /// the error-handling policy), so this aborts rather than returning a
    /// `Result`.
    fn expect(&self, id: RegionId) -> &ConnectedRegion {
        self.get(id)
            .unwrap_or_else(|| panic!("RegionStore: id {id} does not address a live region"))
    }

    /// IDs of every currently live region, in ascending order.
    pub fn live_ids(&self) -> Vec<RegionId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| RegionId::from_index(i)))
            .collect()
    }

    /// Number of currently live regions.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether the store holds no live regions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paints the region's value into a zeroed raster.
    pub fn to_dense(&self, id: RegionId) -> Raster<i64> {
        self.expect(id).to_dense()
    }

    /// Cached pixel count.
    pub fn nnz(&self, id: RegionId) -> usize {
        self.expect(id).nnz()
    }

    /// Membership test.
    pub fn contains(&self, id: RegionId, row: usize, col: usize) -> bool {
        self.expect(id).contains(row, col)
    }

    /// See [`ConnectedRegion::outside_boundary`].
    pub fn outside_boundary(&self, id: RegionId) -> Vec<(i64, i64)> {
        self.expect(id).outside_boundary()
    }

    /// See [`ConnectedRegion::inside_boundary`].
    pub fn inside_boundary(&self, id: RegionId) -> Vec<(usize, usize)> {
        self.expect(id).inside_boundary()
    }

    /// The tight bounding box of the region's occupied pixels.
    pub fn bounding_box(&self, id: RegionId) -> (usize, usize, usize, usize) {
        self.expect(id).bounding_box()
    }

    /// Sets the shared pixel value.
    pub fn set_value(&mut self, id: RegionId, value: i64) {
        if let Some(region) = self.get_mut(id) {
            region.set_value(value);
        }
    }

    /// Gets the shared pixel value, panicking if `id` is stale.
    pub fn get_value(&self, id: RegionId) -> i64 {
        self.expect(id).value()
    }

    /// Shrinks or grows `shape` per [`ConnectedRegion::reshape`].
    pub fn reshape(&mut self, id: RegionId, new_shape: Option<(usize, usize)>) -> Result<()> {
        let region = self
            .get_mut(id)
            .unwrap_or_else(|| panic!("RegionStore: id {id} does not address a live region"));
        region.reshape(new_shape)
    }

    /// Writes `value` into every pixel of the region in `raster`.
    pub fn paint(&self, id: RegionId, raster: &mut Raster<i64>, value: i64, mode: PaintMode) {
        self.expect(id).paint(raster, value, mode);
    }

    /// Deep clone, inserted as a new region in this store.
    pub fn copy(&mut self, id: RegionId) -> RegionId {
        let cloned = self.expect(id).copy();
        self.insert(cloned)
    }

    /// Detached deep clone, not inserted into any store. Used by
    /// `PulseEmitter`, whose snapshots must not share storage with live
    /// regions.
    pub fn snapshot(&self, id: RegionId) -> ConnectedRegion {
        self.expect(id).copy()
    }

    /// Merges `b` into `a`, keeping `a`'s value. `b`'s slot is freed. Fails
    /// with [`Error::InvalidRegion`] if the two regions are not 4-adjacent.
    pub fn merge(&mut self, a: RegionId, b: RegionId) -> Result<RegionId> {
        if a == b {
            return Err(Error::InvalidRegion {
                reason: "cannot merge a region with itself".to_string(),
            });
        }
        let b_region = self
            .slots
            .get_mut(b.to_index())
            .and_then(|s| s.take())
            .unwrap_or_else(|| panic!("RegionStore: id {b} does not address a live region"));

        let merge_result = self
            .get_mut(a)
            .unwrap_or_else(|| panic!("RegionStore: id {a} does not address a live region"))
            .merge_from(&b_region);

        match merge_result {
            Ok(()) => {
                self.free.push(b.to_index() as u32);
                Ok(a)
            }
            Err(e) => {
                // Restore b so the store is left consistent for the caller
                // to retry or inspect.
                self.slots[b.to_index()] = Some(b_region);
                Err(e)
            }
        }
    }
}
