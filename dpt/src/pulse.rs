//! Pulse records and the append-only map that buckets them by area.

use std::collections::BTreeMap;

use dpt_core::ConnectedRegion;

/// A single extracted pulse: the geometry `region_snapshot` contributes
/// `value_delta` to the reconstructed raster wherever it's painted.
#[derive(Debug, Clone)]
pub struct PulseRecord {
    area: usize,
    value_delta: i64,
    region_snapshot: ConnectedRegion,
}

impl PulseRecord {
    pub(crate) fn new(area: usize, value_delta: i64, region_snapshot: ConnectedRegion) -> Self {
        Self {
            area,
            value_delta,
            region_snapshot,
        }
    }

    /// The area extraction step this pulse was emitted at.
    pub fn area(&self) -> usize {
        self.area
    }

    /// The signed contribution this pulse makes to the reconstructed
    /// raster. May be negative; callers wanting magnitude must take
    /// `abs` explicitly.
    pub fn value_delta(&self) -> i64 {
        self.value_delta
    }

    /// The region geometry this pulse covers.
    pub fn region(&self) -> &ConnectedRegion {
        &self.region_snapshot
    }

    /// `area * |value_delta|`, a convenience metric for ranking pulses by
    /// visual significance (ported from the original's `pulse_strength`
    /// example).
    pub fn strength(&self) -> u64 {
        self.area as u64 * self.value_delta.unsigned_abs()
    }
}

/// Pulses bucketed by area, in insertion order within each bucket, with
/// buckets visited in ascending area order.
#[derive(Debug, Clone, Default)]
pub struct PulseMap {
    groups: BTreeMap<usize, Vec<PulseRecord>>,
}

impl PulseMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pulse to its area's bucket.
    pub fn emit(&mut self, area: usize, region_snapshot: ConnectedRegion, value_delta: i64) {
        self.groups
            .entry(area)
            .or_default()
            .push(PulseRecord::new(area, value_delta, region_snapshot));
    }

    /// Iterates `(area, pulses)` in ascending area order.
    pub fn groups(&self) -> impl Iterator<Item = (usize, &[PulseRecord])> {
        self.groups.iter().map(|(&area, pulses)| (area, pulses.as_slice()))
    }

    /// Total number of pulses across every area.
    pub fn total_pulses(&self) -> usize {
        self.groups.values().map(|v| v.len()).sum()
    }

    /// Whether no pulses have been emitted.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpt_core::ConnectedRegion;

    fn sample_region() -> ConnectedRegion {
        ConnectedRegion::create((2, 2), 5, 0, vec![vec![(0, 1)]]).unwrap()
    }

    #[test]
    fn groups_preserve_insertion_order_within_an_area() {
        let mut map = PulseMap::new();
        map.emit(1, sample_region(), 3);
        map.emit(1, sample_region(), -7);
        map.emit(2, sample_region(), 1);

        let mut iter = map.groups();
        let (area, pulses) = iter.next().unwrap();
        assert_eq!(area, 1);
        assert_eq!(pulses.len(), 2);
        assert_eq!(pulses[0].value_delta(), 3);
        assert_eq!(pulses[1].value_delta(), -7);

        let (area, pulses) = iter.next().unwrap();
        assert_eq!(area, 2);
        assert_eq!(pulses.len(), 1);
        assert!(iter.next().is_none());
    }

    #[test]
    fn strength_is_area_times_absolute_delta() {
        let pulse = PulseRecord::new(4, -3, sample_region());
        assert_eq!(pulse.strength(), 12);
    }

    #[test]
    fn total_pulses_sums_across_areas() {
        let mut map = PulseMap::new();
        map.emit(1, sample_region(), 1);
        map.emit(1, sample_region(), 1);
        map.emit(5, sample_region(), 1);
        assert_eq!(map.total_pulses(), 3);
    }
}
