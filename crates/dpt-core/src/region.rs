//! `ConnectedRegion`: a compressed 4-connected, constant-value pixel set.
//!
//! Pixels are never densified. A region is stored as, for each occupied row,
//! a sorted list of non-touching half-open column intervals `[c0, c1)`.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// A single half-open column interval `[0, 1)`, i.e. `[c0, c1)`.
pub type Interval = (usize, usize);

/// A maximal 4-connected set of pixels sharing one integer value, stored as
/// per-row column intervals.
///
/// See `row_spans`/`rowptr`+`colptr` in the module docs for the two
/// equivalent views of the same data: `row_spans()` for reading,
/// `rowptr`/`colptr` for the flat wire representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedRegion {
    shape: (usize, usize),
    start_row: usize,
    /// Length `R + 1`; row `i` (raster row `start_row + i`) owns
    /// `colptr[rowptr[i]..rowptr[i+1]]`.
    rowptr: Vec<usize>,
    colptr: Vec<Interval>,
    value: i64,
    nnz: usize,
}

impl ConnectedRegion {
    /// Builds a region from per-row interval lists, the first entry
    /// corresponding to raster row `start_row`.
    ///
    /// Each row's intervals are sorted and touching/overlapping intervals
    /// are merged before validation (so `[1,3)` and `[3,5)` on one row
    /// canonicalize to `[1,5)`). Fails with [`Error::InvalidRegion`] if,
    /// after canonicalization, any invariant I1-I4 from the data model still
    /// does not hold: out-of-bounds interval, empty leading/trailing row,
    /// row range exceeding `shape`, or the pixel set not being 4-connected.
    pub fn create(
        shape: (usize, usize),
        value: i64,
        start_row: usize,
        row_spans: Vec<Vec<Interval>>,
    ) -> Result<Self> {
        let (h, w) = shape;

        if row_spans.is_empty() {
            return Err(Error::InvalidRegion {
                reason: "a region must contain at least one row".to_string(),
            });
        }
        if start_row + row_spans.len() > h {
            return Err(Error::InvalidRegion {
                reason: format!(
                    "start_row {start_row} + {} rows exceeds raster height {h}",
                    row_spans.len()
                ),
            });
        }

        let mut rowptr = Vec::with_capacity(row_spans.len() + 1);
        let mut colptr = Vec::new();
        rowptr.push(0);
        for row in row_spans {
            let canon = canonicalize_row(row, w)?;
            colptr.extend(canon);
            rowptr.push(colptr.len());
        }

        if rowptr[0] == rowptr[1] {
            return Err(Error::InvalidRegion {
                reason: "a region must start on a non-empty row".to_string(),
            });
        }
        let last = rowptr.len() - 1;
        if rowptr[last - 1] == rowptr[last] {
            return Err(Error::InvalidRegion {
                reason: "a region must end on a non-empty row".to_string(),
            });
        }

        let nnz = colptr.iter().map(|&(c0, c1)| c1 - c0).sum();

        let region = ConnectedRegion {
            shape,
            start_row,
            rowptr,
            colptr,
            value,
            nnz,
        };
        region.check_connected()?;
        Ok(region)
    }

    /// The `(rows, cols)` bounding raster shape this region is valid within.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Index of the first occupied row.
    #[inline]
    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Number of rows spanned (including any empty interior rows).
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rowptr.len() - 1
    }

    /// The shared pixel value.
    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Sets the shared pixel value.
    #[inline]
    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    /// Gets the shared pixel value. Alias of [`Self::value`] matching the
    /// `get_value`/`set_value` naming from the external interface.
    #[inline]
    pub fn get_value(&self) -> i64 {
        self.value
    }

    /// Cached pixel count.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// The raw `rowptr` partitioning of `colptr` by row, for serialization.
    pub fn rowptr(&self) -> &[usize] {
        &self.rowptr
    }

    /// The raw flattened interval endpoints, for serialization.
    pub fn colptr(&self) -> &[Interval] {
        &self.colptr
    }

    /// The intervals for raster row `row`, empty if `row` has no pixels in
    /// this region.
    pub fn row_intervals(&self, row: usize) -> &[Interval] {
        if row < self.start_row || row >= self.start_row + self.row_count() {
            return &[];
        }
        let i = row - self.start_row;
        &self.colptr[self.rowptr[i]..self.rowptr[i + 1]]
    }

    /// All per-row interval lists, indexed from `start_row`.
    pub fn row_spans(&self) -> Vec<&[Interval]> {
        (0..self.row_count())
            .map(|i| &self.colptr[self.rowptr[i]..self.rowptr[i + 1]])
            .collect()
    }

    /// The tight `(min_row, min_col, max_row_exclusive, max_col_exclusive)`
    /// box over the region's occupied pixels.
    pub fn bounding_box(&self) -> (usize, usize, usize, usize) {
        let min_row = self.start_row;
        let max_row = self.start_row + self.row_count();
        let mut min_col = usize::MAX;
        let mut max_col = 0;
        for &(c0, c1) in &self.colptr {
            min_col = min_col.min(c0);
            max_col = max_col.max(c1);
        }
        (min_row, min_col, max_row, max_col)
    }

    /// `O(log R + log K)` membership test via binary search over rows, then
    /// intervals.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let intervals = self.row_intervals(row);
        intervals
            .binary_search_by(|&(c0, c1)| {
                if col < c0 {
                    std::cmp::Ordering::Greater
                } else if col >= c1 {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Paints the region's value into a zeroed raster; pixels outside the
    /// region are left at the raster's existing background (`0` when built
    /// fresh via [`Raster::filled`]).
    pub fn to_dense(&self) -> Raster<i64> {
        let mut raster = Raster::filled(self.shape, 0i64);
        self.paint(&mut raster, self.value, PaintMode::Set);
        raster
    }

    /// Writes `value` into every pixel of the region in `raster`.
    pub fn paint(&self, raster: &mut Raster<i64>, value: i64, mode: PaintMode) {
        for i in 0..self.row_count() {
            let row = self.start_row + i;
            for &(c0, c1) in &self.colptr[self.rowptr[i]..self.rowptr[i + 1]] {
                for col in c0..c1 {
                    match mode {
                        PaintMode::Set => raster.set(row, col, value),
                        PaintMode::Add => {
                            let prior = *raster.get_unchecked(row, col);
                            raster.set(row, col, prior + value);
                        }
                    }
                }
            }
        }
    }

    /// `set_array`: the free-function form of [`Self::paint`] over an
    /// explicit external raster, matching the external-interface naming.
    pub fn set_array(&self, raster: &mut Raster<i64>, value: i64, mode: PaintMode) {
        self.paint(raster, value, mode);
    }

    /// Enumerates every pixel not in the region that is 4-adjacent to at
    /// least one pixel in the region, including the one-pixel frame just
    /// outside the raster (`row = -1`, `col = -1`, `row = H`, `col = W`).
    /// Row-major order, no duplicates.
    pub fn outside_boundary(&self) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        let first = self.start_row as i64 - 1;
        let last = (self.start_row + self.row_count()) as i64;
        for r in first..=last {
            let mut candidates: BTreeSet<i64> = BTreeSet::new();
            if r - 1 >= 0 {
                for &(c0, c1) in self.row_intervals_signed(r - 1) {
                    for c in c0..c1 {
                        candidates.insert(c);
                    }
                }
            }
            for &(c0, c1) in self.row_intervals_signed(r + 1) {
                for c in c0..c1 {
                    candidates.insert(c);
                }
            }
            let own = self.row_intervals_signed(r);
            for &(c0, c1) in own {
                candidates.insert(c0 - 1);
                candidates.insert(c1);
            }
            for &(c0, c1) in own {
                for c in c0..c1 {
                    candidates.remove(&c);
                }
            }
            for c in candidates {
                out.push((r, c));
            }
        }
        out
    }

    /// Enumerates every pixel in the region with at least one 4-neighbour
    /// outside the region. Row-major order.
    pub fn inside_boundary(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for i in 0..self.row_count() {
            let row = self.start_row + i;
            let own = &self.colptr[self.rowptr[i]..self.rowptr[i + 1]];
            let above = self.row_intervals_opt(row.checked_sub(1));
            let below = self.row_intervals_opt(Some(row + 1));
            for &(c0, c1) in own {
                for col in c0..c1 {
                    let edge = col == c0 || col == c1 - 1;
                    let covered_above = interval_contains(above, col);
                    let covered_below = interval_contains(below, col);
                    if edge || !(covered_above && covered_below) {
                        out.push((row, col));
                    }
                }
            }
        }
        out
    }

    /// Shrinks `shape` to fit the occupied rows/columns, or resizes to a
    /// given larger `(H', W')`. Fails if any pixel would fall outside.
    pub fn reshape(&mut self, new_shape: Option<(usize, usize)>) -> Result<()> {
        let (_, _, max_row, max_col) = self.bounding_box();
        let target = new_shape.unwrap_or((max_row, max_col));
        if target.0 < max_row || target.1 < max_col {
            return Err(Error::InvalidRegion {
                reason: format!(
                    "cannot reshape to {target:?}: region occupies rows up to {max_row} and columns up to {max_col}"
                ),
            });
        }
        self.shape = target;
        Ok(())
    }

    /// Deep clone with no shared interval storage.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Merges `other` into `self`'s pixel set, keeping `self.value`.
    /// Fails with [`Error::InvalidRegion`] if the two regions are not
    /// 4-adjacent (callers needing a softer check should consult
    /// `AdjacencyIndex` before calling this).
    pub fn merge_from(&mut self, other: &ConnectedRegion) -> Result<()> {
        if !self.is_adjacent(other) {
            return Err(Error::InvalidRegion {
                reason: "regions are not 4-adjacent".to_string(),
            });
        }
        let shape = (
            self.shape.0.max(other.shape.0),
            self.shape.1.max(other.shape.1),
        );
        let start_row = self.start_row.min(other.start_row);
        let end_row = (self.start_row + self.row_count()).max(other.start_row + other.row_count());

        let mut rowptr = Vec::with_capacity(end_row - start_row + 1);
        let mut colptr = Vec::new();
        rowptr.push(0);
        for row in start_row..end_row {
            let mut merged: Vec<Interval> =
                Vec::from(self.row_intervals(row)).into_iter().chain(Vec::from(other.row_intervals(row))).collect();
            merged.sort_unstable();
            let canon = canonicalize_row(merged, shape.1)?;
            colptr.extend(canon);
            rowptr.push(colptr.len());
        }

        let nnz = colptr.iter().map(|&(c0, c1)| c1 - c0).sum();
        self.shape = shape;
        self.start_row = start_row;
        self.rowptr = rowptr;
        self.colptr = colptr;
        self.nnz = nnz;
        Ok(())
    }

    /// Whether `self` and `other` share at least one 4-connectivity edge.
    pub fn is_adjacent(&self, other: &ConnectedRegion) -> bool {
        let lo = self.start_row.min(other.start_row);
        let hi = (self.start_row + self.row_count()).max(other.start_row + other.row_count());
        for row in lo..hi {
            let a = self.row_intervals(row);
            let b = other.row_intervals(row);
            if intervals_touch(a, b) {
                return true;
            }
            let b_above = other.row_intervals(row.wrapping_sub(1));
            let b_below = if row + 1 <= hi { other.row_intervals(row + 1) } else { &[] };
            if row > 0 && intervals_overlap(a, b_above) {
                return true;
            }
            if intervals_overlap(a, b_below) {
                return true;
            }
        }
        false
    }

    fn row_intervals_opt(&self, row: Option<usize>) -> &[Interval] {
        match row {
            Some(r) => self.row_intervals(r),
            None => &[],
        }
    }

    fn row_intervals_signed(&self, row: i64) -> &[Interval] {
        if row < 0 {
            return &[];
        }
        self.row_intervals(row as usize)
    }

    /// Validates that this region's pixel set is a single 4-connected
    /// component, via a sweep that unions intervals in adjacent rows that
    /// share at least one column.
    fn check_connected(&self) -> Result<()> {
        let n = self.colptr.len();
        if n == 0 {
            return Err(Error::InvalidRegion {
                reason: "a region must contain at least one pixel".to_string(),
            });
        }
        let mut uf = UnionFind::new(n);
        for i in 0..self.row_count().saturating_sub(1) {
            let row_a = &self.colptr[self.rowptr[i]..self.rowptr[i + 1]];
            let row_b = &self.colptr[self.rowptr[i + 1]..self.rowptr[i + 2]];
            let base_a = self.rowptr[i];
            let base_b = self.rowptr[i + 1];
            let (mut ia, mut ib) = (0, 0);
            while ia < row_a.len() && ib < row_b.len() {
                let (a0, a1) = row_a[ia];
                let (b0, b1) = row_b[ib];
                if a0 < b1 && b0 < a1 {
                    uf.union(base_a + ia, base_b + ib);
                }
                if a1 < b1 {
                    ia += 1;
                } else {
                    ib += 1;
                }
            }
        }
        let root = uf.find(0);
        if (1..n).any(|i| uf.find(i) != root) {
            return Err(Error::InvalidRegion {
                reason: "region pixels are not 4-connected".to_string(),
            });
        }
        Ok(())
    }
}

/// How [`ConnectedRegion::paint`] combines a painted value with what is
/// already in the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Overwrite the destination pixel.
    Set,
    /// Add to the destination pixel.
    Add,
}

fn interval_contains(intervals: &[Interval], col: usize) -> bool {
    intervals
        .binary_search_by(|&(c0, c1)| {
            if col < c0 {
                std::cmp::Ordering::Greater
            } else if col >= c1 {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

fn intervals_touch(a: &[Interval], b: &[Interval]) -> bool {
    for &(a0, a1) in a {
        for &(b0, b1) in b {
            if a1 == b0 || b1 == a0 {
                return true;
            }
        }
    }
    false
}

fn intervals_overlap(a: &[Interval], b: &[Interval]) -> bool {
    let (mut ia, mut ib) = (0, 0);
    while ia < a.len() && ib < b.len() {
        let (a0, a1) = a[ia];
        let (b0, b1) = b[ib];
        if a0 < b1 && b0 < a1 {
            return true;
        }
        if a1 < b1 {
            ia += 1;
        } else {
            ib += 1;
        }
    }
    false
}

/// Sorts, validates bounds, and merges touching/overlapping intervals on a
/// single row.
fn canonicalize_row(mut row: Vec<Interval>, width: usize) -> Result<Vec<Interval>> {
    for &(c0, c1) in &row {
        if c0 >= c1 {
            return Err(Error::InvalidRegion {
                reason: format!("interval [{c0}, {c1}) is empty or inverted"),
            });
        }
        if c1 > width {
            return Err(Error::InvalidRegion {
                reason: format!("interval [{c0}, {c1}) exceeds raster width {width}"),
            });
        }
    }
    row.sort_unstable();
    let mut merged: Vec<Interval> = Vec::with_capacity(row.len());
    for (c0, c1) in row {
        if let Some(last) = merged.last_mut() {
            if c0 <= last.1 {
                last.1 = last.1.max(c1);
                continue;
            }
        }
        merged.push((c0, c1));
    }
    Ok(merged)
}

/// Minimal union-find used only for the region's own connectivity check.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConnectedRegion {
        ConnectedRegion::create(
            (5, 5),
            1,
            1,
            vec![
                vec![(2, 4)],
                vec![(0, 3)],
                vec![(2, 5)],
                vec![(0, 2), (3, 5)],
            ],
        )
        .unwrap()
    }

    fn dense_rows(r: &ConnectedRegion) -> Vec<Vec<i64>> {
        r.to_dense().rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn basic_todense_and_copy() {
        let c = sample();
        let expected = vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 1, 0, 1],
            vec![1, 1, 1, 0, 0],
            vec![0, 0, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
        ];
        assert_eq!(dense_rows(&c), expected);
        assert_eq!(dense_rows(&c.copy()), expected);
    }

    #[test]
    fn nnz_matches_interval_widths() {
        assert_eq!(sample().nnz(), 8);
    }

    #[test]
    fn reshape_shrinks_to_occupied_extent() {
        let mut c = sample();
        c.reshape(Some((4, 5))).unwrap();
        let dense: Vec<Vec<i64>> = dense_rows(&c);
        assert_eq!(dense.len(), 4);
    }

    #[test]
    fn reshape_rejects_shapes_that_would_clip_pixels() {
        let mut c = sample();
        assert!(c.reshape(Some((3, 5))).is_err());
    }

    #[test]
    fn reshape_is_idempotent() {
        let mut c = sample();
        c.reshape(None).unwrap();
        let once = c.clone();
        c.reshape(None).unwrap();
        assert_eq!(once, c);
    }

    #[test]
    fn copy_is_isolated_from_mutation() {
        let c = sample();
        let mut copied = c.copy();
        copied.set_value(99);
        assert_eq!(c.value(), 1);
        assert_eq!(copied.value(), 99);
    }

    #[test]
    fn set_array_matches_paint() {
        let c = sample();
        let mut via_paint = Raster::filled(c.shape(), 0i64);
        c.paint(&mut via_paint, 3, PaintMode::Set);
        let mut via_set_array = Raster::filled(c.shape(), 0i64);
        c.set_array(&mut via_set_array, 3, PaintMode::Set);
        assert_eq!(via_paint, via_set_array);
    }

    #[test]
    fn contains_matches_dense() {
        let c = sample();
        let dense = c.to_dense();
        for row in 0..5 {
            for col in 0..5 {
                let want = *dense.get(row, col).unwrap() != 0;
                assert_eq!(c.contains(row, col), want, "at ({row},{col})");
            }
        }
    }

    #[test]
    fn outside_boundary_single_pixel() {
        let c = ConnectedRegion::create((2, 2), 1, 0, vec![vec![(0, 1)]]).unwrap();
        let boundary = c.outside_boundary();
        assert_eq!(boundary, vec![(-1, 0), (0, -1), (0, 1), (1, 0)]);
    }

    #[test]
    fn outside_boundary_crosses_frame_diagonally() {
        let c = ConnectedRegion::create((2, 2), 1, 0, vec![vec![(0, 1)], vec![(1, 2)]]).unwrap();
        let boundary = c.outside_boundary();
        let ys: Vec<i64> = boundary.iter().map(|&(r, _)| r).collect();
        let xs: Vec<i64> = boundary.iter().map(|&(_, c)| c).collect();
        assert_eq!(ys, vec![-1, 0, 0, 1, 1, 2]);
        assert_eq!(xs, vec![0, -1, 1, 0, 2, 1]);
    }

    #[test]
    fn outside_boundary_has_no_duplicates_and_is_adjacent() {
        let c = sample();
        let boundary = c.outside_boundary();
        let mut seen = std::collections::HashSet::new();
        for &(r, col) in &boundary {
            assert!(seen.insert((r, col)), "duplicate boundary pixel {:?}", (r, col));
            let neighbours = [(r - 1, col), (r + 1, col), (r, col - 1), (r, col + 1)];
            let adjacent = neighbours.iter().any(|&(nr, nc)| {
                nr >= 0 && nc >= 0 && c.contains(nr as usize, nc as usize)
            });
            assert!(adjacent, "boundary pixel {:?} not adjacent to region", (r, col));
            if r >= 0 && col >= 0 {
                assert!(!c.contains(r as usize, col as usize));
            }
        }
    }

    #[test]
    fn touching_intervals_merge_on_construction() {
        let c = ConnectedRegion::create((1, 5), 7, 0, vec![vec![(1, 3), (3, 5)]]).unwrap();
        assert_eq!(c.row_intervals(0), &[(1, 5)]);
        assert_eq!(c.nnz(), 4);
    }

    #[test]
    fn rejects_non_connected_pixel_sets() {
        let err = ConnectedRegion::create((3, 3), 1, 0, vec![vec![(0, 1)], vec![], vec![(2, 3)]]);
        assert!(err.is_err());
    }

    #[test]
    fn merge_unions_adjacent_regions() {
        let mut a = ConnectedRegion::create((2, 2), 5, 0, vec![vec![(0, 1)]]).unwrap();
        let b = ConnectedRegion::create((2, 2), 9, 0, vec![vec![(1, 2)]]).unwrap();
        a.merge_from(&b).unwrap();
        assert_eq!(a.nnz(), 2);
        assert_eq!(a.value(), 5);
        assert!(a.contains(0, 0) && a.contains(0, 1));
    }

    #[test]
    fn merge_rejects_non_adjacent_regions() {
        let mut a = ConnectedRegion::create((3, 3), 5, 0, vec![vec![(0, 1)]]).unwrap();
        let b = ConnectedRegion::create((3, 3), 9, 2, vec![vec![(2, 3)]]).unwrap();
        assert!(a.merge_from(&b).is_err());
    }

    #[test]
    fn inside_boundary_is_subset_of_region_and_row_major() {
        let c = sample();
        let boundary = c.inside_boundary();
        let mut prev = None;
        for &(r, col) in &boundary {
            assert!(c.contains(r, col));
            if let Some((pr, pc)) = prev {
                assert!((r, col) > (pr, pc));
            }
            prev = Some((r, col));
        }
    }
}
