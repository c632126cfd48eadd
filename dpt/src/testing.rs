//! Random raster generation for property tests, gated behind the
//! `rand-support` feature so production consumers of `dpt` aren't forced to
//! pull in `rand`.

use dpt_core::Raster;
use rand::Rng;

/// A `shape`-sized raster of independent uniform values in `[low, high]`.
pub fn random_raster<R: Rng>(rng: &mut R, shape: (usize, usize), low: i64, high: i64) -> Raster<i64> {
    let (h, w) = shape;
    let rows = (0..h)
        .map(|_| (0..w).map(|_| rng.random_range(low..=high)).collect())
        .collect();
    Raster::from_rows(rows)
}
