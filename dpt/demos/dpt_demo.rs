//! Decomposes a small built-in test raster and prints pulse counts per area.
//!
//! Not part of the library's public contract; a runnable sanity check that
//! exercises `decompose`/`reconstruct` end to end.

use dpt::{decompose, reconstruct, Operator};
use dpt_core::Raster;

fn main() {
    let image = Raster::from_rows(vec![
        vec![0, 0, 0, 0, 1],
        vec![0, 2, 2, 2, 1],
        vec![0, 2, 2, 2, 1],
        vec![0, 0, 0, 0, 1],
        vec![0, 0, 0, 0, 1],
    ]);

    let pulses = decompose(&image, Operator::Lu).expect("decomposition of a valid raster cannot fail");
    println!("pulses by area:");
    for (area, records) in pulses.groups() {
        println!("  area {area}: {} pulse(s)", records.len());
    }

    let result = reconstruct(&pulses, image.shape(), None, None).expect("shapes match by construction");
    assert_eq!(result.raster().data(), image.data());
    println!(
        "reconstructed {} total pulses across {} distinct area(s); round-trip OK",
        result.total_pulses(),
        result.areas().len()
    );
}
