//! Scenario and property regression tests for the LULU decomposition.

use dpt::{connected_regions, decompose, reconstruct, Operator};
use dpt_core::Raster;

fn three_region_image() -> Raster<i64> {
    Raster::from_rows(vec![
        vec![0, 0, 0, 0, 1],
        vec![0, 2, 2, 2, 1],
        vec![0, 2, 2, 2, 1],
        vec![0, 0, 0, 0, 1],
        vec![0, 0, 0, 0, 1],
    ])
}

#[test]
fn scenario_1_three_region_image() {
    let image = three_region_image();
    let (labels, store, ids) = connected_regions(&image).unwrap();
    assert_eq!(ids.len(), 3);

    let mut sizes: Vec<usize> = ids.iter().map(|&id| store.nnz(id)).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![5, 6, 14]);

    // label raster assigns every pixel to some valid region id
    for r in 0..5 {
        for c in 0..5 {
            let label = *labels.get(r, c).unwrap() as usize;
            assert!(store.contains(ids[label], r, c));
        }
    }

    let pulses = decompose(&image, Operator::Lu).unwrap();
    let result = reconstruct(&pulses, image.shape(), None, None).unwrap();
    assert_eq!(result.raster().data(), image.data());
}

#[test]
fn scenario_5_lu_and_ul_both_reconstruct_exactly() {
    let image = Raster::from_rows(vec![
        vec![9, 9, 9, 4, 4],
        vec![9, 2, 9, 4, 4],
        vec![9, 9, 9, 7, 7],
        vec![5, 5, 7, 7, 7],
        vec![5, 5, 5, 5, 5],
    ]);
    for operator in [Operator::Lu, Operator::Ul] {
        let pulses = decompose(&image, operator).unwrap();
        let result = reconstruct(&pulses, image.shape(), None, None).unwrap();
        assert_eq!(result.raster().data(), image.data(), "operator {operator:?} failed to round-trip");
    }
}

#[test]
fn property_p2_pulse_area_conservation() {
    let image = three_region_image();
    let (h, w) = image.shape();
    let pulses = decompose(&image, Operator::Lu).unwrap();
    let total: usize = pulses.groups().map(|(area, records)| area * records.len()).sum();
    assert_eq!(total, h * w);
}

#[test]
fn property_p3_label_region_consistency() {
    let image = three_region_image();
    let (labels, store, ids) = connected_regions(&image).unwrap();
    let (h, w) = image.shape();
    for r in 0..h {
        for c in 0..w {
            let label = *labels.get(r, c).unwrap() as usize;
            for (i, &id) in ids.iter().enumerate() {
                assert_eq!(store.contains(id, r, c), i == label);
            }
        }
    }
}

#[test]
fn property_p1_flat_raster_round_trips() {
    let image = Raster::filled((4, 6), 11i64);
    let pulses = decompose(&image, Operator::Lu).unwrap();
    let result = reconstruct(&pulses, image.shape(), None, None).unwrap();
    assert_eq!(result.raster().data(), image.data());
}

#[test]
fn property_p1_single_pixel_steps_round_trip() {
    let image = Raster::from_rows(vec![
        vec![1, 2, 3],
        vec![2, 3, 4],
        vec![3, 4, 5],
    ]);
    let pulses = decompose(&image, Operator::Lu).unwrap();
    let result = reconstruct(&pulses, image.shape(), None, None).unwrap();
    assert_eq!(result.raster().data(), image.data());
}
