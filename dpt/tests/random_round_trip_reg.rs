//! Scenario 6: random raster round-trip, gated behind `rand-support` since
//! it is the only test that needs `rand` beyond what the crate already
//! carries as a dev-dependency for running `dpt-demo`-style checks.
#![cfg(feature = "rand-support")]

use dpt::testing::random_raster;
use dpt::{decompose, reconstruct, Operator};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn scenario_6_random_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x6470745f6c756c75);
    for _ in 0..100 {
        let image = random_raster(&mut rng, (10, 15), 0, 255);
        let pulses = decompose(&image, Operator::Lu).unwrap();
        let result = reconstruct(&pulses, image.shape(), None, None).unwrap();
        assert_eq!(result.raster().data(), image.data());
    }
}
