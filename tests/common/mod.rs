#![allow(dead_code)]

use approx::assert_relative_eq;
use groundtrack::{
    constants::{MU_EARTH, RADEG},
    keplerian_element::KeplerianElements,
    state_vector::StateVector,
};
use hifitime::Epoch;
use nalgebra::Vector3;

/// Route the crate's tracing events to the test output; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc(2024, 6, 15, 14, 20, 0, 0)
}

/// Circular orbit of radius `a` (m) and inclination `inc_deg`, starting at its ascending node
/// placed on the J2000 +X axis.
pub fn circular_state(a: f64, inc_deg: f64, epoch: Epoch) -> StateVector {
    let speed = (MU_EARTH / a).sqrt();
    let (sin_i, cos_i) = (inc_deg * RADEG).sin_cos();
    StateVector::j2000(
        Vector3::new(a, 0.0, 0.0),
        Vector3::new(0.0, speed * cos_i, speed * sin_i),
        epoch,
    )
}

/// Low Earth orbit state with a small eccentricity and no special alignment.
pub fn leo_state(epoch: Epoch) -> StateVector {
    StateVector::j2000(
        Vector3::new(-4_860_768.0, 3_679_101.0, 2_990_193.0),
        Vector3::new(-1_259.7, -5_699.9, 4_972.2),
        epoch,
    )
}

pub fn assert_state_close(actual: &StateVector, expected: &StateVector, max_relative: f64) {
    assert_eq!(actual.frame, expected.frame);
    assert_relative_eq!(
        actual.position,
        expected.position,
        epsilon = 1e-6,
        max_relative = max_relative
    );
    assert_relative_eq!(
        actual.velocity,
        expected.velocity,
        epsilon = 1e-9,
        max_relative = max_relative
    );
}

pub fn assert_elements_close(actual: &KeplerianElements, expected: &KeplerianElements, epsilon: f64) {
    assert_eq!(actual.reference_epoch, expected.reference_epoch);
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        max_relative = epsilon
    );
    assert_relative_eq!(actual.eccentricity, expected.eccentricity, epsilon = epsilon);
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    assert_relative_eq!(
        actual.ascending_node_longitude,
        expected.ascending_node_longitude,
        epsilon = epsilon
    );
}
