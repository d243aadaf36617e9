use hifitime::{Duration, Epoch};
use nalgebra::Vector3;

use crate::{constants::STALENESS_THRESHOLD_SECONDS, ref_system::ReferenceFrame};

/// Orbital state vector: position and velocity of the body at one instant, in a stated frame.
///
/// Units
/// -----
/// * `position`: meters
/// * `velocity`: meters per second
///
/// A state is never combined with another one expressed in a different frame; use
/// [`crate::ref_system::to_earth_fixed`] to change frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub epoch: Epoch,
    pub frame: ReferenceFrame,
}

impl StateVector {
    /// New state expressed in the J2000 frame.
    pub fn j2000(position: Vector3<f64>, velocity: Vector3<f64>, epoch: Epoch) -> Self {
        StateVector {
            position,
            velocity,
            epoch,
            frame: ReferenceFrame::J2000,
        }
    }

    /// Absolute time elapsed between the state's timestamp and `instant`.
    pub fn age_at(&self, instant: Epoch) -> Duration {
        (instant - self.epoch).abs()
    }

    /// `true` when the state is more than 1000 s away from `instant`, in either direction.
    pub fn is_stale_at(&self, instant: Epoch) -> bool {
        self.age_at(instant).to_seconds() > STALENESS_THRESHOLD_SECONDS
    }
}
