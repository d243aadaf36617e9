//! # Reference frames and the J2000 → Earth-fixed transformation
//!
//! A [`StateVector`] always carries a [`ReferenceFrame`] tag. The only transformation the
//! pipeline needs is the inertial → rotating one:
//!
//! ```text
//! r_ef = R3(GAST) · N · P · r_j2000
//! v_ef = R3(GAST) · N · P · v_j2000 − ω⊕ × r_ef
//! ```
//!
//! where `P` is the IAU 1976 precession, `N` the IAU 1980 nutation and `GAST` the Greenwich
//! apparent sidereal time (mean sidereal time plus the equation of the equinoxes).
//!
//! All rotations follow the frame rotation convention of [`frame_rotation`].
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::EARTH_ROTATION_RATE,
    earth_orientation::{julian_centuries, nutation_terms, precession_matrix, NutationParameters},
    groundtrack_errors::GroundTrackError,
    state_vector::StateVector,
    time::{gmst, JulianTime},
};

/// Frame in which the components of a state vector are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Mean equator and equinox of J2000.0, non-rotating.
    J2000,
    /// Earth-centred, Earth-fixed (true equator of date, Greenwich meridian).
    EarthFixed,
}

/// Coordinate axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Elementary frame rotation of angle `alpha` (radians) about `axis`.
///
/// The returned matrix expresses, in the rotated frame, a vector given in the original frame
/// (`x_new = R · x_old`). This is the transpose of the active rotation of the same angle:
///
/// ```text
/// R3(α) = |  cos α   sin α   0 |
///         | −sin α   cos α   0 |
///         |    0       0     1 |
/// ```
pub fn frame_rotation(alpha: f64, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, -alpha).into_inner()
}

/// Greenwich apparent sidereal time (radians) for a UTC Julian time and a nutation set.
pub fn greenwich_apparent_sidereal_time(julian: &JulianTime, nutation: &NutationParameters) -> f64 {
    gmst(julian.mjd()) + nutation.equation_of_equinoxes()
}

/// Full rotation matrix from J2000 to the Earth-fixed frame at `julian`.
///
/// Arguments
/// ---------
/// * `julian`: instant of the transformation.
/// * `nutation`: nutation parameters to use; they are expected to have been evaluated close to
///   `julian` (same frame, a few hours apart at most).
///
/// Returns
/// --------
/// * `R3(GAST) · N · P`
pub fn j2000_to_earth_fixed_matrix(julian: &JulianTime, nutation: &NutationParameters) -> Matrix3<f64> {
    let t = julian_centuries(julian);
    let gast = greenwich_apparent_sidereal_time(julian, nutation);

    frame_rotation(gast, Axis::Z) * nutation.rotation_matrix() * precession_matrix(t)
}

/// Rotate a J2000 state vector into the Earth-fixed frame.
///
/// Arguments
/// ---------
/// * `osv`: state vector tagged [`ReferenceFrame::J2000`].
/// * `nutation`: optional nutation parameters shared by the whole frame. `None` evaluates them
///   at the state's own epoch.
///
/// Returns
/// --------
/// * The Earth-fixed state at the same epoch. The position is a pure rotation, so its norm is
///   preserved; the velocity additionally loses the transport term `ω⊕ × r`.
///
/// Errors
/// ------
/// * [`GroundTrackError::FrameMismatch`] if `osv` is not expressed in J2000.
pub fn to_earth_fixed(
    osv: &StateVector,
    nutation: Option<&NutationParameters>,
) -> Result<StateVector, GroundTrackError> {
    if osv.frame != ReferenceFrame::J2000 {
        return Err(GroundTrackError::FrameMismatch {
            expected: ReferenceFrame::J2000,
            found: osv.frame,
        });
    }

    let julian = JulianTime::from_epoch(osv.epoch);
    let nutation = match nutation {
        Some(params) => *params,
        None => nutation_terms(julian_centuries(&julian)),
    };

    let rot = j2000_to_earth_fixed_matrix(&julian, &nutation);
    let position = rot * osv.position;
    let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE);
    let velocity = rot * osv.velocity - omega.cross(&position);

    Ok(StateVector {
        position,
        velocity,
        epoch: osv.epoch,
        frame: ReferenceFrame::EarthFixed,
    })
}
