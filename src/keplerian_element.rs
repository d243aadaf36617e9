//! # Keplerian orbital elements
//!
//! This module defines [`KeplerianElements`], the osculating two-body element set derived from
//! one J2000 [`StateVector`], and the propagation of that element set to any other instant.
//!
//! ## Units
//!
//! - Lengths: **meters**
//! - Angles: **radians**, all normalised to `[0, 2π)`
//! - Gravitational parameter: **m³/s²**
//! - Epoch: [`hifitime::Epoch`]
//!
//! ## Degeneracies
//!
//! Classical elements are singular for circular and equatorial orbits. The conversion never
//! produces NaN and follows these conventions:
//!
//! - **Circular orbits (`e < 1e-10`)**: ω is undefined and set to `0`; the mean anomaly is then
//!   counted from the ascending node (argument of latitude).
//! - **Equatorial orbits (`i < 1e-10` or `i > π − 1e-10`)**: Ω is undefined and set to `0`; the
//!   node line is taken along +X.
//! - Both at once: the mean anomaly is the true longitude measured from +X.
//!
//! States with zero angular momentum (rectilinear or null) and non-elliptic states have no
//! element set and are reported as errors.
use std::fmt;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::{Meter, DPI, RADEG},
    groundtrack_errors::GroundTrackError,
    kepler::{
        eccentric_to_true_anomaly, principal_angle, solve_kepler_equation,
        true_to_eccentric_anomaly,
    },
    ref_system::ReferenceFrame,
    state_vector::StateVector,
};

/// Threshold below which eccentricity and inclination (or π − inclination) are considered null.
const DEGENERACY_EPS: f64 = 1e-10;

/// Orbital period (seconds) of an orbit of semi-major axis `a` (m) around a body of
/// gravitational parameter `mu` (m³/s²): `2π·√(a³/μ)`.
pub fn orbital_period(semi_major_axis: Meter, mu: f64) -> f64 {
    DPI * (semi_major_axis.powi(3) / mu).sqrt()
}

/// Unit vectors of the orbital plane: `p̂` along the ascending node, `q̂` 90° ahead of it in the
/// direction of motion.
fn orbital_plane_basis(inclination: f64, node: f64) -> (Vector3<f64>, Vector3<f64>) {
    let (sin_i, cos_i) = inclination.sin_cos();
    let (sin_o, cos_o) = node.sin_cos();

    let p = Vector3::new(cos_o, sin_o, 0.0);
    let q = Vector3::new(-cos_i * sin_o, cos_i * cos_o, sin_i);
    (p, q)
}

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `reference_epoch`: instant at which `mean_anomaly` is given.
/// * `semi_major_axis`: meters.
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `inclination`: radians, in `[0, π]`.
/// * `ascending_node_longitude`: radians (Ω).
/// * `periapsis_argument`: radians (ω).
/// * `mean_anomaly`: radians (M).
/// * `gravitational_parameter`: m³/s² (μ).
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: Epoch,
    pub semi_major_axis: Meter,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
    pub gravitational_parameter: f64,
}

impl KeplerianElements {
    /// Compute the osculating elements of a J2000 state vector.
    ///
    /// Arguments
    /// ---------
    /// * `osv`: state vector in [`ReferenceFrame::J2000`] (m, m/s).
    /// * `mu`: gravitational parameter of the central body (m³/s²).
    ///
    /// Return
    /// ------
    /// * The element set, with `reference_epoch = osv.epoch`.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::FrameMismatch`] for a rotating-frame state.
    /// * [`GroundTrackError::DegenerateState`] when the angular momentum vanishes.
    /// * [`GroundTrackError::NonEllipticOrbit`] when the state is parabolic or hyperbolic.
    pub fn from_state_vector(osv: &StateVector, mu: f64) -> Result<Self, GroundTrackError> {
        if osv.frame != ReferenceFrame::J2000 {
            return Err(GroundTrackError::FrameMismatch {
                expected: ReferenceFrame::J2000,
                found: osv.frame,
            });
        }

        let r = osv.position;
        let v = osv.velocity;
        let r_norm = r.norm();
        let v2 = v.norm_squared();

        let h = r.cross(&v);
        let h_norm = h.norm();
        if r_norm == 0.0 || h_norm <= 1e-12 * r_norm * v2.sqrt() {
            return Err(GroundTrackError::DegenerateState);
        }

        let energy = 0.5 * v2 - mu / r_norm;
        let semi_major_axis = -mu / (2.0 * energy);
        let ecc_vec = ((v2 - mu / r_norm) * r - r.dot(&v) * v) / mu;
        let eccentricity = ecc_vec.norm();

        if energy >= 0.0 || eccentricity >= 1.0 {
            return Err(GroundTrackError::NonEllipticOrbit {
                eccentricity,
                semi_major_axis,
            });
        }

        let inclination = h.x.hypot(h.y).atan2(h.z);
        let equatorial = inclination < DEGENERACY_EPS
            || inclination > std::f64::consts::PI - DEGENERACY_EPS;
        let node = if equatorial {
            0.0
        } else {
            principal_angle(h.x.atan2(-h.y))
        };

        let (p, q) = orbital_plane_basis(inclination, node);

        // argument of latitude of the body
        let u = r.dot(&q).atan2(r.dot(&p));

        let periapsis_argument = if eccentricity < DEGENERACY_EPS {
            0.0
        } else {
            principal_angle(ecc_vec.dot(&q).atan2(ecc_vec.dot(&p)))
        };

        let true_anomaly = principal_angle(u - periapsis_argument);
        let ecc_anom = true_to_eccentric_anomaly(true_anomaly, eccentricity);
        let mean_anomaly = principal_angle(ecc_anom - eccentricity * ecc_anom.sin());

        Ok(KeplerianElements {
            reference_epoch: osv.epoch,
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude: node,
            periapsis_argument,
            mean_anomaly,
            gravitational_parameter: mu,
        })
    }

    /// Mean motion `n = √(μ/a³)` in rad/s.
    pub fn mean_motion(&self) -> f64 {
        (self.gravitational_parameter / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Orbital period in seconds.
    pub fn period(&self) -> f64 {
        orbital_period(self.semi_major_axis, self.gravitational_parameter)
    }

    /// Propagate the element set to `target` under two-body motion.
    ///
    /// The mean anomaly is advanced by `n·Δt`, Kepler's equation is solved for the eccentric
    /// anomaly and the J2000 state is rebuilt in the orbital plane. `self` is not modified.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::KeplerSolverFailed`] if the Newton–Raphson iteration diverges.
    pub fn propagate(&self, target: Epoch) -> Result<StateVector, GroundTrackError> {
        let dt = (target - self.reference_epoch).to_seconds();
        let e = self.eccentricity;
        let a = self.semi_major_axis;

        let mean_anomaly = self.mean_anomaly + self.mean_motion() * dt;
        let ecc_anom = solve_kepler_equation(mean_anomaly, e)?;
        let true_anomaly = eccentric_to_true_anomaly(ecc_anom, e);

        let radius = a * (1.0 - e * ecc_anom.cos());
        let semi_latus_rectum = a * (1.0 - e * e);
        let speed_scale = (self.gravitational_parameter / semi_latus_rectum).sqrt();
        let radial_speed = speed_scale * e * true_anomaly.sin();
        let transverse_speed = speed_scale * (1.0 + e * true_anomaly.cos());

        let (p, q) = orbital_plane_basis(self.inclination, self.ascending_node_longitude);
        let (sin_u, cos_u) = (self.periapsis_argument + true_anomaly).sin_cos();
        let radial = cos_u * p + sin_u * q;
        let transverse = -sin_u * p + cos_u * q;

        Ok(StateVector::j2000(
            radius * radial,
            radial_speed * radial + transverse_speed * transverse,
            target,
        ))
    }

    /// State vector at the reference epoch.
    pub fn to_state_vector(&self) -> Result<StateVector, GroundTrackError> {
        self.propagate(self.reference_epoch)
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keplerian Elements @ epoch: {}", self.reference_epoch)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.3} km",
            self.semi_major_axis * 1e-3
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.6}", self.eccentricity)?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6}°",
            self.inclination / RADEG
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6}°",
            self.ascending_node_longitude / RADEG
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument / RADEG
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6}°",
            self.mean_anomaly / RADEG
        )?;
        write!(f, "  T   (period)                = {:.3} min", self.period() / 60.0)
    }
}
