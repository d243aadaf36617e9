//! # Earth orientation: obliquity, nutation and precession
//!
//! Provides the slowly varying part of the inertial → Earth-fixed rotation:
//!
//! - [`mean_obliquity`] – IAU 1976 mean obliquity of the ecliptic,
//! - [`nutation_terms`] – IAU 1980 nutation in longitude and obliquity, restricted to the
//!   dominant periodic terms (amplitude ≥ 0.005"),
//! - [`precession_matrix`] – IAU 1976 precession from J2000 to the mean equator of date.
//!
//! The fast part (Earth rotation by sidereal time) lives in [`crate::time`], and the composition
//! of the whole chain in [`crate::ref_system`].
//!
//! All rotation matrices follow the *frame rotation* convention: `x_new = R · x_old`.
use nalgebra::Matrix3;

use crate::{
    constants::{Radian, DAYS_PER_CENTURY, JD2000, RADEG, RADSEC},
    ref_system::{frame_rotation, Axis},
    time::JulianTime,
};

/// Julian centuries elapsed since J2000.0 for a given Julian date.
pub fn julian_centuries(julian: &JulianTime) -> f64 {
    (julian.jt - JD2000) / DAYS_PER_CENTURY
}

/// Compute the mean obliquity of the ecliptic (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `t`: Julian centuries since J2000.0.
///
/// Returns
/// --------
/// * Mean obliquity ε in radians, evaluated with Horner's scheme:
///
/// ```text
/// ε = 23°26'21.448" − 46.815"·T − 0.00059"·T² + 0.001813"·T³
/// ```
pub fn mean_obliquity(t: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.00059 * RADSEC;
    let ob3 = 0.001813 * RADSEC;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation angles and the obliquity they refer to, for one instant.
///
/// Computed once per frame by the pipeline and shared by every orbit sample, since the
/// nutation varies on a timescale of days while a sampled window spans a few hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutationParameters {
    /// Nutation in longitude Δψ (radians)
    pub dpsi: Radian,
    /// Nutation in obliquity Δε (radians)
    pub deps: Radian,
    /// Mean obliquity of the ecliptic ε (radians)
    pub mean_obliquity: Radian,
}

impl NutationParameters {
    /// True obliquity ε + Δε.
    pub fn true_obliquity(&self) -> Radian {
        self.mean_obliquity + self.deps
    }

    /// Equation of the equinoxes `Δψ·cos(ε)`, the difference between apparent and mean
    /// sidereal time (radians).
    pub fn equation_of_equinoxes(&self) -> Radian {
        self.dpsi * self.mean_obliquity.cos()
    }

    /// Rotation from the mean equator and equinox of date to the true equator and equinox
    /// of date:
    ///
    /// ```text
    /// N = R1(−(ε + Δε)) · R3(−Δψ) · R1(ε)
    /// ```
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        frame_rotation(-self.true_obliquity(), Axis::X)
            * frame_rotation(-self.dpsi, Axis::Z)
            * frame_rotation(self.mean_obliquity, Axis::X)
    }
}

/// One periodic term of the IAU 1980 series.
///
/// Multipliers of (D, M, M', F, Ω) followed by the sine coefficients of Δψ and the cosine
/// coefficients of Δε, in units of 0.0001".
struct NutationTerm {
    args: [f64; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [f64; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

#[rustfmt::skip]
const NUTATION_SERIES: [NutationTerm; 18] = [
    term([ 0.,  0.,  0., 0., 1.], (-171996., -174.2), (92025.,  8.9)),
    term([-2.,  0.,  0., 2., 2.], ( -13187.,   -1.6), ( 5736., -3.1)),
    term([ 0.,  0.,  0., 2., 2.], (  -2274.,   -0.2), (  977., -0.5)),
    term([ 0.,  0.,  0., 0., 2.], (   2062.,    0.2), ( -895.,  0.5)),
    term([ 0.,  1.,  0., 0., 0.], (   1426.,   -3.4), (   54., -0.1)),
    term([ 0.,  0.,  1., 0., 0.], (    712.,    0.1), (   -7.,  0.0)),
    term([-2.,  1.,  0., 2., 2.], (   -517.,    1.2), (  224., -0.6)),
    term([ 0.,  0.,  0., 2., 1.], (   -386.,   -0.4), (  200.,  0.0)),
    term([ 0.,  0.,  1., 2., 2.], (   -301.,    0.0), (  129., -0.1)),
    term([-2., -1.,  0., 2., 2.], (    217.,   -0.5), (  -95.,  0.3)),
    term([-2.,  0.,  1., 0., 0.], (   -158.,    0.0), (    0.,  0.0)),
    term([-2.,  0.,  0., 2., 1.], (    129.,    0.1), (  -70.,  0.0)),
    term([ 0.,  0., -1., 2., 2.], (    123.,    0.0), (  -53.,  0.0)),
    term([ 2.,  0.,  0., 0., 0.], (     63.,    0.0), (    0.,  0.0)),
    term([ 0.,  0.,  1., 0., 1.], (     63.,    0.1), (  -33.,  0.0)),
    term([ 2.,  0., -1., 2., 2.], (    -59.,    0.0), (   26.,  0.0)),
    term([ 0.,  0., -1., 0., 1.], (    -58.,   -0.1), (   32.,  0.0)),
    term([ 0.,  0.,  1., 2., 1.], (    -51.,    0.0), (   27.,  0.0)),
];

/// Fundamental lunisolar arguments (D, M, M', F, Ω) in radians.
///
/// * D  – mean elongation of the Moon from the Sun
/// * M  – mean anomaly of the Sun
/// * M' – mean anomaly of the Moon
/// * F  – Moon's argument of latitude
/// * Ω  – longitude of the Moon's ascending node
fn fundamental_arguments(t: f64) -> [Radian; 5] {
    let t2 = t * t;
    let t3 = t2 * t;

    let d = 297.85036 + 445_267.111_480 * t - 0.001_914_2 * t2 + t3 / 189_474.0;
    let m = 357.52772 + 35_999.050_340 * t - 0.000_160_3 * t2 - t3 / 300_000.0;
    let mp = 134.96298 + 477_198.867_398 * t + 0.008_697_2 * t2 + t3 / 56_250.0;
    let f = 93.27191 + 483_202.017_538 * t - 0.003_682_5 * t2 + t3 / 327_270.0;
    let om = 125.04452 - 1_934.136_261 * t + 0.002_070_8 * t2 + t3 / 450_000.0;

    [d, m, mp, f, om].map(|deg| (deg % 360.0) * RADEG)
}

/// Compute the nutation parameters (IAU 1980, dominant terms).
///
/// Arguments
/// ---------
/// * `t`: Julian centuries since J2000.0 (`(JT − 2451545.0) / 36525`).
///
/// Returns
/// --------
/// * [`NutationParameters`] holding Δψ, Δε and the mean obliquity, all in radians.
///
/// The truncated series is accurate to about 0.01", which is far below what matters once the
/// result is projected on a globe.
pub fn nutation_terms(t: f64) -> NutationParameters {
    let fund = fundamental_arguments(t);

    let (dpsi, deps) = NUTATION_SERIES
        .iter()
        .fold((0.0, 0.0), |(dpsi, deps), term| {
            let arg: f64 = term.args.iter().zip(fund.iter()).map(|(k, a)| k * a).sum();
            (
                dpsi + (term.psi.0 + term.psi.1 * t) * arg.sin(),
                deps + (term.eps.0 + term.eps.1 * t) * arg.cos(),
            )
        });

    // 0.0001" → radians
    NutationParameters {
        dpsi: dpsi * 1e-4 * RADSEC,
        deps: deps * 1e-4 * RADSEC,
        mean_obliquity: mean_obliquity(t),
    }
}

/// Compute the precession matrix from J2000 to the mean equator and equinox of date
/// (IAU 1976 model).
///
/// ```text
/// ζ = 2306.2181"·T + 0.30188"·T² + 0.017998"·T³
/// z = 2306.2181"·T + 1.09468"·T² + 0.018203"·T³
/// θ = 2004.3109"·T − 0.42665"·T² − 0.041833"·T³
///
/// P = R3(−z) · R2(θ) · R3(−ζ)
/// ```
///
/// Arguments
/// ---------
/// * `t`: Julian centuries since J2000.0.
pub fn precession_matrix(t: f64) -> Matrix3<f64> {
    let zeta = ((0.017998 * t + 0.30188) * t + 2306.2181) * t * RADSEC;
    let z = ((0.018203 * t + 1.09468) * t + 2306.2181) * t * RADSEC;
    let theta = ((-0.041833 * t - 0.42665) * t + 2004.3109) * t * RADSEC;

    frame_rotation(-z, Axis::Z) * frame_rotation(theta, Axis::Y) * frame_rotation(-zeta, Axis::Z)
}
