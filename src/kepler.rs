use std::f64::consts::PI;

use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{constants::DPI, groundtrack_errors::GroundTrackError};

/// Returns the principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Returns the signed difference between two angles, in [-π, π].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Solve the elliptic Kepler equation `M = E − e·sin(E)` for the eccentric anomaly `E`.
///
/// The root is found with a Newton–Raphson iteration started at `M` for moderate
/// eccentricities and at `π` above `e = 0.8`, where the first guess `M` can make
/// the iteration oscillate around periapsis.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly `M` in radians (any range, reduced to [0, 2π)).
/// * `eccentricity`: eccentricity `e`, `0 ≤ e < 1`.
///
/// Return
/// ------
/// * The eccentric anomaly `E` in radians, or [`GroundTrackError::KeplerSolverFailed`] if the
///   iteration did not converge.
pub fn solve_kepler_equation(mean_anomaly: f64, eccentricity: f64) -> Result<f64, GroundTrackError> {
    let m = principal_angle(mean_anomaly);

    if eccentricity == 0.0 {
        return Ok(m);
    }

    let f = |ecc_anom: f64| -> f64 { ecc_anom - eccentricity * ecc_anom.sin() - m };
    let df = |ecc_anom: f64| -> f64 { 1.0 - eccentricity * ecc_anom.cos() };

    let x0 = if eccentricity < 0.8 { m } else { PI };

    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 50,
    };

    Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
}

/// Convert an eccentric anomaly into the true anomaly (both in radians).
///
/// Uses the half-angle form with `atan2`, valid over the whole revolution.
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = 0.5 * eccentric_anomaly;
    let y = (1.0 + eccentricity).sqrt() * half.sin();
    let x = (1.0 - eccentricity).sqrt() * half.cos();
    principal_angle(2.0 * y.atan2(x))
}

/// Convert a true anomaly into the eccentric anomaly (both in radians).
pub fn true_to_eccentric_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let sin_e = (1.0 - eccentricity * eccentricity).sqrt() * true_anomaly.sin();
    let cos_e = eccentricity + true_anomaly.cos();
    principal_angle(sin_e.atan2(cos_e))
}
