//! # Ellipsoidal Earth model
//!
//! Conversions between Earth-fixed Cartesian coordinates and geodetic coordinates on a
//! reference ellipsoid, plus the spherical reconstruction used to place points in the display
//! frame.
//!
//! Geodetic latitude is obtained with Bowring's iteration on the reduced latitude, which
//! converges to machine precision in two or three steps for any point outside the Earth's core.
use nalgebra::Vector3;

use crate::constants::{Degree, Meter, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, M_TO_KM, RADEG};

const MAX_ITERATIONS: usize = 10;
const LATITUDE_TOLERANCE: f64 = 1e-14;

/// Latitude and longitude in degrees, altitude above the ellipsoid in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticCoordinate {
    pub latitude: Degree,
    pub longitude: Degree,
    pub altitude: Meter,
}

/// Wrap a longitude in degrees to `[-180, 180)`.
pub fn wrap_longitude(longitude: Degree) -> Degree {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Oblate reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_axis: Meter,
    pub semi_minor_axis: Meter,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: EARTH_MAJOR_AXIS,
        semi_minor_axis: EARTH_MINOR_AXIS,
    };

    /// Flattening `f = 1 − b/a`.
    pub fn flattening(&self) -> f64 {
        1.0 - self.semi_minor_axis / self.semi_major_axis
    }

    /// First eccentricity squared `e² = 1 − b²/a²`.
    pub fn eccentricity_squared(&self) -> f64 {
        1.0 - (self.semi_minor_axis / self.semi_major_axis).powi(2)
    }

    /// Second eccentricity squared `e'² = a²/b² − 1`.
    pub fn second_eccentricity_squared(&self) -> f64 {
        (self.semi_major_axis / self.semi_minor_axis).powi(2) - 1.0
    }

    /// Convert an Earth-fixed position (meters) to geodetic coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `position`: Earth-fixed Cartesian position in meters.
    ///
    /// Returns
    /// --------
    /// * [`GeodeticCoordinate`] with longitude in `[-180, 180)`. Points on the polar axis get
    ///   longitude `0` and latitude `±90°`; the origin maps to `(0, 0, −a)`.
    pub fn to_geodetic(&self, position: &Vector3<f64>) -> GeodeticCoordinate {
        let a = self.semi_major_axis;
        let b = self.semi_minor_axis;
        let (x, y, z) = (position.x, position.y, position.z);
        let p = x.hypot(y);

        if p == 0.0 {
            return match z.partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Greater) => GeodeticCoordinate {
                    latitude: 90.0,
                    longitude: 0.0,
                    altitude: z - b,
                },
                Some(std::cmp::Ordering::Less) => GeodeticCoordinate {
                    latitude: -90.0,
                    longitude: 0.0,
                    altitude: -z - b,
                },
                _ => GeodeticCoordinate {
                    latitude: 0.0,
                    longitude: 0.0,
                    altitude: -a,
                },
            };
        }

        let e2 = self.eccentricity_squared();
        let ep2 = self.second_eccentricity_squared();
        let one_minus_f = 1.0 - self.flattening();

        let mut beta = (a * z).atan2(b * p);
        let mut lat = beta;
        for _ in 0..MAX_ITERATIONS {
            let (sin_b, cos_b) = beta.sin_cos();
            let next = (z + ep2 * b * sin_b.powi(3)).atan2(p - e2 * a * cos_b.powi(3));
            let converged = (next - lat).abs() < LATITUDE_TOLERANCE;
            lat = next;
            if converged {
                break;
            }
            beta = (one_minus_f * lat.sin()).atan2(lat.cos());
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let altitude = p * cos_lat + z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();

        GeodeticCoordinate {
            latitude: lat / RADEG,
            longitude: wrap_longitude(y.atan2(x) / RADEG),
            altitude,
        }
    }

    /// Convert geodetic coordinates back to an Earth-fixed position in meters.
    pub fn to_cartesian(&self, coord: &GeodeticCoordinate) -> Vector3<f64> {
        let e2 = self.eccentricity_squared();
        let (sin_lat, cos_lat) = (coord.latitude * RADEG).sin_cos();
        let (sin_lon, cos_lon) = (coord.longitude * RADEG).sin_cos();
        let n = self.semi_major_axis / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Vector3::new(
            (n + coord.altitude) * cos_lat * cos_lon,
            (n + coord.altitude) * cos_lat * sin_lon,
            (n * (1.0 - e2) + coord.altitude) * sin_lat,
        )
    }
}

/// Place a point in the display frame from its geocentric distance and geodetic angles.
///
/// The point is put on a sphere of radius `distance` (meters), not on the ellipsoid: the
/// result is `(d·cos φ·cos λ, d·cos φ·sin λ, d·sin φ)`, in kilometers.
pub fn spherical_display_point(distance: Meter, latitude: Degree, longitude: Degree) -> Vector3<f64> {
    let (sin_lat, cos_lat) = (latitude * RADEG).sin_cos();
    let (sin_lon, cos_lon) = (longitude * RADEG).sin_cos();
    let d = distance * M_TO_KM;

    Vector3::new(d * cos_lat * cos_lon, d * cos_lat * sin_lon, d * sin_lat)
}

#[cfg(test)]
mod geodesy_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(-180.0), -180.0);
        assert_abs_diff_eq!(wrap_longitude(190.0), -170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_longitude(-190.0), 170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_longitude(725.5), 5.5, epsilon = 1e-12);
    }

    #[test]
    fn test_equator_and_poles() {
        let wgs = Ellipsoid::WGS84;

        let eq = wgs.to_geodetic(&Vector3::new(EARTH_MAJOR_AXIS + 400_000.0, 0.0, 0.0));
        assert_abs_diff_eq!(eq.latitude, 0.0, epsilon = 1e-12);
        assert_eq!(eq.longitude, 0.0);
        assert_abs_diff_eq!(eq.altitude, 400_000.0, epsilon = 1e-6);

        let north = wgs.to_geodetic(&Vector3::new(0.0, 0.0, EARTH_MINOR_AXIS + 1000.0));
        assert_eq!(north.latitude, 90.0);
        assert_abs_diff_eq!(north.altitude, 1000.0, epsilon = 1e-6);

        let south = wgs.to_geodetic(&Vector3::new(0.0, 0.0, -EARTH_MINOR_AXIS));
        assert_eq!(south.latitude, -90.0);
        assert_abs_diff_eq!(south.altitude, 0.0, epsilon = 1e-6);

        let origin = wgs.to_geodetic(&Vector3::zeros());
        assert!(!origin.latitude.is_nan() && !origin.altitude.is_nan());
    }

    #[test]
    fn test_wgs84_flattening() {
        let f = Ellipsoid::WGS84.flattening();
        assert_abs_diff_eq!(1.0 / f, 298.257223563, epsilon = 1e-4);
        assert_abs_diff_eq!(Ellipsoid::WGS84.eccentricity_squared(), f * (2.0 - f), epsilon = 1e-15);
    }

    #[test]
    fn test_near_pole_has_no_nan() {
        let wgs = Ellipsoid::WGS84;
        let g = wgs.to_geodetic(&Vector3::new(1e-9, -1e-9, 6_800_000.0));
        assert!(g.latitude > 89.999);
        assert!(!g.longitude.is_nan());
    }

    #[test]
    fn test_geodetic_round_trip() {
        let wgs = Ellipsoid::WGS84;
        for &(lat, lon, alt) in &[
            (45.0, 7.5, 0.0),
            (-33.9, 151.2, 58.0),
            (51.6, -179.99, 420_000.0),
            (-89.5, 12.0, 35_786_000.0),
        ] {
            let coord = GeodeticCoordinate {
                latitude: lat,
                longitude: lon,
                altitude: alt,
            };
            let back = wgs.to_geodetic(&wgs.to_cartesian(&coord));
            assert_abs_diff_eq!(back.latitude, lat, epsilon = 1e-9);
            assert_abs_diff_eq!(back.longitude, lon, epsilon = 1e-9);
            assert_abs_diff_eq!(back.altitude, alt, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_spherical_display_point() {
        let p = spherical_display_point(7_000_000.0, 0.0, 90.0);
        assert_abs_diff_eq!(p, Vector3::new(0.0, 7000.0, 0.0), epsilon = 1e-9);

        let p = spherical_display_point(6_500_000.0, 30.0, -45.0);
        assert_abs_diff_eq!(p.norm(), 6500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.z, 3250.0, epsilon = 1e-9);
    }
}
