//! # Low-precision Sun and Moon positions
//!
//! Apparent equatorial coordinates of the Sun and the Moon from the short series of the
//! *Astronomical Almanac* (accuracy about 0.01° for the Sun and 0.3° for the Moon between
//! 1950 and 2050), and the Earth-fixed sub-point they stand above.
use crate::{
    constants::{Degree, Kilometer, Radian, JD2000, RADEG},
    earth_orientation::mean_obliquity,
    geodesy::wrap_longitude,
    time::{sidereal_time, JulianTime},
};

/// Astronomical unit in kilometers
const AU_KM: Kilometer = 149_597_870.7;

/// Mean equatorial radius of the Earth used by the lunar parallax, in kilometers
const EARTH_RADIUS_KM: Kilometer = 6378.14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelestialBody {
    Sun,
    Moon,
}

/// Geocentric equatorial coordinates of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoordinates {
    /// Right ascension in [0, 2π)
    pub right_ascension: Radian,
    pub declination: Radian,
    pub distance: Kilometer,
}

/// Point of the Earth's surface where a body is at the zenith.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubPoint {
    /// Longitude in [-180, 180)
    pub lon: Degree,
    pub lat: Degree,
}

fn sind(x: Degree) -> f64 {
    (x * RADEG).sin()
}

fn cosd(x: Degree) -> f64 {
    (x * RADEG).cos()
}

/// Ecliptic longitude/latitude (degrees) to equatorial coordinates for an obliquity ε.
fn ecliptic_to_equatorial(lon: Degree, lat: Degree, obliquity: Radian) -> (Radian, Radian) {
    let (sin_e, cos_e) = obliquity.sin_cos();
    let l = cosd(lat) * cosd(lon);
    let m = cos_e * cosd(lat) * sind(lon) - sin_e * sind(lat);
    let n = sin_e * cosd(lat) * sind(lon) + cos_e * sind(lat);

    (m.atan2(l).rem_euclid(std::f64::consts::TAU), n.clamp(-1.0, 1.0).asin())
}

impl CelestialBody {
    pub fn equatorial_coordinates(&self, julian: &JulianTime) -> EquatorialCoordinates {
        let days = julian.jt - JD2000;
        let t = days / 36_525.0;

        match self {
            CelestialBody::Sun => {
                let mean_lon = 280.460 + 0.985_647_4 * days;
                let g = 357.528 + 0.985_600_3 * days;
                let lambda = mean_lon + 1.915 * sind(g) + 0.020 * sind(2.0 * g);
                let distance = 1.000_14 - 0.016_71 * cosd(g) - 0.000_14 * cosd(2.0 * g);

                let (ra, dec) = ecliptic_to_equatorial(lambda, 0.0, mean_obliquity(t));
                EquatorialCoordinates {
                    right_ascension: ra,
                    declination: dec,
                    distance: distance * AU_KM,
                }
            }
            CelestialBody::Moon => {
                let lambda = 218.32 + 481_267.881 * t + 6.29 * sind(135.0 + 477_198.87 * t)
                    - 1.27 * sind(259.3 - 413_335.36 * t)
                    + 0.66 * sind(235.7 + 890_534.22 * t)
                    + 0.21 * sind(269.9 + 954_397.74 * t)
                    - 0.19 * sind(357.5 + 35_999.05 * t)
                    - 0.11 * sind(186.5 + 966_404.03 * t);
                let beta = 5.13 * sind(93.3 + 483_202.02 * t)
                    + 0.28 * sind(228.2 + 960_400.89 * t)
                    - 0.28 * sind(318.3 + 6_003.15 * t)
                    - 0.17 * sind(217.6 - 407_332.21 * t);
                let parallax = 0.9508
                    + 0.0518 * cosd(134.9 + 477_198.85 * t)
                    + 0.0095 * cosd(259.2 - 413_335.38 * t)
                    + 0.0078 * cosd(235.7 + 890_534.23 * t)
                    + 0.0028 * cosd(269.9 + 954_397.70 * t);

                let (ra, dec) = ecliptic_to_equatorial(lambda, beta, mean_obliquity(t));
                EquatorialCoordinates {
                    right_ascension: ra,
                    declination: dec,
                    distance: EARTH_RADIUS_KM / sind(parallax),
                }
            }
        }
    }
}

impl EquatorialCoordinates {
    /// Sub-point at `julian`: the latitude is the declination and the longitude the right
    /// ascension minus the Greenwich sidereal time.
    pub fn sub_point(&self, julian: &JulianTime) -> SubPoint {
        let gst = sidereal_time(0.0, julian);
        SubPoint {
            lon: wrap_longitude(self.right_ascension / RADEG - gst),
            lat: self.declination / RADEG,
        }
    }
}
