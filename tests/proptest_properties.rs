//! Property-based tests of the geometric invariants of the pipeline.
mod common;

use common::assert_state_close;
use groundtrack::{
    celestial::CelestialBody,
    constants::{DPI, MU_EARTH},
    geodesy::{wrap_longitude, Ellipsoid, GeodeticCoordinate},
    keplerian_element::KeplerianElements,
    orbit_path::LineList,
    ref_system::to_earth_fixed,
    state_vector::StateVector,
    time::JulianTime,
};
use hifitime::{Epoch, Unit};
use nalgebra::Vector3;
use proptest::prelude::*;

fn j2000_noon() -> Epoch {
    Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Elements → state → elements → state reproduces the first state.
    #[test]
    fn prop_element_round_trip(
        semi_major_axis in 6.6e6f64..4.5e7,
        eccentricity in 1e-4f64..0.7,
        inclination in 0.01f64..3.13,
        node in 0.0f64..DPI,
        periapsis in 0.0f64..DPI,
        mean_anomaly in 0.0f64..DPI,
    ) {
        let kep = KeplerianElements {
            reference_epoch: j2000_noon(),
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude: node,
            periapsis_argument: periapsis,
            mean_anomaly,
            gravitational_parameter: MU_EARTH,
        };
        let osv = kep.to_state_vector().unwrap();
        let again = KeplerianElements::from_state_vector(&osv, MU_EARTH).unwrap();

        prop_assert!((again.semi_major_axis - semi_major_axis).abs() / semi_major_axis < 1e-9);
        prop_assert!((again.eccentricity - eccentricity).abs() < 1e-9);
        prop_assert!((again.inclination - inclination).abs() < 1e-9);
        assert_state_close(&again.to_state_vector().unwrap(), &osv, 1e-8);
    }

    /// Propagation preserves the specific orbital energy.
    #[test]
    fn prop_propagation_conserves_energy(
        semi_major_axis in 6.6e6f64..4.5e7,
        eccentricity in 0.0f64..0.9,
        mean_anomaly in 0.0f64..DPI,
        hours in -48.0f64..48.0,
    ) {
        let kep = KeplerianElements {
            reference_epoch: j2000_noon(),
            semi_major_axis,
            eccentricity,
            inclination: 0.9,
            ascending_node_longitude: 1.2,
            periapsis_argument: 0.4,
            mean_anomaly,
            gravitational_parameter: MU_EARTH,
        };
        let osv = kep.propagate(j2000_noon() + Unit::Hour * hours).unwrap();
        let energy = 0.5 * osv.velocity.norm_squared() - MU_EARTH / osv.position.norm();
        let expected = -MU_EARTH / (2.0 * semi_major_axis);

        prop_assert!(((energy - expected) / expected).abs() < 1e-9);
    }

    /// Geodetic → Cartesian → geodetic is the identity away from the poles.
    #[test]
    fn prop_geodetic_round_trip(
        latitude in -89.9f64..89.9,
        longitude in -180.0f64..180.0,
        altitude in -1.0e4f64..1.0e8,
    ) {
        let wgs = Ellipsoid::WGS84;
        let coord = GeodeticCoordinate { latitude, longitude, altitude };
        let back = wgs.to_geodetic(&wgs.to_cartesian(&coord));

        prop_assert!((back.latitude - latitude).abs() < 1e-9);
        prop_assert!(wrap_longitude(back.longitude - longitude).abs() < 1e-9);
        prop_assert!((back.altitude - altitude).abs() < 1e-3);
        prop_assert!((-180.0..180.0).contains(&back.longitude));
    }

    #[test]
    fn prop_longitude_wrap_range(longitude in -1.0e4f64..1.0e4) {
        let wrapped = wrap_longitude(longitude);
        prop_assert!((-180.0..180.0).contains(&wrapped));
        let turns = (longitude - wrapped) / 360.0;
        prop_assert!((turns - turns.round()).abs() < 1e-9);
    }

    /// The J2000 to Earth-fixed rotation preserves the geocentric distance.
    #[test]
    fn prop_earth_fixed_preserves_norm(
        x in -5.0e7f64..5.0e7,
        y in -5.0e7f64..5.0e7,
        z in -5.0e7f64..5.0e7,
        days in -3650.0f64..18250.0,
    ) {
        let osv = StateVector::j2000(
            Vector3::new(x, y, z),
            Vector3::new(0.0, 7_500.0, 0.0),
            j2000_noon() + Unit::Day * days,
        );
        let ef = to_earth_fixed(&osv, None).unwrap();
        let norm = osv.position.norm();

        prop_assert!((ef.position.norm() - norm).abs() <= 1e-12 * norm.max(1.0));
    }

    /// A polyline of n vertices closed with a two-point tail holds 2n + 2 vertices.
    #[test]
    fn prop_line_list_length(steps in 1usize..1000) {
        let mut list = LineList::from_parametric(steps, |i| Vector3::new(i as f64, 0.0, 0.0));
        prop_assert_eq!(list.len(), 2 * steps - 1);

        list.close_with(&[Vector3::new(0.0, 1.0, 0.0), Vector3::zeros()]);
        prop_assert_eq!(list.len(), 2 * steps + 2);
        prop_assert_eq!(list.segments().count(), steps + 1);
    }

    /// The sub-solar latitude stays between the tropics.
    #[test]
    fn prop_sub_solar_latitude_within_tropics(days in -18250.0f64..36500.0) {
        let julian = JulianTime::from_epoch(j2000_noon() + Unit::Day * days);
        let sub = CelestialBody::Sun.equatorial_coordinates(&julian).sub_point(&julian);

        prop_assert!(sub.lat.abs() <= 23.45);
        prop_assert!((-180.0..180.0).contains(&sub.lon));
    }
}
