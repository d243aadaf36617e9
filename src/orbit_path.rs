//! # Orbit path sampling
//!
//! Builds renderer-ready [`LineList`]s: flat vertex lists in which every consecutive pair
//! `(2k, 2k+1)` is an independent segment, in kilometers in the display frame.
//!
//! A polyline `p0, p1, …, pn-1` is stored as `p0, p1, p1, p2, p2, …, pn-1, pn-1` and then closed
//! with extra vertices: one more copy of the last point (a null segment) followed by a final
//! segment, for instance the radius from the body to the Earth's centre.
use hifitime::{Epoch, Unit};
use itertools::Itertools;
use nalgebra::Vector3;
use tracing::trace;

use crate::{
    constants::{Meter, M_TO_KM, SAMPLES_PER_PERIOD, TRACE_SAMPLES, TRACE_STEP_DEG},
    earth_orientation::NutationParameters,
    geodesy::{spherical_display_point, Ellipsoid, GeodeticCoordinate},
    groundtrack_errors::GroundTrackError,
    keplerian_element::KeplerianElements,
    ref_system::to_earth_fixed,
};

/// Vertex list for disconnected line segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineList {
    points: Vec<Vector3<f64>>,
}

impl LineList {
    pub fn new() -> Self {
        LineList::default()
    }

    pub fn with_capacity(samples: usize) -> Self {
        LineList {
            points: Vec::with_capacity(2 * samples + 2),
        }
    }

    /// Append a polyline vertex: the first one once, every later one twice.
    pub fn push(&mut self, point: Vector3<f64>) {
        if !self.points.is_empty() {
            self.points.push(point);
        }
        self.points.push(point);
    }

    /// Repeat the last vertex, then append `tail` verbatim.
    pub fn close_with(&mut self, tail: &[Vector3<f64>]) {
        if let Some(last) = self.points.last().copied() {
            self.points.push(last);
        }
        self.points.extend_from_slice(tail);
    }

    /// Polyline of `steps` vertices produced by `f(0)`, …, `f(steps − 1)`.
    pub fn from_parametric<F>(steps: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> Vector3<f64>,
    {
        let mut list = LineList::with_capacity(steps);
        (0..steps).for_each(|i| list.push(f(i)));
        list
    }

    /// Fallible variant of [`LineList::from_parametric`]: stops at the first error.
    pub fn try_from_parametric<F, E>(steps: usize, mut f: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<Vector3<f64>, E>,
    {
        let mut list = LineList::with_capacity(steps);
        for i in 0..steps {
            list.push(f(i)?);
        }
        Ok(list)
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segments as vertex pairs. A trailing unpaired vertex is ignored.
    pub fn segments(&self) -> impl Iterator<Item = (Vector3<f64>, Vector3<f64>)> + '_ {
        self.points.iter().copied().tuples()
    }

    pub fn into_vec(self) -> Vec<Vector3<f64>> {
        self.points
    }
}

/// Portion of the orbit to draw, in orbital periods before and after the frame instant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrbitWindow {
    pub before: f64,
    pub after: f64,
}

impl Default for OrbitWindow {
    fn default() -> Self {
        OrbitWindow {
            before: 0.5,
            after: 1.5,
        }
    }
}

impl OrbitWindow {
    /// Number of samples covering the window with `period / 100.01` steps.
    pub fn sample_count(&self) -> usize {
        ((self.before + self.after) * SAMPLES_PER_PERIOD).floor().max(0.0) as usize + 1
    }
}

/// Display position (km) of an Earth-fixed point: geodetic angles on a sphere of radius |r|.
pub fn display_point(position: &Vector3<f64>, ellipsoid: &Ellipsoid) -> Vector3<f64> {
    let geo = ellipsoid.to_geodetic(position);
    spherical_display_point(position.norm(), geo.latitude, geo.longitude)
}

/// Sample the orbit around `center` into a closed line list.
///
/// Arguments
/// ---------
/// * `elements`: osculating elements of the body.
/// * `center`: frame instant, the window is centred on it.
/// * `window`: periods before and after `center`.
/// * `nutation`: nutation parameters shared by every sample.
/// * `ellipsoid`: reference ellipsoid of the geodetic projection.
/// * `body`: present display position of the body (km).
///
/// Returns
/// --------
/// * The polyline of the `n` samples followed by the last sample, `body` and the origin
///   (`2n + 2` vertices).
pub fn sample_orbit(
    elements: &KeplerianElements,
    center: Epoch,
    window: &OrbitWindow,
    nutation: &NutationParameters,
    ellipsoid: &Ellipsoid,
    body: Vector3<f64>,
) -> Result<LineList, GroundTrackError> {
    let period = elements.period();
    let step = period / SAMPLES_PER_PERIOD;
    let start = -period * window.before;
    let samples = window.sample_count();
    trace!(samples, period, "sampling orbit");

    let mut path = LineList::try_from_parametric(samples, |i| {
        let offset = start + i as f64 * step;
        let osv = elements.propagate(center + Unit::Second * offset)?;
        let ef = to_earth_fixed(&osv, Some(nutation))?;
        Ok::<_, GroundTrackError>(display_point(&ef.position, ellipsoid))
    })?;

    path.close_with(&[body, Vector3::zeros()]);
    Ok(path)
}

/// Circle of constant latitude through a sub-point, drawn on the ellipsoid surface (km).
///
/// The trace starts at the sub-point longitude and makes a full turn in 1° steps (361
/// samples), then is closed with the last sample, the origin and `marker`.
pub fn sub_point_trace(
    latitude: f64,
    longitude: f64,
    ellipsoid: &Ellipsoid,
    marker: Vector3<f64>,
) -> LineList {
    let mut trace = LineList::from_parametric(TRACE_SAMPLES, |i| {
        let point = GeodeticCoordinate {
            latitude,
            longitude: longitude + i as f64 * TRACE_STEP_DEG,
            altitude: 0.0,
        };
        ellipsoid.to_cartesian(&point) * M_TO_KM
    });
    trace.close_with(&[Vector3::zeros(), marker]);
    trace
}

/// Circle of constant latitude on the sky sphere of radius `distance` (meters), through the
/// marker of a body. Same 361 samples as [`sub_point_trace`], closed with one more copy of the
/// last sample.
pub fn sky_circle(latitude: f64, longitude: f64, distance: Meter) -> LineList {
    let mut circle = LineList::from_parametric(TRACE_SAMPLES, |i| {
        spherical_display_point(distance, latitude, longitude + i as f64 * TRACE_STEP_DEG)
    });
    circle.close_with(&[]);
    circle
}

#[cfg(test)]
mod orbit_path_test {
    use super::*;

    #[test]
    fn test_push_doubles_after_first() {
        let mut list = LineList::new();
        list.push(Vector3::x());
        assert_eq!(list.len(), 1);
        list.push(Vector3::y());
        list.push(Vector3::z());
        assert_eq!(list.points(), &[Vector3::x(), Vector3::y(), Vector3::y(), Vector3::z(), Vector3::z()]);

        list.close_with(&[Vector3::new(1.0, 1.0, 1.0), Vector3::zeros()]);
        assert_eq!(list.len(), 8);
        let segments: Vec<_> = list.segments().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], (Vector3::x(), Vector3::y()));
        assert_eq!(segments[2], (Vector3::z(), Vector3::z()));
        assert_eq!(segments[3], (Vector3::new(1.0, 1.0, 1.0), Vector3::zeros()));
    }

    #[test]
    fn test_close_empty_list() {
        let mut list = LineList::new();
        list.close_with(&[Vector3::x()]);
        assert_eq!(list.points(), &[Vector3::x()]);
    }

    #[test]
    fn test_sample_count() {
        let window = OrbitWindow {
            before: 0.5,
            after: 1.5,
        };
        assert_eq!(window.sample_count(), 201);

        let window = OrbitWindow {
            before: 0.0,
            after: 1.0,
        };
        assert_eq!(window.sample_count(), 101);

        let window = OrbitWindow {
            before: 0.0,
            after: 0.0,
        };
        assert_eq!(window.sample_count(), 1);
    }

    #[test]
    fn test_sub_point_trace_shape() {
        let marker = Vector3::new(0.0, 0.0, 1e5);
        let trace = sub_point_trace(10.0, -20.0, &Ellipsoid::WGS84, marker);
        assert_eq!(trace.len(), 2 * TRACE_SAMPLES + 2);
        assert_eq!(trace.points()[trace.len() - 1], marker);
        assert_eq!(trace.points()[trace.len() - 2], Vector3::zeros());

        // full turn: the last sample is back on the first one
        let first = trace.points()[0];
        let last = trace.points()[trace.len() - 3];
        assert!((first - last).norm() < 1e-6);
        let samples = &trace.points()[..trace.len() - 2];
        assert!(samples.iter().all(|p| p.z == first.z));
    }

    #[test]
    fn test_sky_circle_on_marker_sphere() {
        let distance = 3.2e8;
        let circle = sky_circle(23.0, 170.0, distance);
        assert_eq!(circle.len(), 2 * TRACE_SAMPLES);

        let marker = spherical_display_point(distance, 23.0, 170.0);
        let points = circle.into_vec();
        assert_eq!(points[0], marker);
        assert_eq!(points[points.len() - 1], points[points.len() - 2]);
        assert!((points[points.len() - 1] - marker).norm() < 1e-6);
        assert!(points
            .iter()
            .all(|p| (p.norm() - distance * M_TO_KM).abs() < 1e-6 && (p.z - marker.z).abs() < 1e-6));
    }
}
