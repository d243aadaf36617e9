//! # Per-frame ground track pipeline
//!
//! [`GroundTrack`] owns the only mutable state of the crate (the telemetry cache and the
//! time-warp accumulator) and the ephemeris / element-set collaborators. Each call to
//! [`GroundTrack::update`] runs the whole chain for one display frame:
//!
//! ```text
//! time resolution → source selection → osculating elements → propagation to the frame time
//!   → J2000 to Earth-fixed → geodetic projection → orbit sampling
//! ```
//!
//! and returns a self-contained [`FrameOutput`]. Nothing in the chain is fatal: a missing source
//! falls back to the manual state, and a state that cannot be propagated keeps the previous
//! frame's body output. Both cases are reported as [`FrameWarning`]s.
use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::{debug, trace, warn};

use crate::{
    celestial::{CelestialBody, EquatorialCoordinates, SubPoint},
    config::{DisplayToggles, FrameConfig},
    constants::{Degree, KM_TO_M, MU_EARTH},
    earth_orientation::{julian_centuries, nutation_terms, NutationParameters},
    geodesy::{spherical_display_point, Ellipsoid, GeodeticCoordinate},
    groundtrack_errors::GroundTrackError,
    keplerian_element::KeplerianElements,
    orbit_path::{sample_orbit, sky_circle, sub_point_trace, LineList},
    ref_system::to_earth_fixed,
    state_source::{
        select, EphemerisProvider, EphemerisTable, ElementPropagator, NoElementSet,
        OsvDisplayFields, Selection, StateSource, TelemetryCache,
    },
    state_vector::StateVector,
    time::{apparent_sidereal_time, JulianTime, TimeResolver},
};

/// Non-blocking conditions detected while computing a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameWarning {
    /// The active state vector is more than 1000 s away from the frame time.
    StaleState { age_seconds: f64 },
    /// The selected source had no data; the manual state was used instead.
    SourceUnavailable { source: StateSource, reason: String },
    /// The state could not be turned into a ground track; the previous body output is kept.
    Propagation { reason: String },
}

/// Everything derived from the body's state in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOutput {
    /// Osculating elements of the state propagated to the frame time
    pub elements: KeplerianElements,
    /// J2000 state at the frame time
    pub inertial: StateVector,
    /// Earth-fixed state at the frame time
    pub earth_fixed: StateVector,
    pub geodetic: GeodeticCoordinate,
    /// Display position (km)
    pub position: Vector3<f64>,
    /// Orbit trail, empty when disabled
    pub orbit: LineList,
}

/// Sun or Moon output of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialOutput {
    pub coordinates: EquatorialCoordinates,
    pub sub_point: SubPoint,
    /// Display position of the marker (km)
    pub marker: Vector3<f64>,
    /// Latitude circle through the sub-point, when enabled
    pub trace: Option<LineList>,
    /// Latitude circle through the marker on the sky sphere, Sun only
    pub sky_circle: Option<LineList>,
}

/// Result of one frame, handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub epoch: Epoch,
    pub julian: JulianTime,
    /// Greenwich apparent sidereal time
    pub sidereal_time: Degree,
    pub source: StateSource,
    /// State vector selected for the frame, before propagation
    pub state: StateVector,
    pub write_back: Option<OsvDisplayFields>,
    /// `None` only when no frame has ever been propagated successfully
    pub body: Option<BodyOutput>,
    pub sun: CelestialOutput,
    pub moon: CelestialOutput,
    pub warnings: Vec<FrameWarning>,
}

impl FrameOutput {
    pub fn is_stale(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, FrameWarning::StaleState { .. }))
    }
}

/// Frame pipeline context.
pub struct GroundTrack {
    time: TimeResolver,
    telemetry: TelemetryCache,
    ephemeris: Box<dyn EphemerisProvider + Send>,
    propagator: Box<dyn ElementPropagator + Send>,
    ellipsoid: Ellipsoid,
    last_body: Option<BodyOutput>,
    stale: bool,
}

impl Default for GroundTrack {
    fn default() -> Self {
        GroundTrack::new()
    }
}

impl GroundTrack {
    pub fn new() -> Self {
        GroundTrack {
            time: TimeResolver::new(),
            telemetry: TelemetryCache::new(),
            ephemeris: Box::new(EphemerisTable::default()),
            propagator: Box::new(NoElementSet),
            ellipsoid: Ellipsoid::WGS84,
            last_body: None,
            stale: false,
        }
    }

    pub fn with_ephemeris(mut self, ephemeris: impl EphemerisProvider + Send + 'static) -> Self {
        self.ephemeris = Box::new(ephemeris);
        self
    }

    pub fn with_propagator(mut self, propagator: impl ElementPropagator + Send + 'static) -> Self {
        self.propagator = Box::new(propagator);
        self
    }

    pub fn set_ephemeris(&mut self, ephemeris: impl EphemerisProvider + Send + 'static) {
        self.ephemeris = Box::new(ephemeris);
    }

    pub fn set_propagator(&mut self, propagator: impl ElementPropagator + Send + 'static) {
        self.propagator = Box::new(propagator);
    }

    /// Replace the cached telemetry state.
    pub fn push_telemetry(&mut self, osv: StateVector) {
        self.telemetry.push(osv);
    }

    pub fn telemetry(&self) -> &TelemetryCache {
        &self.telemetry
    }

    pub fn time_resolver(&self) -> &TimeResolver {
        &self.time
    }

    pub fn reset_warp(&mut self) {
        self.time.reset_warp();
    }

    /// Compute one frame.
    ///
    /// Arguments
    /// ---------
    /// * `now`: wall-clock instant.
    /// * `frame_interval_seconds`: real time elapsed since the previous frame, used by time warp.
    /// * `config`: frame settings.
    pub fn update(&mut self, now: Epoch, frame_interval_seconds: f64, config: &FrameConfig) -> FrameOutput {
        self.time.tick(&config.clock, frame_interval_seconds);
        let epoch = self.time.resolve(now, &config.clock);
        let julian = JulianTime::from_epoch(epoch);
        let nutation = nutation_terms(julian_centuries(&julian));
        let mut warnings = Vec::new();

        let selection = match select(
            &config.sources,
            &self.telemetry,
            self.ephemeris.as_ref(),
            self.propagator.as_ref(),
            &config.manual,
            epoch,
        ) {
            Ok(selection) => selection,
            Err(err) => {
                let source = config.sources.resolve();
                warn!(?source, %err, "state source unavailable, using manual state");
                warnings.push(FrameWarning::SourceUnavailable {
                    source,
                    reason: err.to_string(),
                });
                Selection {
                    source: StateSource::Manual,
                    state: config.manual.to_state_vector(),
                    write_back: None,
                }
            }
        };

        let stale = selection.state.is_stale_at(epoch);
        if stale {
            let age_seconds = selection.state.age_at(epoch).to_seconds();
            if !self.stale {
                warn!(age_seconds, "state vector is stale");
            }
            warnings.push(FrameWarning::StaleState { age_seconds });
        }
        self.stale = stale;

        let body = match self.body_output(&selection.state, epoch, &nutation, config) {
            Ok(body) => {
                self.last_body = Some(body.clone());
                Some(body)
            }
            Err(err) => {
                warn!(%err, "cannot propagate state vector, keeping previous frame");
                warnings.push(FrameWarning::Propagation {
                    reason: err.to_string(),
                });
                self.last_body.clone()
            }
        };

        let sun = self.celestial_output(CelestialBody::Sun, &julian, &config.display);
        let moon = self.celestial_output(CelestialBody::Moon, &julian, &config.display);

        debug!(source = ?selection.source, %epoch, warnings = warnings.len(), "frame computed");

        FrameOutput {
            epoch,
            julian,
            sidereal_time: apparent_sidereal_time(0.0, &julian, &nutation),
            source: selection.source,
            state: selection.state,
            write_back: selection.write_back,
            body,
            sun,
            moon,
            warnings,
        }
    }

    /// [`GroundTrack::update`] driven by the system clock.
    pub fn update_now(
        &mut self,
        frame_interval_seconds: f64,
        config: &FrameConfig,
    ) -> Result<FrameOutput, GroundTrackError> {
        let now = Epoch::now()?;
        Ok(self.update(now, frame_interval_seconds, config))
    }

    fn body_output(
        &self,
        state: &StateVector,
        epoch: Epoch,
        nutation: &NutationParameters,
        config: &FrameConfig,
    ) -> Result<BodyOutput, GroundTrackError> {
        let initial = KeplerianElements::from_state_vector(state, MU_EARTH)?;
        let inertial = initial.propagate(epoch)?;
        let elements = KeplerianElements::from_state_vector(&inertial, MU_EARTH)?;

        let earth_fixed = to_earth_fixed(&inertial, Some(nutation))?;
        let geodetic = self.ellipsoid.to_geodetic(&earth_fixed.position);
        let position = spherical_display_point(
            earth_fixed.position.norm(),
            geodetic.latitude,
            geodetic.longitude,
        );

        let orbit = if config.display.orbit {
            sample_orbit(
                &elements,
                epoch,
                &config.window,
                nutation,
                &self.ellipsoid,
                position,
            )?
        } else {
            LineList::new()
        };
        trace!(vertices = orbit.len(), "orbit trail");

        Ok(BodyOutput {
            elements,
            inertial,
            earth_fixed,
            geodetic,
            position,
            orbit,
        })
    }

    fn celestial_output(
        &self,
        body: CelestialBody,
        julian: &JulianTime,
        display: &DisplayToggles,
    ) -> CelestialOutput {
        let coordinates = body.equatorial_coordinates(julian);
        let sub_point = coordinates.sub_point(julian);
        let distance = display.celestial_marker_distance * KM_TO_M;
        let marker = spherical_display_point(distance, sub_point.lat, sub_point.lon);

        let enabled = match body {
            CelestialBody::Sun => display.sub_solar,
            CelestialBody::Moon => display.sub_lunar,
        };
        let trace = enabled
            .then(|| sub_point_trace(sub_point.lat, sub_point.lon, &self.ellipsoid, marker));
        let sky = matches!(body, CelestialBody::Sun)
            .then(|| sky_circle(sub_point.lat, sub_point.lon, distance));

        CelestialOutput {
            coordinates,
            sub_point,
            marker,
            trace,
            sky_circle: sky,
        }
    }
}

#[cfg(test)]
mod ground_track_test {
    use super::*;
    use crate::{
        constants::TRACE_SAMPLES,
        state_source::{ManualStateFields, SourceFlags},
        time::{CalendarFields, ClockSettings},
    };
    use approx::assert_abs_diff_eq;
    use hifitime::Unit;

    fn manual_clock_config() -> FrameConfig {
        FrameConfig {
            clock: ClockSettings {
                enable_clock: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn wall_clock() -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2031, 1, 1)
    }

    #[test]
    fn test_default_manual_frame() {
        let mut gt = GroundTrack::new();
        let cfg = manual_clock_config();
        let out = gt.update(wall_clock(), 1.0 / 60.0, &cfg);

        assert_eq!(out.source, StateSource::Manual);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert!(out.write_back.is_none());

        let body = out.body.unwrap();
        assert_abs_diff_eq!(body.geodetic.latitude, 0.0, epsilon = 0.1);
        assert!((390_000.0..410_000.0).contains(&body.geodetic.altitude));
        assert_eq!(body.orbit.len(), 2 * cfg.window.sample_count() + 2);
        assert_eq!(body.orbit.points()[body.orbit.len() - 2], body.position);
        assert_eq!(body.orbit.points()[body.orbit.len() - 1], Vector3::zeros());

        let sun_trace = out.sun.trace.unwrap();
        assert_eq!(sun_trace.len(), 2 * TRACE_SAMPLES + 2);
        assert!(out.moon.trace.is_none());

        let sky = out.sun.sky_circle.unwrap();
        assert_eq!(sky.len(), 2 * TRACE_SAMPLES);
        assert_eq!(sky.points()[0], out.sun.marker);
        assert!(out.moon.sky_circle.is_none());
    }

    #[test]
    fn test_sun_sky_circle_ignores_sub_solar_toggle() {
        let mut gt = GroundTrack::new();
        let cfg = FrameConfig {
            display: DisplayToggles {
                sub_solar: false,
                ..Default::default()
            },
            ..manual_clock_config()
        };
        let out = gt.update(wall_clock(), 0.02, &cfg);

        assert!(out.sun.trace.is_none());
        let sky = out.sun.sky_circle.unwrap();
        let radius = cfg.display.celestial_marker_distance;
        assert!(sky
            .points()
            .iter()
            .all(|p| (p.norm() - radius).abs() < 1e-6 * radius));
    }

    #[test]
    fn test_missing_source_falls_back_to_manual() {
        let mut gt = GroundTrack::new();
        let cfg = FrameConfig {
            sources: SourceFlags {
                ephemeris: true,
                ..Default::default()
            },
            ..manual_clock_config()
        };
        let out = gt.update(wall_clock(), 0.02, &cfg);

        assert_eq!(out.source, StateSource::Manual);
        assert!(matches!(
            out.warnings[0],
            FrameWarning::SourceUnavailable {
                source: StateSource::Ephemeris,
                ..
            }
        ));
        assert!(out.body.is_some());
    }

    #[test]
    fn test_stale_state_warning() {
        let mut gt = GroundTrack::new();
        // wall clock drives time, the manual state is dated J2000
        let cfg = FrameConfig::default();
        let out = gt.update(wall_clock(), 0.02, &cfg);
        assert!(out.is_stale());

        let cfg = manual_clock_config();
        let out = gt.update(wall_clock(), 0.02, &cfg);
        assert!(!out.is_stale());
    }

    #[test]
    fn test_degenerate_state_keeps_previous_body() {
        let mut gt = GroundTrack::new();
        let good = manual_clock_config();
        let first = gt.update(wall_clock(), 0.02, &good).body.unwrap();

        let bad = FrameConfig {
            manual: ManualStateFields {
                vx: 0.0,
                vy: 0.0,
                vz: 0.0,
                ..ManualStateFields::default()
            },
            ..manual_clock_config()
        };
        let out = gt.update(wall_clock(), 0.02, &bad);
        assert!(out
            .warnings
            .iter()
            .any(|w| matches!(w, FrameWarning::Propagation { .. })));
        assert_eq!(out.body, Some(first));

        let mut fresh = GroundTrack::new();
        assert!(fresh.update(wall_clock(), 0.02, &bad).body.is_none());
    }

    #[test]
    fn test_telemetry_write_back() {
        let mut gt = GroundTrack::new();
        let now = wall_clock();
        let osv = StateVector::j2000(
            Vector3::new(6_778_000.0, 0.0, 0.0),
            Vector3::new(0.0, 4_763.3, 6_009.8),
            now - Unit::Second * 30.0,
        );
        gt.push_telemetry(osv);

        let cfg = FrameConfig {
            sources: SourceFlags {
                telemetry: true,
                element_propagation: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let out = gt.update(now, 0.02, &cfg);

        assert_eq!(out.source, StateSource::Telemetry);
        assert_eq!(out.state, osv);
        assert!(!out.is_stale());
        let wb = out.write_back.unwrap();
        assert_abs_diff_eq!(wb.x, 6778.0, epsilon = 1e-9);
        assert_eq!(wb.timestamp, CalendarFields::from_epoch(osv.epoch));
    }

    #[test]
    fn test_update_now_follows_system_clock() {
        let mut gt = GroundTrack::new();
        let before = Epoch::now().unwrap();
        let out = gt.update_now(0.02, &FrameConfig::default()).unwrap();

        assert!(out.epoch >= before);
        assert!((out.epoch - before).to_seconds() < 60.0);
    }

    #[test]
    fn test_ground_track_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GroundTrack>();
    }
}
