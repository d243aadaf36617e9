//! # State source selection
//!
//! Each frame exactly one [`StateSource`] provides the authoritative orbital state vector. The
//! sources are ranked, and the first enabled one wins:
//!
//! 1. [`StateSource::Telemetry`] – the latest state pushed into the [`TelemetryCache`],
//! 2. [`StateSource::Ephemeris`] – the nearest entry of an [`EphemerisProvider`],
//! 3. [`StateSource::ElementPropagation`] – an [`ElementPropagator`] evaluated at the frame time,
//! 4. [`StateSource::Manual`] – the [`ManualStateFields`] entered by the user, used when nothing
//!    else is enabled.
//!
//! Every non-manual selection also produces a write-back of the selected state into the manual
//! fields representation ([`OsvDisplayFields`]), so that a user interface can mirror it.
use std::cmp::Ordering;

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{KM_TO_M, MU_EARTH, M_TO_KM},
    groundtrack_errors::GroundTrackError,
    keplerian_element::KeplerianElements,
    state_vector::StateVector,
    time::CalendarFields,
};

/// Origin of the state vector used in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateSource {
    Telemetry,
    Ephemeris,
    ElementPropagation,
    Manual,
}

/// User toggles for the state sources. Several may be on at once; [`SourceFlags::resolve`]
/// applies the priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFlags {
    pub telemetry: bool,
    pub ephemeris: bool,
    pub element_propagation: bool,
}

impl SourceFlags {
    pub fn resolve(&self) -> StateSource {
        if self.telemetry {
            StateSource::Telemetry
        } else if self.ephemeris {
            StateSource::Ephemeris
        } else if self.element_propagation {
            StateSource::ElementPropagation
        } else {
            StateSource::Manual
        }
    }
}

/// Most recent telemetry state. Each push replaces the previous state.
#[derive(Debug, Clone, Default)]
pub struct TelemetryCache {
    latest: Option<StateVector>,
}

impl TelemetryCache {
    pub fn new() -> Self {
        TelemetryCache::default()
    }

    pub fn push(&mut self, osv: StateVector) {
        self.latest = Some(osv);
    }

    pub fn latest(&self) -> Option<&StateVector> {
        self.latest.as_ref()
    }
}

/// Source of tabulated state vectors.
pub trait EphemerisProvider {
    /// Entry closest in time to `instant`, in either direction. `None` when no entry exists.
    fn nearest(&self, instant: Epoch) -> Option<StateVector>;
}

/// In-memory ephemeris: a list of state vectors sorted by epoch.
#[derive(Debug, Clone, Default)]
pub struct EphemerisTable {
    entries: Vec<StateVector>,
}

impl EphemerisTable {
    pub fn new(mut entries: Vec<StateVector>) -> Self {
        entries.sort_by(|a, b| a.epoch.partial_cmp(&b.epoch).unwrap_or(Ordering::Equal));
        EphemerisTable { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StateVector] {
        &self.entries
    }
}

impl FromIterator<StateVector> for EphemerisTable {
    fn from_iter<I: IntoIterator<Item = StateVector>>(iter: I) -> Self {
        EphemerisTable::new(iter.into_iter().collect())
    }
}

impl EphemerisProvider for EphemerisTable {
    /// Binary search for the entries bracketing `instant`; on an exact tie the earlier entry
    /// is returned.
    fn nearest(&self, instant: Epoch) -> Option<StateVector> {
        let idx = self.entries.partition_point(|osv| osv.epoch < instant);

        let before = idx.checked_sub(1).and_then(|i| self.entries.get(i));
        let after = self.entries.get(idx);

        match (before, after) {
            (Some(b), Some(a)) => {
                if b.age_at(instant) <= a.age_at(instant) {
                    Some(*b)
                } else {
                    Some(*a)
                }
            }
            (Some(only), None) | (None, Some(only)) => Some(*only),
            (None, None) => None,
        }
    }
}

/// Position and velocity in kilometers and kilometers per second, as returned by element-set
/// propagators (two-line element sets and similar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionVelocityKm {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Evaluates an orbital element set at an arbitrary instant.
pub trait ElementPropagator {
    fn propagate(&self, instant: Epoch) -> Result<PositionVelocityKm, GroundTrackError>;
}

/// Unperturbed Keplerian propagation of a fixed element set, reporting in km and km/s.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoBodyPropagator {
    elements: KeplerianElements,
}

impl TwoBodyPropagator {
    pub fn new(elements: KeplerianElements) -> Self {
        TwoBodyPropagator { elements }
    }

    pub fn from_state_vector(osv: &StateVector) -> Result<Self, GroundTrackError> {
        Ok(TwoBodyPropagator::new(KeplerianElements::from_state_vector(
            osv, MU_EARTH,
        )?))
    }

    pub fn elements(&self) -> &KeplerianElements {
        &self.elements
    }
}

impl ElementPropagator for TwoBodyPropagator {
    fn propagate(&self, instant: Epoch) -> Result<PositionVelocityKm, GroundTrackError> {
        let osv = self.elements.propagate(instant)?;
        Ok(PositionVelocityKm {
            position: osv.position * M_TO_KM,
            velocity: osv.velocity * M_TO_KM,
        })
    }
}

/// Propagator used while no element set has been loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElementSet;

impl ElementPropagator for NoElementSet {
    fn propagate(&self, _instant: Epoch) -> Result<PositionVelocityKm, GroundTrackError> {
        Err(GroundTrackError::PropagatorFailed(
            "no element set loaded".to_string(),
        ))
    }
}

/// State vector as entered in a user interface: position in km, velocity in m/s, timestamp as
/// calendar fields (1-based month).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualStateFields {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub timestamp: CalendarFields,
}

/// Write-back of the active state into the manual fields layout.
pub type OsvDisplayFields = ManualStateFields;

impl Default for ManualStateFields {
    /// Circular 6778 km orbit inclined at 51.6°, at its ascending node, at J2000.0.
    fn default() -> Self {
        ManualStateFields {
            x: 6_778.0,
            y: 0.0,
            z: 0.0,
            vx: 0.0,
            vy: 4_763.3,
            vz: 6_009.8,
            timestamp: CalendarFields::default(),
        }
    }
}

impl ManualStateFields {
    pub fn to_state_vector(&self) -> StateVector {
        StateVector::j2000(
            Vector3::new(self.x, self.y, self.z) * KM_TO_M,
            Vector3::new(self.vx, self.vy, self.vz),
            self.timestamp.to_epoch(),
        )
    }

    pub fn from_state_vector(osv: &StateVector) -> Self {
        let position = osv.position * M_TO_KM;
        ManualStateFields {
            x: position.x,
            y: position.y,
            z: position.z,
            vx: osv.velocity.x,
            vy: osv.velocity.y,
            vz: osv.velocity.z,
            timestamp: CalendarFields::from_epoch(osv.epoch),
        }
    }
}

/// Outcome of the source selection for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub source: StateSource,
    pub state: StateVector,
    /// Fields mirroring `state`, absent for the manual source.
    pub write_back: Option<OsvDisplayFields>,
}

/// Select the state vector of the frame.
///
/// Arguments
/// ---------
/// * `flags`: enabled sources.
/// * `telemetry`: telemetry cache.
/// * `ephemeris`: tabulated states.
/// * `propagator`: element set propagator (km, km/s).
/// * `manual`: manual fields, used when no other source is enabled.
/// * `now`: resolved frame instant.
///
/// Errors
/// ------
/// * [`GroundTrackError::NoTelemetry`] when telemetry is selected but nothing was pushed.
/// * [`GroundTrackError::NoEphemerisData`] when the ephemeris is selected but empty.
/// * Any error of the element propagator.
pub fn select(
    flags: &SourceFlags,
    telemetry: &TelemetryCache,
    ephemeris: &dyn EphemerisProvider,
    propagator: &dyn ElementPropagator,
    manual: &ManualStateFields,
    now: Epoch,
) -> Result<Selection, GroundTrackError> {
    let source = flags.resolve();
    debug!(?source, "selecting state vector");

    let state = match source {
        StateSource::Telemetry => *telemetry.latest().ok_or(GroundTrackError::NoTelemetry)?,
        StateSource::Ephemeris => ephemeris
            .nearest(now)
            .ok_or(GroundTrackError::NoEphemerisData(now))?,
        StateSource::ElementPropagation => {
            let pv = propagator.propagate(now)?;
            StateVector::j2000(pv.position * KM_TO_M, pv.velocity * KM_TO_M, now)
        }
        StateSource::Manual => {
            return Ok(Selection {
                source,
                state: manual.to_state_vector(),
                write_back: None,
            })
        }
    };

    Ok(Selection {
        source,
        state,
        write_back: Some(OsvDisplayFields::from_state_vector(&state)),
    })
}
