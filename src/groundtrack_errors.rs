use thiserror::Error;

use crate::ref_system::ReferenceFrame;

#[derive(Error, Debug)]
pub enum GroundTrackError {
    #[error("No telemetry state vector has been received yet")]
    NoTelemetry,

    #[error("No ephemeris entry available for the requested instant {0}")]
    NoEphemerisData(hifitime::Epoch),

    #[error("Degenerate state vector: zero angular momentum (rectilinear or null state)")]
    DegenerateState,

    #[error("Orbit is not elliptic (eccentricity {eccentricity}, semi-major axis {semi_major_axis} m)")]
    NonEllipticOrbit {
        eccentricity: f64,
        semi_major_axis: f64,
    },

    #[error("State vector expressed in {found:?} frame, expected {expected:?}")]
    FrameMismatch {
        expected: ReferenceFrame,
        found: ReferenceFrame,
    },

    #[error("Kepler equation solver failed: {0}")]
    KeplerSolverFailed(#[from] roots::SearchError),

    #[error("Element propagator failed: {0}")]
    PropagatorFailed(String),

    #[error("Invalid RON configuration: {0}")]
    InvalidConfig(#[from] ron::error::SpannedError),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("System clock error: {0}")]
    Clock(#[from] hifitime::HifitimeError),
}

impl PartialEq for GroundTrackError {
    fn eq(&self, other: &Self) -> bool {
        use GroundTrackError::*;
        match (self, other) {
            (NoEphemerisData(a), NoEphemerisData(b)) => a == b,
            (
                NonEllipticOrbit {
                    eccentricity: e1,
                    semi_major_axis: a1,
                },
                NonEllipticOrbit {
                    eccentricity: e2,
                    semi_major_axis: a2,
                },
            ) => e1 == e2 && a1 == a2,
            (
                FrameMismatch {
                    expected: e1,
                    found: f1,
                },
                FrameMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (KeplerSolverFailed(a), KeplerSolverFailed(b)) => a == b,
            (PropagatorFailed(a), PropagatorFailed(b)) => a == b,

            // not comparable: equal when same variant
            (InvalidConfig(_), InvalidConfig(_)) => true,
            (IoError(_), IoError(_)) => true,
            (Clock(_), Clock(_)) => true,

            (NoTelemetry, NoTelemetry) => true,
            (DegenerateState, DegenerateState) => true,

            _ => false,
        }
    }
}
