//! # Frame configuration
//!
//! All the user-facing settings read by [`crate::ground_track::GroundTrack::update`], grouped by
//! concern. Every field has a default, so a RON document only needs to list what it changes:
//!
//! ```ron
//! (
//!     clock: (enable_clock: false, calendar: (year: 2024, month: 6, day: 1)),
//!     sources: (telemetry: true),
//!     window: (before: 0.25, after: 2.0),
//! )
//! ```
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{Kilometer, EARTH_MAJOR_AXIS, M_TO_KM},
    groundtrack_errors::GroundTrackError,
    orbit_path::OrbitWindow,
    state_source::{ManualStateFields, SourceFlags},
    time::ClockSettings,
};

/// Optional outputs of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToggles {
    /// Sample the orbit trail
    pub orbit: bool,
    /// Sub-solar latitude circle
    pub sub_solar: bool,
    /// Sub-lunar latitude circle
    pub sub_lunar: bool,
    /// Display distance of the Sun and Moon markers closing their traces
    pub celestial_marker_distance: Kilometer,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        DisplayToggles {
            orbit: true,
            sub_solar: true,
            sub_lunar: false,
            celestial_marker_distance: 50.0 * EARTH_MAJOR_AXIS * M_TO_KM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub clock: ClockSettings,
    pub sources: SourceFlags,
    pub manual: ManualStateFields,
    pub window: OrbitWindow,
    pub display: DisplayToggles,
}

impl FrameConfig {
    pub fn from_ron_str(input: &str) -> Result<Self, GroundTrackError> {
        Ok(ron::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GroundTrackError> {
        let input = fs::read_to_string(path)?;
        FrameConfig::from_ron_str(&input)
    }
}
