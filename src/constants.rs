//! # Constants and type definitions for groundtrack
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Geophysical constants (Earth gravitational parameter, WGS84 axes, rotation rate)
//! - Time constants (J2000 epoch, Julian date offsets)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, km ↔ m)
//! - Pipeline constants (staleness threshold, orbit sampling denominator)
//!
//! All lengths handled by the pipeline are in **meters** and all velocities in **m/s**, except
//! the display frame which is in **kilometers**.

// -------------------------------------------------------------------------------------------------
// Mathematical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Kilometers → meters
pub const KM_TO_M: f64 = 1000.0;

/// Meters → kilometers
pub const M_TO_KM: f64 = 0.001;

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51544.5;

/// Julian Date of J2000.0
pub const JD2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

// -------------------------------------------------------------------------------------------------
// Earth model
// -------------------------------------------------------------------------------------------------

/// Earth gravitational parameter μ in m³/s² (WGS84)
pub const MU_EARTH: f64 = 3.986_004_418e14;

/// Earth equatorial radius in meters (WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.314_14;

/// Mean angular velocity of the Earth in rad/s
pub const EARTH_ROTATION_RATE: f64 = 7.292_115_146_7e-5;

// -------------------------------------------------------------------------------------------------
// Pipeline constants
// -------------------------------------------------------------------------------------------------

/// Age (seconds) of the active state vector above which a staleness warning is raised
pub const STALENESS_THRESHOLD_SECONDS: f64 = 1000.0;

/// Number of orbit samples per period. Not an integer so that the first and last samples of
/// a full revolution never land on the same phase.
pub const SAMPLES_PER_PERIOD: f64 = 100.01;

/// Longitude increment (degrees) of the circular sub-point traces
pub const TRACE_STEP_DEG: f64 = 1.0;

/// Number of samples of a circular sub-point trace (0° to 360° inclusive)
pub const TRACE_SAMPLES: usize = 361;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Julian Date (days)
pub type JD = f64;
