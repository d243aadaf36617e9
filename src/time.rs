//! # Time resolution, Julian dates and sidereal time
//!
//! Everything the pipeline does in a frame refers to a single instant produced by
//! [`TimeResolver::resolve`]. That instant is built from
//!
//! - either the wall clock or a set of manual [`CalendarFields`],
//! - a signed manual [`TimeDelta`], always applied,
//! - an accumulated warp offset, applied only when the wall clock drives time.
//!
//! The module also provides the Julian time of an instant ([`JulianTime`]) and the Greenwich
//! sidereal time ([`gmst`], [`sidereal_time`], [`apparent_sidereal_time`]).
//!
//! All calendar inputs are interpreted as **UTC**.
use hifitime::{Duration, Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        Degree, DAYS_PER_CENTURY, DPI, JD, JDTOMJD, MJD, RADEG, SECONDS_PER_DAY, T2000,
    },
    earth_orientation::NutationParameters,
};

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians for a Modified Julian Date.
///
/// This function implements the IAU 1982 polynomial for the mean sidereal time at 0h, plus the
/// fractional-day term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date. The pipeline feeds UTC; the UT1 − UTC difference (< 0.9 s)
///   is below what is visible on a ground track.
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / DAYS_PER_CENTURY;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    let h = (tjm - itjm) * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Julian date of an instant, together with the Julian date of the preceding 0h UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianTime {
    /// Julian date at 0h UTC of the current day (always ends in .5)
    pub jd: JD,
    /// Full Julian date (UTC)
    pub jt: JD,
}

impl JulianTime {
    pub fn from_epoch(epoch: Epoch) -> Self {
        let jt = epoch.to_jde_utc_days();
        let jd = (jt - 0.5).floor() + 0.5;
        JulianTime { jd, jt }
    }

    /// Modified Julian Date of the instant.
    pub fn mjd(&self) -> MJD {
        self.jt - JDTOMJD
    }

    /// Fraction of the UTC day elapsed since 0h, in [0, 1).
    pub fn day_fraction(&self) -> f64 {
        self.jt - self.jd
    }
}

/// Mean sidereal time at a given longitude, in degrees.
///
/// Arguments
/// ---------
/// * `longitude_offset`: east longitude (degrees) of the meridian; `0` gives Greenwich.
/// * `julian`: instant.
///
/// Returns
/// --------
/// * Local mean sidereal time normalised to [0, 360).
pub fn sidereal_time(longitude_offset: Degree, julian: &JulianTime) -> Degree {
    (gmst(julian.mjd()) / RADEG + longitude_offset).rem_euclid(360.0)
}

/// Apparent sidereal time at a given longitude, in degrees: the mean sidereal time corrected
/// by the equation of the equinoxes.
pub fn apparent_sidereal_time(
    longitude_offset: Degree,
    julian: &JulianTime,
    nutation: &NutationParameters,
) -> Degree {
    (sidereal_time(longitude_offset, julian) + nutation.equation_of_equinoxes() / RADEG)
        .rem_euclid(360.0)
}

/// `unit · value`, with a non-finite value counted as zero.
fn finite_duration(unit: Unit, value: f64) -> Duration {
    if value.is_finite() {
        unit * value
    } else {
        Duration::ZERO
    }
}

/// Discrete calendar fields as entered in a user interface.
///
/// `month` is 1-based. No field is validated: out-of-range values roll over into the next
/// larger unit, so day 31 of a 30-day month is the 1st of the following month, month 13 is
/// January of the following year and hour −1 is 23h of the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarFields {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: f64,
}

impl Default for CalendarFields {
    fn default() -> Self {
        CalendarFields {
            year: 2000,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            second: 0.0,
        }
    }
}

impl CalendarFields {
    /// Build the UTC instant described by the fields, with lenient roll-over.
    ///
    /// A non-finite `second` counts as zero.
    pub fn to_epoch(&self) -> Epoch {
        let month0 = self.month - 1;
        let year = self.year + month0.div_euclid(12);
        let month = (month0.rem_euclid(12) + 1) as u8;

        Epoch::from_gregorian_utc_at_midnight(year, month, 1)
            + Unit::Day * (self.day - 1) as f64
            + Unit::Hour * self.hour as f64
            + Unit::Minute * self.minute as f64
            + finite_duration(Unit::Second, self.second)
    }

    /// Split a UTC instant into calendar fields (1-based month).
    pub fn from_epoch(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        CalendarFields {
            year,
            month: month as i32,
            day: day as i32,
            hour: hour as i32,
            minute: minute as i32,
            second: second as f64 + nanos as f64 * 1e-9,
        }
    }
}

/// Signed manual offset added to the resolved time. Each component is independent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeDelta {
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl TimeDelta {
    /// Sum of the components. A non-finite component counts as zero.
    pub fn to_duration(&self) -> Duration {
        finite_duration(Unit::Day, self.days)
            + finite_duration(Unit::Hour, self.hours)
            + finite_duration(Unit::Minute, self.minutes)
            + finite_duration(Unit::Second, self.seconds)
    }
}

/// Clock controls, as exposed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// `true`: time follows the wall clock. `false`: time comes from `calendar`.
    pub enable_clock: bool,
    /// Manual date, used when `enable_clock` is off
    pub calendar: CalendarFields,
    /// Manual offset, always applied
    pub delta: TimeDelta,
    /// Time-warp mode
    pub warp_enabled: bool,
    /// Simulated seconds added per real second while warping
    pub warp_rate: f64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        ClockSettings {
            enable_clock: true,
            calendar: CalendarFields::default(),
            delta: TimeDelta::default(),
            warp_enabled: false,
            warp_rate: 0.0,
        }
    }
}

/// Produces the single authoritative instant of each frame and owns the warp accumulator.
#[derive(Debug, Clone, Default)]
pub struct TimeResolver {
    warp_offset: Duration,
}

impl TimeResolver {
    pub fn new() -> Self {
        TimeResolver::default()
    }

    /// Accumulated warp offset.
    pub fn warp_offset(&self) -> Duration {
        self.warp_offset
    }

    /// Add `rate · frame_interval · 1000` milliseconds to the warp offset.
    ///
    /// The increment is skipped when the product is not finite.
    pub fn advance_warp(&mut self, rate_per_second: f64, frame_interval_seconds: f64) {
        self.warp_offset += finite_duration(
            Unit::Millisecond,
            rate_per_second * frame_interval_seconds * 1000.0,
        );
    }

    pub fn reset_warp(&mut self) {
        self.warp_offset = Duration::ZERO;
    }

    /// Update the warp accumulator for a new frame.
    ///
    /// The offset grows while warp mode is on, whatever the clock source. Switching warp off
    /// freezes it; only [`TimeResolver::reset_warp`] clears it.
    pub fn tick(&mut self, settings: &ClockSettings, frame_interval_seconds: f64) {
        if settings.warp_enabled {
            self.advance_warp(settings.warp_rate, frame_interval_seconds);
        }
    }

    /// Resolve the frame instant.
    ///
    /// Arguments
    /// ---------
    /// * `now`: wall-clock instant.
    /// * `settings`: clock controls.
    ///
    /// Returns
    /// --------
    /// * `calendar + delta` when the clock is manually overridden,
    ///   `now + delta + warp_offset` otherwise.
    pub fn resolve(&self, now: Epoch, settings: &ClockSettings) -> Epoch {
        let delta = settings.delta.to_duration();

        if settings.enable_clock {
            now + delta + self.warp_offset
        } else {
            settings.calendar.to_epoch() + delta
        }
    }
}
