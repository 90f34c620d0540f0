//! Julian Date conversions for `DateTime<Utc>` instants.
//!
//! The astronomy layer works in fractional Julian Days; everything above it
//! works in `chrono` instants. These helpers are the only crossing point.

use chrono::{DateTime, Utc};

use crate::error::TimeError;

/// Julian Date of the J2000.0 epoch (2000-01-01T12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds in a civil day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Milliseconds in a civil day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Julian Date (UT) of an instant, with millisecond resolution.
pub fn jd_from_instant(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MS_PER_DAY as f64 + UNIX_EPOCH_JD
}

/// Instant for a Julian Date (UT), rounded to the nearest millisecond.
pub fn instant_from_jd(jd: f64) -> Result<DateTime<Utc>, TimeError> {
    let ms = ((jd - UNIX_EPOCH_JD) * MS_PER_DAY as f64).round();
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return Err(TimeError::OutOfRange(format!("{jd}")));
    }
    DateTime::from_timestamp_millis(ms as i64).ok_or_else(|| TimeError::OutOfRange(format!("{jd}")))
}

/// Julian centuries of Terrestrial Time since J2000.0.
///
/// `delta_t_s` is TT − UT in seconds; a constant is accurate enough for the
/// low-precision solar and lunar series used downstream.
pub fn julian_centuries_tt(jd_ut: f64, delta_t_s: f64) -> f64 {
    (jd_ut + delta_t_s / SECONDS_PER_DAY - J2000_JD) / 36_525.0
}
