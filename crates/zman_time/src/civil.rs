//! Timezone-aware civil date extraction.
//!
//! Every "which calendar day is this instant" question goes through a
//! [`TimeZoneContext`] instead of the machine's implicit zone, so a user
//! viewing a remote location sees that location's day boundaries.

use chrono::{
    DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::error::TimeError;

/// How far a DST gap is searched for the first valid local time.
const GAP_PROBE_STEPS: i64 = 8;
const GAP_PROBE_MINUTES: i64 = 15;

/// The zone civil dates are computed in.
///
/// With no IANA name the process-local zone is used.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeZoneContext {
    iana_name: Option<String>,
    zone: Option<Tz>,
}

impl TimeZoneContext {
    /// Context for a named IANA zone, e.g. `"Asia/Jerusalem"`.
    pub fn named(name: &str) -> Result<Self, TimeError> {
        let zone: Tz = name
            .parse()
            .map_err(|_| TimeError::UnknownZone(name.to_string()))?;
        Ok(Self {
            iana_name: Some(name.to_string()),
            zone: Some(zone),
        })
    }

    /// Context for the process-local zone.
    pub fn local() -> Self {
        Self {
            iana_name: None,
            zone: None,
        }
    }

    /// Named zone when given, process-local otherwise.
    pub fn from_optional(name: Option<&str>) -> Result<Self, TimeError> {
        match name {
            Some(n) => Self::named(n),
            None => Ok(Self::local()),
        }
    }

    pub fn iana_name(&self) -> Option<&str> {
        self.iana_name.as_deref()
    }

    /// Civil (year, month, day) of `instant` as observed in this zone.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self.zone {
            Some(tz) => instant.with_timezone(&tz).date_naive(),
            None => instant.with_timezone(&Local).date_naive(),
        }
    }

    /// Civil weekday of `instant` in this zone.
    pub fn weekday(&self, instant: DateTime<Utc>) -> Weekday {
        self.civil_date(instant).weekday()
    }

    /// Offset from UTC at `instant`, in seconds east.
    pub fn utc_offset_seconds(&self, instant: DateTime<Utc>) -> i32 {
        match self.zone {
            Some(tz) => instant.with_timezone(&tz).offset().fix().local_minus_utc(),
            None => instant.with_timezone(&Local).offset().local_minus_utc(),
        }
    }

    /// First instant of `date` in this zone.
    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, TimeError> {
        self.at_local(date, NaiveTime::MIN)
    }

    /// Local 12:00 of `date`, the DST-safe representative of a civil day.
    pub fn local_noon(&self, date: NaiveDate) -> Result<DateTime<Utc>, TimeError> {
        let noon = NaiveTime::from_hms_opt(12, 0, 0)
            .ok_or_else(|| TimeError::UnmappableLocalTime("12:00".to_string()))?;
        self.at_local(date, noon)
    }

    /// Instant of a local wall-clock time.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times inside
    /// a DST gap move forward to the first valid local time.
    pub fn at_local(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, TimeError> {
        let naive = date.and_time(time);
        match self.zone {
            Some(tz) => resolve_in(&tz, naive),
            None => resolve_in(&Local, naive),
        }
    }
}

impl Default for TimeZoneContext {
    fn default() -> Self {
        Self::local()
    }
}

fn resolve_in<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> Result<DateTime<Utc>, TimeError> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => (1..=GAP_PROBE_STEPS)
            .find_map(|step| {
                let probe = naive + TimeDelta::minutes(GAP_PROBE_MINUTES * step);
                zone.from_local_datetime(&probe).earliest()
            })
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| TimeError::UnmappableLocalTime(naive.to_string())),
    }
}
