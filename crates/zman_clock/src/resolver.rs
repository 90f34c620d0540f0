//! Hebrew date resolution with nightfall rollover.
//!
//! The Hebrew day begins at tzeis. Before tzeis the Hebrew date is the one
//! whose daytime coincides with the civil day; from tzeis on it is that
//! date's successor. The displayed weekday rolls at the same instant.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use zman_hebcal::{HDate, HebrewCalendar};
use zman_time::TimeZoneContext;

use crate::error::ZmanError;
use crate::hebrew_date::HebrewDate;

/// The Hebrew day in force at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDay {
    /// Nisan-first display date.
    pub hebrew: HebrewDate,
    /// Same date in library form.
    pub library: HDate,
    /// Civil date of the instant in the target zone.
    pub civil_date: NaiveDate,
    /// Weekday of the Hebrew day in force.
    pub displayed_weekday: Weekday,
    /// Whether tzeis has passed and the Hebrew date has rolled.
    pub after_nightfall: bool,
}

impl ResolvedDay {
    /// Whether the Hebrew date still matches the civil date.
    pub fn matches_civil_day(&self) -> bool {
        !self.after_nightfall
    }

    /// The Hebrew day after this one.
    pub fn next_library_date(&self) -> Result<HDate, ZmanError> {
        Ok(self.library.succ()?)
    }
}

/// Resolve the Hebrew date in force at `instant`.
///
/// `tzeis` must be the nightfall of the civil day containing `instant` in
/// `timezone`, the same value the zmanim carry.
pub fn resolve<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    instant: DateTime<Utc>,
    timezone: &TimeZoneContext,
    tzeis: DateTime<Utc>,
) -> Result<ResolvedDay, ZmanError> {
    let civil_date = timezone.civil_date(instant);
    let candidate = calendar.from_civil(civil_date)?;
    let after_nightfall = instant >= tzeis;
    let (library, displayed_weekday) = if after_nightfall {
        (candidate.succ()?, civil_date.weekday().succ())
    } else {
        (candidate, civil_date.weekday())
    };
    Ok(ResolvedDay {
        hebrew: HebrewDate::from_library(&library),
        library,
        civil_date,
        displayed_weekday,
        after_nightfall,
    })
}
