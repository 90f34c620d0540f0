//! Arithmetic Hebrew calendar.
//!
//! Civil ↔ Hebrew conversion on Rata Die day numbers, month lengths, a
//! holiday table with Israel/diaspora flags and the weekly-portion schedule.
//! Months are numbered Tishrei-first (1 Tishrei … 6 Adar/Adar I, 7 Adar II,
//! 8 Nisan … 13 Elul).
//!
//! [`HebrewCalendar`] is the capability consumers depend on;
//! [`ArithmeticCalendar`] implements it without any tables or I/O.

pub mod arithmetic;
pub mod date;
pub mod error;
pub mod holidays;
pub mod omer;
pub mod sedra;

use chrono::NaiveDate;

pub use arithmetic::{days_in_month, days_in_year, is_leap_year, months_in_year};
pub use date::{HDate, month, month_name};
pub use error::CalendarError;
pub use holidays::{HolidayEvent, HolidayFlags, holidays_for_year, holidays_on};
pub use omer::omer_text;
pub use sedra::{PARSHIYOT, Reading, SedraSchedule, weekly_portion};

/// Hebrew calendar capability.
///
/// Months use Tishrei-first numbering throughout.
pub trait HebrewCalendar {
    /// Hebrew date whose daytime falls on `date`.
    fn from_civil(&self, date: NaiveDate) -> Result<HDate, CalendarError>;

    /// Civil date of a Hebrew date's daytime.
    fn to_civil(&self, date: &HDate) -> Result<NaiveDate, CalendarError>;

    /// Validated Hebrew date.
    fn date(&self, year: i32, month: u8, day: u8) -> Result<HDate, CalendarError>;

    fn is_leap_year(&self, year: i32) -> bool;

    /// Month length, or `InvalidDate` for a month the year lacks.
    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError>;

    /// Holiday events on `date` for both regions.
    fn holidays_on(&self, date: &HDate) -> Result<Vec<HolidayEvent>, CalendarError>;

    /// Reading for the Sabbath on or after `date`.
    fn weekly_portion(&self, date: &HDate, israel: bool) -> Result<Option<String>, CalendarError>;

    /// Text for an omer day.
    fn omer_text(&self, day: u8) -> Option<String>;
}

/// Calendar computed from the molad and postponement rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArithmeticCalendar;

impl HebrewCalendar for ArithmeticCalendar {
    fn from_civil(&self, date: NaiveDate) -> Result<HDate, CalendarError> {
        HDate::from_civil(date)
    }

    fn to_civil(&self, date: &HDate) -> Result<NaiveDate, CalendarError> {
        date.to_civil()
    }

    fn date(&self, year: i32, month: u8, day: u8) -> Result<HDate, CalendarError> {
        HDate::new(year, month, day)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        arithmetic::is_leap_year(year)
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        match arithmetic::days_in_month(year, month) {
            0 => Err(CalendarError::InvalidDate { year, month, day: 1 }),
            n => Ok(n),
        }
    }

    fn holidays_on(&self, date: &HDate) -> Result<Vec<HolidayEvent>, CalendarError> {
        holidays::holidays_on(date)
    }

    fn weekly_portion(&self, date: &HDate, israel: bool) -> Result<Option<String>, CalendarError> {
        sedra::weekly_portion(date, israel)
    }

    fn omer_text(&self, day: u8) -> Option<String> {
        omer::omer_text(day)
    }
}
