//! Hebrew calendar dates in Tishrei-first month numbering.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::arithmetic::{
    MAX_YEAR, MIN_YEAR, civil_from_rd, days_in_month, is_leap_year, new_year_rd, rd_from_civil,
    weekday_of_rd, year_months,
};
use crate::error::CalendarError;

/// Month numbers, Tishrei-first.
pub mod month {
    pub const TISHREI: u8 = 1;
    pub const CHESHVAN: u8 = 2;
    pub const KISLEV: u8 = 3;
    pub const TEVET: u8 = 4;
    pub const SHEVAT: u8 = 5;
    /// Adar in a common year, Adar I in a leap year.
    pub const ADAR: u8 = 6;
    /// Leap years only.
    pub const ADAR_II: u8 = 7;
    pub const NISAN: u8 = 8;
    pub const IYAR: u8 = 9;
    pub const SIVAN: u8 = 10;
    pub const TAMMUZ: u8 = 11;
    pub const AV: u8 = 12;
    pub const ELUL: u8 = 13;
}

/// A date in the Hebrew calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HDate {
    year: i32,
    month: u8,
    day: u8,
}

impl HDate {
    /// Validated constructor.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        let invalid = CalendarError::InvalidDate { year, month, day };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::OutOfRange(format!("year {year}")));
        }
        let len = days_in_month(year, month);
        if len == 0 || day == 0 || day > len {
            return Err(invalid);
        }
        Ok(Self { year, month, day })
    }

    /// Hebrew date for an RD day number.
    pub fn from_rd(rd: i64) -> Result<Self, CalendarError> {
        let approx = ((rd - crate::arithmetic::HEBREW_EPOCH_RD) as f64 / 365.246_822).floor() as i64 + 1;
        let mut year = i32::try_from(approx)
            .map_err(|_| CalendarError::OutOfRange(format!("rd {rd}")))?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::OutOfRange(format!("rd {rd}")));
        }
        while new_year_rd(year) > rd {
            year -= 1;
        }
        while new_year_rd(year + 1) <= rd {
            year += 1;
        }
        let mut offset = rd - new_year_rd(year);
        for m in year_months(year) {
            let len = i64::from(days_in_month(year, m));
            if offset < len {
                return Self::new(year, m, (offset + 1) as u8);
            }
            offset -= len;
        }
        Err(CalendarError::OutOfRange(format!("rd {rd}")))
    }

    /// RD day number of this date.
    pub fn to_rd(&self) -> i64 {
        let before: i64 = year_months(self.year)
            .take_while(|&m| m != self.month)
            .map(|m| i64::from(days_in_month(self.year, m)))
            .sum();
        new_year_rd(self.year) + before + i64::from(self.day) - 1
    }

    /// Hebrew date of a civil date. The Hebrew date is the one whose
    /// daytime coincides with the civil day.
    pub fn from_civil(date: NaiveDate) -> Result<Self, CalendarError> {
        Self::from_rd(rd_from_civil(date))
    }

    /// Civil date whose daytime coincides with this Hebrew date.
    pub fn to_civil(&self) -> Result<NaiveDate, CalendarError> {
        civil_from_rd(self.to_rd())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, Tishrei-first numbering.
    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    pub fn days_in_month(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    pub fn weekday(&self) -> Weekday {
        weekday_of_rd(self.to_rd())
    }

    /// The following day.
    pub fn succ(&self) -> Result<Self, CalendarError> {
        self.add_days(1)
    }

    /// The preceding day.
    pub fn pred(&self) -> Result<Self, CalendarError> {
        self.add_days(-1)
    }

    pub fn add_days(&self, days: i64) -> Result<Self, CalendarError> {
        Self::from_rd(self.to_rd() + days)
    }

    /// Transliterated month name, e.g. "Adar I" in a leap year.
    pub fn month_name(&self) -> &'static str {
        month_name(self.year, self.month)
    }
}

impl fmt::Display for HDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

/// Transliterated name of a month in `year`.
pub fn month_name(year: i32, month: u8) -> &'static str {
    match month {
        month::TISHREI => "Tishrei",
        month::CHESHVAN => "Cheshvan",
        month::KISLEV => "Kislev",
        month::TEVET => "Tevet",
        month::SHEVAT => "Sh'vat",
        month::ADAR if is_leap_year(year) => "Adar I",
        month::ADAR => "Adar",
        month::ADAR_II => "Adar II",
        month::NISAN => "Nisan",
        month::IYAR => "Iyyar",
        month::SIVAN => "Sivan",
        month::TAMMUZ => "Tamuz",
        month::AV => "Av",
        month::ELUL => "Elul",
        _ => "",
    }
}
