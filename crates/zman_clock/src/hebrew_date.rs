//! Hebrew dates in the display's Nisan-first month numbering.
//!
//! The calendar library numbers months from Tishrei (1) with Adar II as 7;
//! the display numbers them from Nisan (1) with Adar II as 13. Conversion
//! happens only through [`to_library_month`] and [`from_library_month`].

use std::fmt;

use serde::{Deserialize, Serialize};
use zman_hebcal::{HDate, HebrewCalendar, month_name};

use crate::error::ZmanError;

/// Display month (Nisan = 1 … Adar = 12, Adar II = 13) to library month.
///
/// Returns `None` for numbers outside 1..=13.
pub fn to_library_month(month: u8) -> Option<u8> {
    match month {
        1..=6 => Some(month + 7),
        7..=12 => Some(month - 6),
        13 => Some(7),
        _ => None,
    }
}

/// Library month (Tishrei = 1 … Adar II = 7 … Elul = 13) to display month.
pub fn from_library_month(month: u8) -> Option<u8> {
    match month {
        1..=6 => Some(month + 6),
        7 => Some(13),
        8..=13 => Some(month - 7),
        _ => None,
    }
}

/// A Hebrew date with Nisan-first month numbering.
///
/// The civil year of months 7..=12 and 13 is the library year: Tishrei
/// starts the numbered year, so 1 Nisan 5785 follows 29 Adar 5785.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl HebrewDate {
    /// Validated date. Month 13 exists only in leap years; the day must fit
    /// the month's actual length.
    pub fn new<C: HebrewCalendar + ?Sized>(
        calendar: &C,
        year: i32,
        month: u8,
        day: u8,
    ) -> Result<Self, ZmanError> {
        let invalid = ZmanError::InvalidHebrewDateInput { year, month, day };
        let lib_month = to_library_month(month).ok_or(invalid.clone())?;
        if month == 13 && !calendar.is_leap_year(year) {
            return Err(invalid);
        }
        let len = calendar.days_in_month(year, lib_month).map_err(|_| invalid.clone())?;
        if day == 0 || day > len {
            return Err(invalid);
        }
        Ok(Self { year, month, day })
    }

    /// Convert from the library representation.
    pub fn from_library(date: &HDate) -> Self {
        Self {
            year: date.year(),
            // HDate guarantees a month in 1..=13.
            month: from_library_month(date.month()).unwrap_or(1),
            day: date.day(),
        }
    }

    /// Convert to the library representation.
    pub fn to_library<C: HebrewCalendar + ?Sized>(&self, calendar: &C) -> Result<HDate, ZmanError> {
        let invalid = ZmanError::InvalidHebrewDateInput {
            year: self.year,
            month: self.month,
            day: self.day,
        };
        let m = to_library_month(self.month).ok_or(invalid.clone())?;
        calendar.date(self.year, m, self.day).map_err(|_| invalid)
    }

    /// Whether this is the given (month, day), Nisan-first.
    pub fn is(&self, month: u8, day: u8) -> bool {
        self.month == month && self.day == day
    }

    /// Move by whole months for picker navigation, clamping the day to the
    /// target month's length. Months are walked in calendar order, so Adar
    /// II is visited only in leap years and year boundaries fall at Tishrei.
    pub fn add_months<C: HebrewCalendar + ?Sized>(&self, calendar: &C, months: i32) -> Result<Self, ZmanError> {
        let mut year = self.year;
        let mut lib = to_library_month(self.month).ok_or(ZmanError::InvalidHebrewDateInput {
            year: self.year,
            month: self.month,
            day: self.day,
        })?;
        let step = months.signum();
        for _ in 0..months.unsigned_abs() {
            (year, lib) = step_month(calendar, year, lib, step);
        }
        let len = calendar.days_in_month(year, lib)?;
        Ok(Self {
            year,
            month: from_library_month(lib).unwrap_or(1),
            day: self.day.min(len),
        })
    }
}

/// Next or previous existing library month.
fn step_month<C: HebrewCalendar + ?Sized>(calendar: &C, year: i32, lib: u8, step: i32) -> (i32, u8) {
    let (mut y, mut m) = (year, lib);
    loop {
        if step > 0 {
            if m == 13 {
                y += 1;
                m = 1;
            } else {
                m += 1;
            }
        } else if m == 1 {
            y -= 1;
            m = 13;
        } else {
            m -= 1;
        }
        if m != 7 || calendar.is_leap_year(y) {
            return (y, m);
        }
    }
}

impl fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lib = to_library_month(self.month).unwrap_or(0);
        write!(f, "{} {} {}", self.day, month_name(self.year, lib), self.year)
    }
}
