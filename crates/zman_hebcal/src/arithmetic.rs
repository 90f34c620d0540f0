//! Calendar arithmetic on Rata Die day numbers.
//!
//! RD 1 is 0001-01-01 (proleptic Gregorian), matching
//! `NaiveDate::num_days_from_ce`. New years follow the molad of Tishrei
//! with the postponement rules; month lengths follow from the year length.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::CalendarError;

/// RD of 1 Tishrei AM 1.
pub const HEBREW_EPOCH_RD: i64 = -1_373_427;

/// Earliest supported Hebrew year.
pub const MIN_YEAR: i32 = 3762;
/// Latest supported Hebrew year.
pub const MAX_YEAR: i32 = 9999;

const PARTS_PER_DAY: i64 = 25_920;

/// Leap years carry a 13th month (Adar II). Seven per 19-year cycle.
pub fn is_leap_year(year: i32) -> bool {
    (7 * i64::from(year) + 1).rem_euclid(19) < 7
}

/// Number of months in `year`.
pub fn months_in_year(year: i32) -> u8 {
    if is_leap_year(year) { 13 } else { 12 }
}

/// Days from the epoch to the molad-based new year, with the
/// lo-ADU postponement folded in.
fn elapsed_days(year: i32) -> i64 {
    let months = (235 * i64::from(year) - 234).div_euclid(19);
    let parts = 12_084 + 13_753 * months;
    let day = 29 * months + parts.div_euclid(PARTS_PER_DAY);
    if (3 * (day + 1)).rem_euclid(7) < 3 { day + 1 } else { day }
}

/// Extra delay keeping every year length in the six legal values.
fn year_length_correction(year: i32) -> i64 {
    let ny0 = elapsed_days(year - 1);
    let ny1 = elapsed_days(year);
    let ny2 = elapsed_days(year + 1);
    if ny2 - ny1 == 356 {
        2
    } else if ny1 - ny0 == 382 {
        1
    } else {
        0
    }
}

/// RD of 1 Tishrei of `year`.
pub fn new_year_rd(year: i32) -> i64 {
    HEBREW_EPOCH_RD + elapsed_days(year) + year_length_correction(year)
}

/// Days in `year`: one of 353, 354, 355, 383, 384, 385.
pub fn days_in_year(year: i32) -> i64 {
    new_year_rd(year + 1) - new_year_rd(year)
}

/// Days in a month, Tishrei-first numbering. Returns 0 for a month the year
/// does not have (Adar II in a common year, or anything outside 1..=13).
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 5 | 8 | 10 | 12 => 30,
        4 | 9 | 11 | 13 => 29,
        2 => {
            if days_in_year(year) % 10 == 5 { 30 } else { 29 }
        }
        3 => {
            if days_in_year(year) % 10 == 3 { 29 } else { 30 }
        }
        6 => {
            if is_leap_year(year) { 30 } else { 29 }
        }
        7 => {
            if is_leap_year(year) { 29 } else { 0 }
        }
        _ => 0,
    }
}

/// Months of `year` in calendar order (Tishrei-first numbering).
pub fn year_months(year: i32) -> impl Iterator<Item = u8> {
    (1..=13u8).filter(move |&m| days_in_month(year, m) > 0)
}

/// RD of a civil date.
pub fn rd_from_civil(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Civil date of an RD.
pub fn civil_from_rd(rd: i64) -> Result<NaiveDate, CalendarError> {
    i32::try_from(rd)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| CalendarError::OutOfRange(format!("rd {rd}")))
}

/// Weekday of an RD (RD 1 is a Monday).
pub fn weekday_of_rd(rd: i64) -> Weekday {
    match rd.rem_euclid(7) {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// First RD on or before `rd` that falls on `weekday`.
pub fn on_or_before(rd: i64, weekday: Weekday) -> i64 {
    let back = (i64::from(weekday_of_rd(rd).num_days_from_sunday())
        - i64::from(weekday.num_days_from_sunday()))
    .rem_euclid(7);
    rd - back
}

/// First RD on or after `rd` that falls on `weekday`.
pub fn on_or_after(rd: i64, weekday: Weekday) -> i64 {
    on_or_before(rd + 6, weekday)
}
