//! Holiday table with region and category flags.
//!
//! Events are generated per Hebrew year and looked up by date. Events that
//! differ between Israel and the diaspora carry `IL_ONLY` or `CHUL_ONLY`;
//! callers pick the rule set by filtering on those flags.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::arithmetic::{days_in_month, is_leap_year, weekday_of_rd};
use crate::date::{HDate, month, month_name};
use crate::error::CalendarError;

/// Category and region flags attached to a holiday event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HolidayFlags(u32);

impl HolidayFlags {
    pub const NONE: Self = Self(0);
    /// Yom tov: work prohibited, candles lit the evening before.
    pub const CHAG: Self = Self(1 << 0);
    /// Candle lighting on this day's evening.
    pub const LIGHT_CANDLES: Self = Self(1 << 1);
    /// Eve of a holiday.
    pub const EREV: Self = Self(1 << 2);
    pub const CHOL_HAMOED: Self = Self(1 << 3);
    pub const MINOR_FAST: Self = Self(1 << 4);
    pub const MAJOR_FAST: Self = Self(1 << 5);
    /// Civil Israeli observance.
    pub const MODERN_HOLIDAY: Self = Self(1 << 6);
    pub const MINOR_HOLIDAY: Self = Self(1 << 7);
    pub const ROSH_CHODESH: Self = Self(1 << 8);
    pub const CHANUKAH_CANDLES: Self = Self(1 << 9);
    /// Observed only in Israel.
    pub const IL_ONLY: Self = Self(1 << 10);
    /// Observed only outside Israel.
    pub const CHUL_ONLY: Self = Self(1 << 11);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any flag in `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the event applies to the given region.
    pub const fn observed_in(self, israel: bool) -> bool {
        if israel {
            !self.contains(Self::CHUL_ONLY)
        } else {
            !self.contains(Self::IL_ONLY)
        }
    }
}

impl BitOr for HolidayFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for HolidayFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for HolidayFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// One holiday occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEvent {
    pub date: HDate,
    pub desc: String,
    pub flags: HolidayFlags,
}

impl HolidayEvent {
    fn new(date: HDate, desc: impl Into<String>, flags: HolidayFlags) -> Self {
        Self {
            date,
            desc: desc.into(),
            flags,
        }
    }
}

impl fmt::Display for HolidayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.desc)
    }
}

type F = HolidayFlags;

struct YearBuilder {
    year: i32,
    events: Vec<HolidayEvent>,
}

impl YearBuilder {
    fn date(&self, m: u8, d: u8) -> Result<HDate, CalendarError> {
        HDate::new(self.year, m, d)
    }

    fn add(&mut self, m: u8, d: u8, desc: impl Into<String>, flags: F) -> Result<(), CalendarError> {
        let date = self.date(m, d)?;
        self.events.push(HolidayEvent::new(date, desc, flags));
        Ok(())
    }

    fn add_date(&mut self, date: HDate, desc: impl Into<String>, flags: F) {
        self.events.push(HolidayEvent::new(date, desc, flags));
    }

    fn weekday(&self, m: u8, d: u8) -> Result<Weekday, CalendarError> {
        Ok(weekday_of_rd(self.date(m, d)?.to_rd()))
    }

    /// Fast day that moves off Sabbath: forward one day, or back to Thursday.
    fn add_fast(&mut self, m: u8, d: u8, desc: &str, flags: F, back_to_thursday: bool) -> Result<(), CalendarError> {
        let day = if self.weekday(m, d)? == Weekday::Sat {
            if back_to_thursday { d - 2 } else { d + 1 }
        } else {
            d
        };
        self.add(m, day, desc, flags)
    }
}

/// Every holiday event whose date falls in Hebrew `year`.
pub fn holidays_for_year(year: i32) -> Result<Vec<HolidayEvent>, CalendarError> {
    let leap = is_leap_year(year);
    let adar = if leap { month::ADAR_II } else { month::ADAR };
    let mut b = YearBuilder {
        year,
        events: Vec::with_capacity(96),
    };
    let erev = F::EREV | F::LIGHT_CANDLES;

    // Tishrei
    b.add(month::TISHREI, 1, format!("Rosh Hashana {year}"), F::CHAG | F::LIGHT_CANDLES)?;
    b.add(month::TISHREI, 2, "Rosh Hashana II", F::CHAG)?;
    b.add_fast(month::TISHREI, 3, "Tzom Gedaliah", F::MINOR_FAST, false)?;
    b.add(month::TISHREI, 9, "Erev Yom Kippur", erev)?;
    b.add(month::TISHREI, 10, "Yom Kippur", F::CHAG | F::MAJOR_FAST)?;
    b.add(month::TISHREI, 14, "Erev Sukkot", erev)?;
    b.add(month::TISHREI, 15, "Sukkot I", F::CHAG)?;
    b.add(month::TISHREI, 16, "Sukkot II", F::CHAG | F::CHUL_ONLY)?;
    b.add(month::TISHREI, 16, "Sukkot II (CH''M)", F::CHOL_HAMOED | F::IL_ONLY)?;
    for (d, n) in [(17, "III"), (18, "IV"), (19, "V"), (20, "VI")] {
        b.add(month::TISHREI, d, format!("Sukkot {n} (CH''M)"), F::CHOL_HAMOED)?;
    }
    b.add(month::TISHREI, 21, "Sukkot VII (Hoshana Raba)", F::CHOL_HAMOED | F::LIGHT_CANDLES)?;
    b.add(month::TISHREI, 22, "Shmini Atzeret", F::CHAG)?;
    b.add(month::TISHREI, 22, "Simchat Torah", F::CHAG | F::IL_ONLY)?;
    b.add(month::TISHREI, 23, "Simchat Torah", F::CHAG | F::CHUL_ONLY)?;

    // Cheshvan
    if year >= 5769 {
        b.add(month::CHESHVAN, 29, "Sigd", F::MODERN_HOLIDAY)?;
    }

    // Chanukah spans Kislev into Tevet; walk by day number.
    let chanukah_eve = b.date(month::KISLEV, 24)?;
    for candles in 1..=8u8 {
        let date = chanukah_eve.add_days(i64::from(candles) - 1)?;
        let desc = if candles == 1 {
            "Chanukah: 1 Candle".to_string()
        } else {
            format!("Chanukah: {candles} Candles")
        };
        let mut flags = F::MINOR_HOLIDAY | F::CHANUKAH_CANDLES;
        if candles == 1 {
            flags |= F::EREV;
        }
        b.add_date(date, desc, flags);
    }
    b.add_date(chanukah_eve.add_days(8)?, "Chanukah: 8th Day", F::MINOR_HOLIDAY);

    b.add(month::TEVET, 10, "Asara B'Tevet", F::MINOR_FAST)?;
    b.add(month::SHEVAT, 15, "Tu BiShvat", F::MINOR_HOLIDAY)?;

    // Adar
    if leap {
        b.add(month::ADAR, 14, "Purim Katan", F::MINOR_HOLIDAY)?;
    }
    b.add_fast(adar, 13, "Ta'anit Esther", F::MINOR_FAST, true)?;
    b.add(adar, 13, "Erev Purim", F::EREV)?;
    b.add(adar, 14, "Purim", F::MINOR_HOLIDAY)?;
    b.add(adar, 15, "Shushan Purim", F::MINOR_HOLIDAY)?;

    // Nisan
    if year >= 5777 {
        b.add(month::NISAN, 10, "Yom HaAliyah", F::MODERN_HOLIDAY)?;
    }
    b.add_fast(month::NISAN, 14, "Ta'anit Bechorot", F::MINOR_FAST, true)?;
    b.add(month::NISAN, 14, "Erev Pesach", erev)?;
    b.add(month::NISAN, 15, "Pesach I", F::CHAG)?;
    b.add(month::NISAN, 16, "Pesach II", F::CHAG | F::CHUL_ONLY)?;
    b.add(month::NISAN, 16, "Pesach II (CH''M)", F::CHOL_HAMOED | F::IL_ONLY)?;
    for (d, n) in [(17, "III"), (18, "IV"), (19, "V")] {
        b.add(month::NISAN, d, format!("Pesach {n} (CH''M)"), F::CHOL_HAMOED)?;
    }
    b.add(month::NISAN, 20, "Pesach VI (CH''M)", F::CHOL_HAMOED | F::LIGHT_CANDLES)?;
    b.add(month::NISAN, 21, "Pesach VII", F::CHAG)?;
    b.add(month::NISAN, 22, "Pesach VIII", F::CHAG | F::CHUL_ONLY)?;
    if year >= 5711 {
        add_yom_hashoah(&mut b)?;
    }

    // Iyar
    if year >= 5708 {
        add_independence_days(&mut b)?;
    }
    b.add(month::IYAR, 14, "Pesach Sheni", F::MINOR_HOLIDAY)?;
    b.add(month::IYAR, 18, "Lag BaOmer", F::MINOR_HOLIDAY)?;
    if year >= 5727 {
        b.add(month::IYAR, 28, "Yom Yerushalayim", F::MODERN_HOLIDAY)?;
    }

    // Sivan
    b.add(month::SIVAN, 5, "Erev Shavuot", erev)?;
    b.add(month::SIVAN, 6, "Shavuot I", F::CHAG)?;
    b.add(month::SIVAN, 7, "Shavuot II", F::CHAG | F::CHUL_ONLY)?;

    // Tammuz, Av, Elul
    b.add_fast(month::TAMMUZ, 17, "Tzom Tammuz", F::MINOR_FAST, false)?;
    let tisha_bav_moved = b.weekday(month::AV, 9)? == Weekday::Sat;
    if tisha_bav_moved {
        b.add(month::AV, 9, "Erev Tish'a B'Av", F::EREV)?;
        b.add(month::AV, 10, "Tish'a B'Av (observed)", F::MAJOR_FAST)?;
    } else {
        b.add(month::AV, 8, "Erev Tish'a B'Av", F::EREV)?;
        b.add(month::AV, 9, "Tish'a B'Av", F::MAJOR_FAST)?;
    }
    b.add(month::AV, 15, "Tu B'Av", F::MINOR_HOLIDAY)?;
    b.add(month::ELUL, 29, "Erev Rosh Hashana", erev)?;

    add_rosh_chodesh(&mut b)?;

    let mut events = b.events;
    events.sort_by_key(|e| e.date);
    Ok(events)
}

fn add_yom_hashoah(b: &mut YearBuilder) -> Result<(), CalendarError> {
    let day = match b.weekday(month::NISAN, 27)? {
        Weekday::Fri => 26,
        Weekday::Sun => 28,
        _ => 27,
    };
    b.add(month::NISAN, day, "Yom HaShoah", F::MODERN_HOLIDAY)
}

fn add_independence_days(b: &mut YearBuilder) -> Result<(), CalendarError> {
    let (zikaron, atzmaut) = match b.weekday(month::IYAR, 5)? {
        Weekday::Fri => (3, 4),
        Weekday::Sat => (2, 3),
        Weekday::Mon if b.year >= 5764 => (5, 6),
        _ => (4, 5),
    };
    b.add(month::IYAR, zikaron, "Yom HaZikaron", F::MODERN_HOLIDAY)?;
    b.add(month::IYAR, atzmaut, "Yom HaAtzma'ut", F::MODERN_HOLIDAY)
}

fn add_rosh_chodesh(b: &mut YearBuilder) -> Result<(), CalendarError> {
    let year = b.year;
    let months: Vec<u8> = crate::arithmetic::year_months(year).collect();
    for pair in months.windows(2) {
        let (prev, m) = (pair[0], pair[1]);
        let name = format!("Rosh Chodesh {}", month_name(year, m));
        if days_in_month(year, prev) == 30 {
            b.add(prev, 30, name.clone(), F::ROSH_CHODESH)?;
        }
        b.add(m, 1, name, F::ROSH_CHODESH)?;
    }
    // Rosh Chodesh Tishrei is Rosh Hashana; day 30 of Elul never exists.
    Ok(())
}

/// Holiday events on one date, both regions included.
pub fn holidays_on(date: &HDate) -> Result<Vec<HolidayEvent>, CalendarError> {
    Ok(holidays_for_year(date.year())?
        .into_iter()
        .filter(|e| e.date == *date)
        .collect())
}
