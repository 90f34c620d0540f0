//! Weekly Torah portion schedule.
//!
//! A reading cycle runs from the Sabbath after Simchat Torah to Simchat Torah
//! the following year. Sabbaths that coincide with a festival read a special
//! portion and do not advance the cycle. The remaining Sabbaths are fitted to
//! the 53 readings in four anchored segments: up to Pesach, up to Shavuot,
//! through the Sabbath before Tish'a B'Av and up to the end of the cycle.
//! When a segment has fewer Sabbaths than readings, the standard pairs are
//! combined in fixed priority order; a surplus carries into the next segment.

use chrono::Weekday;

use crate::arithmetic::{is_leap_year, on_or_after, on_or_before};
use crate::date::{HDate, month};
use crate::error::CalendarError;

/// The 53 Sabbath portions in reading order.
pub const PARSHIYOT: [&str; 53] = [
    "Bereshit", "Noach", "Lech-Lecha", "Vayera", "Chayei Sara", "Toldot", "Vayetzei",
    "Vayishlach", "Vayeshev", "Miketz", "Vayigash", "Vayechi", "Shemot", "Vaera", "Bo",
    "Beshalach", "Yitro", "Mishpatim", "Terumah", "Tetzaveh", "Ki Tisa", "Vayakhel", "Pekudei",
    "Vayikra", "Tzav", "Shmini", "Tazria", "Metzora", "Achrei Mot", "Kedoshim", "Emor", "Behar",
    "Bechukotai", "Bamidbar", "Nasso", "Beha'alotcha", "Sh'lach", "Korach", "Chukat", "Balak",
    "Pinchas", "Matot", "Masei", "Devarim", "Vaetchanan", "Eikev", "Re'eh", "Shoftim",
    "Ki Teitzei", "Ki Tavo", "Nitzavim", "Vayeilech", "Ha'azinu",
];

// First index of each combinable pair.
const VAYAKHEL: usize = 21;
const TAZRIA: usize = 26;
const ACHREI_MOT: usize = 28;
const BEHAR: usize = 31;
const CHUKAT: usize = 38;
const MATOT: usize = 41;
const NITZAVIM: usize = 50;

/// One Sabbath's reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Single(usize),
    /// Portion `n` and `n + 1` read together.
    Double(usize),
}

impl Reading {
    /// Library rendering: doubled names are joined with a space.
    pub fn text(&self) -> String {
        match *self {
            Self::Single(i) => PARSHIYOT[i].to_string(),
            Self::Double(i) => format!("{} {}", PARSHIYOT[i], PARSHIYOT[i + 1]),
        }
    }
}

/// Whether the Sabbath falling on `date` reads a festival portion.
fn is_festival_sabbath(date: &HDate, israel: bool) -> bool {
    let d = date.day();
    match date.month() {
        month::TISHREI => matches!(d, 1 | 2 | 10 | 15..=22) || (!israel && d == 23),
        month::NISAN => (15..=21).contains(&d) || (!israel && d == 22),
        month::SIVAN => d == 6 || (!israel && d == 7),
        _ => false,
    }
}

/// Reading schedule for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SedraSchedule {
    year: i32,
    israel: bool,
    start_rd: i64,
    end_rd: i64,
    readings: Vec<(i64, Reading)>,
}

fn simchat_torah(year: i32, israel: bool) -> Result<HDate, CalendarError> {
    HDate::new(year, month::TISHREI, if israel { 22 } else { 23 })
}

impl SedraSchedule {
    /// Schedule for the cycle starting after Simchat Torah of `year`.
    pub fn new(year: i32, israel: bool) -> Result<Self, CalendarError> {
        let start_rd = simchat_torah(year, israel)?.to_rd() + 1;
        let end_rd = simchat_torah(year + 1, israel)?.to_rd() + 1;
        let pesach = HDate::new(year, month::NISAN, 15)?.to_rd();
        let shavuot = HDate::new(year, month::SIVAN, 6)?.to_rd();
        let after_chazon = on_or_before(HDate::new(year, month::AV, 9)?.to_rd(), Weekday::Sat) + 1;

        let leap = is_leap_year(year);
        let split = if leap { 28 } else { 25 };
        let segments: [(i64, i64, usize, usize, &[usize]); 4] = [
            (start_rd, pesach, 0, split, if leap { &[VAYAKHEL, TAZRIA][..] } else { &[VAYAKHEL][..] }),
            (pesach, shavuot, split, 34, if leap { &[ACHREI_MOT, BEHAR][..] } else { &[TAZRIA, ACHREI_MOT, BEHAR][..] }),
            (shavuot, after_chazon, 34, 44, &[MATOT, CHUKAT]),
            (after_chazon, end_rd, 44, 53, &[NITZAVIM]),
        ];

        let mut doubled: Vec<usize> = Vec::new();
        let mut slots: Vec<i64> = Vec::new();
        let mut carry = 0usize;
        for (lo, hi, first, last, priority) in segments {
            let seg_slots = Self::free_sabbaths(lo, hi, israel)?;
            let available = seg_slots.len() + carry;
            let readings = last - first;
            let need = readings.saturating_sub(available).min(priority.len());
            carry = available.saturating_sub(readings);
            doubled.extend_from_slice(&priority[..need]);
            slots.extend(seg_slots);
        }

        let mut readings = Vec::with_capacity(slots.len());
        let mut i = 0usize;
        for rd in slots {
            if i >= PARSHIYOT.len() {
                break;
            }
            if doubled.contains(&i) {
                readings.push((rd, Reading::Double(i)));
                i += 2;
            } else {
                readings.push((rd, Reading::Single(i)));
                i += 1;
            }
        }

        Ok(Self {
            year,
            israel,
            start_rd,
            end_rd,
            readings,
        })
    }

    /// Non-festival Sabbaths in `[lo, hi)`.
    fn free_sabbaths(lo: i64, hi: i64, israel: bool) -> Result<Vec<i64>, CalendarError> {
        let mut out = Vec::new();
        let mut rd = on_or_after(lo, Weekday::Sat);
        while rd < hi {
            if !is_festival_sabbath(&HDate::from_rd(rd)?, israel) {
                out.push(rd);
            }
            rd += 7;
        }
        Ok(out)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn israel(&self) -> bool {
        self.israel
    }

    /// Whether `rd` falls inside this cycle.
    pub fn covers(&self, rd: i64) -> bool {
        (self.start_rd..self.end_rd).contains(&rd)
    }

    /// Reading on the Sabbath `rd`, `None` for festival Sabbaths or weekdays.
    pub fn reading_on(&self, rd: i64) -> Option<Reading> {
        self.readings
            .binary_search_by_key(&rd, |(r, _)| *r)
            .ok()
            .map(|idx| self.readings[idx].1)
    }

    /// All (RD, reading) pairs in order.
    pub fn readings(&self) -> &[(i64, Reading)] {
        &self.readings
    }
}

/// Reading for the Sabbath on or after `date`, in library rendering.
///
/// `None` when that Sabbath reads a festival portion.
pub fn weekly_portion(date: &HDate, israel: bool) -> Result<Option<String>, CalendarError> {
    let sabbath = on_or_after(date.to_rd(), Weekday::Sat);
    let hd = HDate::from_rd(sabbath)?;
    let mut schedule = SedraSchedule::new(hd.year(), israel)?;
    if !schedule.covers(sabbath) {
        schedule = SedraSchedule::new(hd.year() - 1, israel)?;
    }
    Ok(schedule.reading_on(sabbath).map(|r| r.text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn portion(y: i32, m: u32, d: u32, israel: bool) -> Option<String> {
        let h = HDate::from_civil(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap();
        weekly_portion(&h, israel).unwrap()
    }

    #[test]
    fn every_cycle_reads_all_portions() {
        for y in 5750..5850 {
            for israel in [false, true] {
                let s = SedraSchedule::new(y, israel).unwrap();
                let count: usize = s
                    .readings()
                    .iter()
                    .map(|(_, r)| match r {
                        Reading::Single(_) => 1,
                        Reading::Double(_) => 2,
                    })
                    .sum();
                assert_eq!(count, 53, "year {y} israel {israel}");
            }
        }
    }

    #[test]
    fn bereshit_follows_simchat_torah() {
        // 5785: Simchat Torah (diaspora) Friday 2024-10-25
        assert_eq!(portion(2024, 10, 26, false).as_deref(), Some("Bereshit"));
        assert_eq!(portion(2024, 10, 26, true).as_deref(), Some("Bereshit"));
    }

    #[test]
    fn weekday_looks_ahead_to_sabbath() {
        // Tuesday 2024-10-29 -> Sabbath 2024-11-02
        assert_eq!(portion(2024, 10, 29, false).as_deref(), Some("Noach"));
    }

    #[test]
    fn festival_sabbath_has_no_portion() {
        // Sabbath 2024-04-27 is Pesach V (chol hamoed)
        assert_eq!(portion(2024, 4, 27, true), None);
    }

    #[test]
    fn doubled_pair_joined_with_space() {
        // 5785: Tazria-Metzora on 2025-05-03
        assert_eq!(portion(2025, 5, 3, false).as_deref(), Some("Tazria Metzora"));
        // 5785 keeps Vayakhel and Pekudei apart
        assert_eq!(portion(2025, 3, 22, false).as_deref(), Some("Vayakhel"));
        assert_eq!(portion(2025, 3, 29, false).as_deref(), Some("Pekudei"));
    }

    #[test]
    fn israel_diaspora_split_after_pesach_5782() {
        // 22 Nisan 5782 is Sabbath 2022-04-23: diaspora Pesach VIII,
        // Israel reads Achrei Mot.
        assert_eq!(portion(2022, 4, 23, false), None);
        assert_eq!(portion(2022, 4, 23, true).as_deref(), Some("Achrei Mot"));
        // Diaspora catches up with Matot-Masei, Israel reads them apart.
        assert_eq!(portion(2022, 7, 30, false).as_deref(), Some("Matot Masei"));
        assert_eq!(portion(2022, 7, 30, true).as_deref(), Some("Masei"));
    }

    #[test]
    fn ha_azinu_closes_cycle() {
        // 5785 ends with Nitzavim and Vayeilech apart, then Ha'azinu after Yom Kippur 5786.
        assert_eq!(portion(2025, 9, 20, false).as_deref(), Some("Nitzavim"));
        assert_eq!(portion(2025, 9, 27, false).as_deref(), Some("Vayeilech"));
        assert_eq!(portion(2025, 10, 4, false).as_deref(), Some("Ha'azinu"));
    }
}
