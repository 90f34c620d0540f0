//! Facts derived from one resolved Hebrew day.
//!
//! Every fact here is a pure function of the [`ResolvedDay`], the region
//! flag and the zmanim that produced the day's tzeis. [`derive_facts`]
//! computes them together and lets each one fail on its own.

use chrono::{DateTime, TimeDelta, Utc, Weekday};
use log::warn;
use serde::{Deserialize, Serialize};
use zman_hebcal::{HDate, HebrewCalendar, HolidayEvent, HolidayFlags};

use crate::error::ZmanError;
use crate::hebrew_date::HebrewDate;
use crate::resolver::ResolvedDay;
use crate::zmanim::ZmanimSet;

/// Civil Israeli observances kept off the religious display.
pub const EXCLUDED_HOLIDAYS: [&str; 6] = [
    "Yom HaShoah",
    "Yom HaZikaron",
    "Yom HaAtzma'ut",
    "Yom Yerushalayim",
    "Sigd",
    "Yom HaAliyah",
];

/// Library double-portion renderings and their display form.
pub const DOUBLE_PORTIONS: [(&str, &str); 7] = [
    ("Vayakhel Pekudei", "Vayakhel-Pekudei"),
    ("Tazria Metzora", "Tazria-Metzora"),
    ("Achrei Mot Kedoshim", "Achrei Mot-Kedoshim"),
    ("Behar Bechukotai", "Behar-Bechukotai"),
    ("Chukat Balak", "Chukat-Balak"),
    ("Matot Masei", "Matot-Masei"),
    ("Nitzavim Vayeilech", "Nitzavim-Vayeilech"),
];

/// (month, first day, last day, omer day of first day), Nisan-first.
const OMER_TABLE: [(u8, u8, u8, u8); 3] = [(1, 16, 30, 1), (2, 1, 29, 16), (3, 1, 5, 45)];

/// Minutes before sunset that candles are lit.
pub const CANDLE_LIGHTING_MINUTES: i64 = 18;

/// Seasonal hours after sunrise by which chametz must be burned.
const BIUR_CHAMETZ_HOURS: i32 = 5;

fn region_events<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    date: &HDate,
    israel: bool,
) -> Result<Vec<HolidayEvent>, ZmanError> {
    Ok(calendar
        .holidays_on(date)?
        .into_iter()
        .filter(|e| e.flags.observed_in(israel))
        .collect())
}

/// Chanukah candle renderings to the display's day ordinal.
///
/// The candle count lit on an evening is one more than the day of Chanukah
/// that daytime belongs to, so the first-candle eve has no label.
fn remap_chanukah(desc: &str) -> Option<String> {
    let Some(rest) = desc.strip_prefix("Chanukah: ") else {
        return Some(desc.to_string());
    };
    if rest == "8th Day" {
        return Some("Chanukah: day 8".to_string());
    }
    let count = rest
        .strip_suffix(" Candles")
        .or_else(|| rest.strip_suffix(" Candle"))
        .and_then(|n| n.parse::<u8>().ok());
    match count {
        Some(1) => None,
        Some(k) => Some(format!("Chanukah: day {}", k - 1)),
        None => Some(desc.to_string()),
    }
}

/// Holiday text for the display, region-filtered.
pub fn holidays<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    date: &HDate,
    israel: bool,
) -> Result<Vec<String>, ZmanError> {
    Ok(region_events(calendar, date, israel)?
        .into_iter()
        .filter(|e| !EXCLUDED_HOLIDAYS.contains(&e.desc.as_str()))
        .filter_map(|e| remap_chanukah(&e.desc))
        .collect())
}

/// Hyphenate a library double-portion rendering.
pub fn display_sedra(raw: &str) -> String {
    DOUBLE_PORTIONS
        .iter()
        .find(|(lib, _)| *lib == raw)
        .map_or_else(|| raw.to_string(), |(_, shown)| (*shown).to_string())
}

/// Weekly portion for the coming Sabbath.
pub fn sedra<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    date: &HDate,
    israel: bool,
) -> Result<Option<String>, ZmanError> {
    Ok(calendar.weekly_portion(date, israel)?.map(|raw| display_sedra(&raw)))
}

/// Omer day 1..=49 for a Nisan-first date, if counting.
pub fn omer_count(date: &HebrewDate) -> Option<u8> {
    OMER_TABLE
        .iter()
        .find(|&&(m, first, last, _)| date.month == m && (first..=last).contains(&date.day))
        .map(|&(_, first, _, base)| base + (date.day - first))
}

/// Counted omer day with its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmerFact {
    pub day: u8,
    /// "day N"
    pub label: String,
    /// Library rendering, e.g. "15th day of the Omer".
    pub text: Option<String>,
}

pub fn omer<C: HebrewCalendar + ?Sized>(calendar: &C, date: &HebrewDate) -> Option<OmerFact> {
    omer_count(date).map(|day| OmerFact {
        day,
        label: format!("day {day}"),
        text: calendar.omer_text(day),
    })
}

/// Whether the next Hebrew day is a yom tov in this region.
pub fn is_yom_tov_tomorrow<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    date: &HDate,
    israel: bool,
) -> Result<bool, ZmanError> {
    let tomorrow = date.succ()?;
    Ok(region_events(calendar, &tomorrow, israel)?
        .iter()
        .any(|e| e.flags.contains(HolidayFlags::CHAG)))
}

/// Candle-lighting time when active.
///
/// Active on a civil Friday or on the eve of a yom tov, and only while the
/// Hebrew date still matches the civil date, i.e. until tzeis.
pub fn candle_lighting(day: &ResolvedDay, yom_tov_tomorrow: bool, zmanim: &ZmanimSet) -> Option<DateTime<Utc>> {
    let eve = day.displayed_weekday == Weekday::Fri || yom_tov_tomorrow;
    (eve && day.matches_civil_day()).then(|| zmanim.sunset - TimeDelta::minutes(CANDLE_LIGHTING_MINUTES))
}

/// Whether today carries a minor-fast flag in this region.
pub fn is_minor_fast<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    date: &HDate,
    israel: bool,
) -> Result<bool, ZmanError> {
    Ok(region_events(calendar, date, israel)?
        .iter()
        .any(|e| e.flags.contains(HolidayFlags::MINOR_FAST)))
}

/// Whether chametz is burned on this Hebrew day: 14 Nisan, or 13 Nisan when
/// 14 Nisan is a Sabbath.
pub fn is_biur_chametz_day(date: &HebrewDate, library: &HDate) -> Result<bool, ZmanError> {
    if date.is(1, 14) {
        return Ok(true);
    }
    Ok(date.is(1, 13) && library.succ()?.weekday() == Weekday::Sat)
}

/// Sunrise plus five seasonal hours of the given day's zmanim.
pub fn biur_chametz_deadline(zmanim: &ZmanimSet) -> DateTime<Utc> {
    zmanim.sunrise + zmanim.day_hour() * BIUR_CHAMETZ_HOURS
}

/// Minor-fast and erev-Pesach status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDayStatus {
    pub minor_fast: bool,
    /// Burning deadline when today is the burning day.
    pub biur_chametz: Option<DateTime<Utc>>,
}

/// All derived facts for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayFacts {
    pub holidays: Vec<String>,
    pub sedra: Option<String>,
    pub omer: Option<OmerFact>,
    pub yom_tov_tomorrow: bool,
    pub candle_lighting: Option<DateTime<Utc>>,
    pub status: SpecialDayStatus,
    /// Facts that could not be computed this tick.
    pub degraded: Vec<&'static str>,
}

fn degrade<T: Default>(name: &'static str, result: Result<T, ZmanError>, degraded: &mut Vec<&'static str>) -> T {
    result.unwrap_or_else(|e| {
        warn!("{name} unavailable: {e}");
        degraded.push(name);
        T::default()
    })
}

/// Derive every fact for `day`.
///
/// `zmanim` are the civil day's zmanim, the ones whose tzeis resolved `day`.
/// `resolved_day_zmanim` are the zmanim of the Hebrew day in force, which
/// differ from `zmanim` after nightfall; they only feed the biur chametz
/// deadline, which is omitted when they are unavailable.
pub fn derive_facts<C: HebrewCalendar + ?Sized>(
    calendar: &C,
    day: &ResolvedDay,
    zmanim: &ZmanimSet,
    resolved_day_zmanim: Option<&ZmanimSet>,
    israel: bool,
) -> DayFacts {
    let mut degraded = Vec::new();
    let date = &day.library;

    let holidays = degrade("holidays", holidays(calendar, date, israel), &mut degraded);
    let sedra = degrade("sedra", sedra(calendar, date, israel), &mut degraded);
    let omer = omer(calendar, &day.hebrew);
    let yom_tov_tomorrow = degrade("yom tov", is_yom_tov_tomorrow(calendar, date, israel), &mut degraded);
    let candle_lighting = candle_lighting(day, yom_tov_tomorrow, zmanim);
    let minor_fast = degrade("minor fast", is_minor_fast(calendar, date, israel), &mut degraded);
    let biur_day = degrade("biur chametz", is_biur_chametz_day(&day.hebrew, date), &mut degraded);
    let biur_chametz = if biur_day {
        resolved_day_zmanim.map(biur_chametz_deadline)
    } else {
        None
    };

    DayFacts {
        holidays,
        sedra,
        omer,
        yom_tov_tomorrow,
        candle_lighting,
        status: SpecialDayStatus {
            minor_fast,
            biur_chametz,
        },
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use zman_hebcal::{ArithmeticCalendar, CalendarError};

    use crate::zmanim::{ZmanimAnchors, zmanim_from_anchors};

    fn hd(y: i32, m: u32, d: u32) -> HDate {
        HDate::from_civil(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    fn day(y: i32, m: u32, d: u32, after_nightfall: bool) -> ResolvedDay {
        let civil = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let base = HDate::from_civil(civil).unwrap();
        let library = if after_nightfall { base.succ().unwrap() } else { base };
        let wd = chrono::Datelike::weekday(&civil);
        ResolvedDay {
            hebrew: HebrewDate::from_library(&library),
            library,
            civil_date: civil,
            displayed_weekday: if after_nightfall { wd.succ() } else { wd },
            after_nightfall,
        }
    }

    fn zmanim_on(y: i32, m: u32, d: u32) -> ZmanimSet {
        let at = |h: u32| Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        let a = ZmanimAnchors {
            civil_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            prev_sunset: at(0) - TimeDelta::hours(8),
            alos: at(2),
            misheyakir: at(2) + TimeDelta::minutes(30),
            sunrise: at(3),
            sunset: at(15),
            tzeis: at(16),
            mga_day_end: at(17),
            next_sunrise: at(3) + TimeDelta::days(1),
        };
        zmanim_from_anchors(&a, at(12))
    }

    #[test]
    fn chanukah_remap() {
        assert_eq!(remap_chanukah("Chanukah: 1 Candle"), None);
        assert_eq!(remap_chanukah("Chanukah: 2 Candles").as_deref(), Some("Chanukah: day 1"));
        assert_eq!(remap_chanukah("Chanukah: 8 Candles").as_deref(), Some("Chanukah: day 7"));
        assert_eq!(remap_chanukah("Chanukah: 8th Day").as_deref(), Some("Chanukah: day 8"));
        assert_eq!(remap_chanukah("Purim").as_deref(), Some("Purim"));
    }

    #[test]
    fn modern_holidays_excluded() {
        let cal = ArithmeticCalendar;
        // 2024-05-14 is Yom HaAtzma'ut 5784.
        let h = holidays(&cal, &hd(2024, 5, 14), true).unwrap();
        assert!(h.iter().all(|n| !n.contains("Atzma")));
    }

    #[test]
    fn region_filter_applies() {
        let cal = ArithmeticCalendar;
        let il = holidays(&cal, &hd(2024, 4, 30), true).unwrap();
        let chul = holidays(&cal, &hd(2024, 4, 30), false).unwrap();
        // 22 Nisan 5784
        assert!(il.is_empty());
        assert_eq!(chul, vec!["Pesach VIII".to_string()]);
    }

    #[test]
    fn chanukah_first_day_label() {
        let cal = ArithmeticCalendar;
        assert!(holidays(&cal, &hd(2024, 12, 25), false).unwrap().is_empty());
        assert_eq!(holidays(&cal, &hd(2024, 12, 26), false).unwrap(), vec!["Chanukah: day 1"]);
    }

    #[test]
    fn sedra_hyphenated() {
        assert_eq!(display_sedra("Achrei Mot Kedoshim"), "Achrei Mot-Kedoshim");
        assert_eq!(display_sedra("Lech-Lecha"), "Lech-Lecha");
        let cal = ArithmeticCalendar;
        assert_eq!(
            sedra(&cal, &hd(2025, 4, 29), false).unwrap().as_deref(),
            Some("Tazria-Metzora")
        );
    }

    #[test]
    fn omer_boundaries() {
        let d = |m, day| HebrewDate { year: 5784, month: m, day };
        assert_eq!(omer_count(&d(1, 15)), None);
        assert_eq!(omer_count(&d(1, 16)), Some(1));
        assert_eq!(omer_count(&d(1, 30)), Some(15));
        assert_eq!(omer_count(&d(2, 1)), Some(16));
        assert_eq!(omer_count(&d(2, 18)), Some(33));
        assert_eq!(omer_count(&d(3, 5)), Some(49));
        assert_eq!(omer_count(&d(3, 6)), None);
    }

    #[test]
    fn omer_fact_label() {
        let cal = ArithmeticCalendar;
        let f = omer(&cal, &HebrewDate { year: 5784, month: 1, day: 16 }).unwrap();
        assert_eq!(f.label, "day 1");
        assert_eq!(f.text.as_deref(), Some("1st day of the Omer"));
    }

    #[test]
    fn candle_lighting_friday_until_tzeis() {
        // 2024-04-26 is a Friday.
        let z = zmanim_on(2024, 4, 26);
        let before = day(2024, 4, 26, false);
        assert_eq!(candle_lighting(&before, false, &z), Some(z.sunset - TimeDelta::minutes(18)));
        let after = day(2024, 4, 26, true);
        assert_eq!(candle_lighting(&after, false, &z), None);
    }

    #[test]
    fn candle_lighting_erev_yom_tov() {
        let cal = ArithmeticCalendar;
        // Erev Pesach 5784, Monday 2024-04-22
        let d = day(2024, 4, 22, false);
        assert!(is_yom_tov_tomorrow(&cal, &d.library, true).unwrap());
        assert!(candle_lighting(&d, true, &zmanim_on(2024, 4, 22)).is_some());
        // Ordinary Tuesday
        let plain = day(2024, 5, 21, false);
        assert!(!is_yom_tov_tomorrow(&cal, &plain.library, true).unwrap());
        assert!(candle_lighting(&plain, false, &zmanim_on(2024, 5, 21)).is_none());
    }

    #[test]
    fn diaspora_second_day_yom_tov() {
        let cal = ArithmeticCalendar;
        // 15 Nisan 5784; 16 Nisan is yom tov only outside Israel.
        let d = hd(2024, 4, 23);
        assert!(is_yom_tov_tomorrow(&cal, &d, false).unwrap());
        assert!(!is_yom_tov_tomorrow(&cal, &d, true).unwrap());
    }

    #[test]
    fn minor_fast_flag() {
        let cal = ArithmeticCalendar;
        // Asara B'Tevet 5785 = 2025-01-10
        assert!(is_minor_fast(&cal, &hd(2025, 1, 10), true).unwrap());
        assert!(!is_minor_fast(&cal, &hd(2025, 1, 9), true).unwrap());
    }

    #[test]
    fn biur_chametz_moves_to_friday_before_sabbath_erev_pesach() {
        // 14 Nisan 5785 is Sabbath 2025-04-12.
        let fri = day(2025, 4, 11, false);
        assert!(is_biur_chametz_day(&fri.hebrew, &fri.library).unwrap());
        // 14 Nisan 5784 is Monday; 13 Nisan is not a burning day.
        let sun = day(2024, 4, 21, false);
        assert!(!is_biur_chametz_day(&sun.hebrew, &sun.library).unwrap());
        let mon = day(2024, 4, 22, false);
        assert!(is_biur_chametz_day(&mon.hebrew, &mon.library).unwrap());
    }

    #[test]
    fn biur_deadline_is_five_hours() {
        let z = zmanim_on(2024, 4, 22);
        assert_eq!(biur_chametz_deadline(&z), z.sunrise + TimeDelta::hours(5));
    }

    #[test]
    fn derive_facts_erev_pesach() {
        let cal = ArithmeticCalendar;
        let d = day(2024, 4, 22, false);
        let z = zmanim_on(2024, 4, 22);
        let f = derive_facts(&cal, &d, &z, Some(&z), true);
        assert!(f.holidays.contains(&"Erev Pesach".to_string()));
        assert!(f.yom_tov_tomorrow);
        assert!(f.candle_lighting.is_some());
        assert!(f.status.minor_fast); // Ta'anit Bechorot
        assert!(f.status.biur_chametz.is_some());
        assert!(f.degraded.is_empty());
    }

    struct BrokenCalendar;

    impl HebrewCalendar for BrokenCalendar {
        fn from_civil(&self, d: NaiveDate) -> Result<HDate, CalendarError> {
            HDate::from_civil(d)
        }
        fn to_civil(&self, d: &HDate) -> Result<NaiveDate, CalendarError> {
            d.to_civil()
        }
        fn date(&self, y: i32, m: u8, d: u8) -> Result<HDate, CalendarError> {
            HDate::new(y, m, d)
        }
        fn is_leap_year(&self, y: i32) -> bool {
            zman_hebcal::is_leap_year(y)
        }
        fn days_in_month(&self, y: i32, m: u8) -> Result<u8, CalendarError> {
            Ok(zman_hebcal::days_in_month(y, m))
        }
        fn holidays_on(&self, _: &HDate) -> Result<Vec<HolidayEvent>, CalendarError> {
            Err(CalendarError::Unavailable("holiday table missing".into()))
        }
        fn weekly_portion(&self, d: &HDate, israel: bool) -> Result<Option<String>, CalendarError> {
            zman_hebcal::weekly_portion(d, israel)
        }
        fn omer_text(&self, _: u8) -> Option<String> {
            None
        }
    }

    #[test]
    fn facts_degrade_individually() {
        let d = day(2024, 4, 22, false);
        let z = zmanim_on(2024, 4, 22);
        let f = derive_facts(&BrokenCalendar, &d, &z, Some(&z), true);
        assert!(f.holidays.is_empty());
        assert!(f.degraded.contains(&"holidays"));
        assert!(f.degraded.contains(&"minor fast"));
        assert!(f.degraded.contains(&"yom tov"));
        // Erev Pesach, but the yom tov fact is unknown: no candle lighting.
        assert!(!f.yom_tov_tomorrow);
        assert!(f.candle_lighting.is_none());
        // Sedra and biur chametz still work without holidays.
        assert!(f.sedra.is_none()); // Sabbath 2024-04-27 is chol hamoed
        assert!(f.status.biur_chametz.is_some());
    }
}
