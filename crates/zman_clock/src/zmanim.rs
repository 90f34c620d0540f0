//! Zmanim computation.
//!
//! [`day_anchors`] asks the oracle for everything astronomical about one
//! civil day: sunrise and sunset, the neighbouring sunset and sunrise, and
//! the fixed-altitude twilight crossings. [`zmanim_from_anchors`] derives
//! the named zmanim from those anchors with plain arithmetic, so the
//! anchors can be cached per civil day while the instant-dependent
//! chatzos layla is re-derived every tick.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use zman_astro::{AstronomicalOracle, Body, CrossingDirection, GeoLocation};
use zman_time::TimeZoneContext;

use crate::error::ZmanError;

/// Dawn (alos hashachar) and the Magen Avraham day end.
pub const ALOS_ALTITUDE_DEG: f64 = -16.1;
/// Earliest tallis and tefillin.
pub const MISHEYAKIR_ALTITUDE_DEG: f64 = -10.2;
/// Nightfall; the Hebrew date rolls here.
pub const TZEIS_ALTITUDE_DEG: f64 = -8.5;

/// Search window for every oracle query, in days.
const SEARCH_WINDOW_DAYS: f64 = 1.0;

/// Named halachic times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zman {
    PrevSunset,
    Alos,
    Misheyakir,
    Sunrise,
    ShemaMga,
    ShemaGra,
    TefilaMga,
    TefilaGra,
    Chatzos,
    MinchaGedola,
    MinchaKetana,
    PlagHamincha,
    Sunset,
    Tzeis,
    RabbeinuTam,
    MgaDayEnd,
    ChatzosLayla,
    NextSunrise,
}

impl Zman {
    pub const ALL: [Zman; 18] = [
        Zman::PrevSunset,
        Zman::Alos,
        Zman::Misheyakir,
        Zman::Sunrise,
        Zman::ShemaMga,
        Zman::ShemaGra,
        Zman::TefilaMga,
        Zman::TefilaGra,
        Zman::Chatzos,
        Zman::MinchaGedola,
        Zman::MinchaKetana,
        Zman::PlagHamincha,
        Zman::Sunset,
        Zman::Tzeis,
        Zman::RabbeinuTam,
        Zman::MgaDayEnd,
        Zman::ChatzosLayla,
        Zman::NextSunrise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PrevSunset => "previous sunset",
            Self::Alos => "alos hashachar",
            Self::Misheyakir => "misheyakir",
            Self::Sunrise => "sunrise",
            Self::ShemaMga => "latest shema (MGA)",
            Self::ShemaGra => "latest shema (GRA)",
            Self::TefilaMga => "latest shacharit (MGA)",
            Self::TefilaGra => "latest shacharit (GRA)",
            Self::Chatzos => "chatzos",
            Self::MinchaGedola => "mincha gedola",
            Self::MinchaKetana => "mincha ketana",
            Self::PlagHamincha => "plag hamincha",
            Self::Sunset => "sunset",
            Self::Tzeis => "tzeis hakochavim",
            Self::RabbeinuTam => "rabbeinu tam",
            Self::MgaDayEnd => "nightfall 16.1°",
            Self::ChatzosLayla => "chatzos layla",
            Self::NextSunrise => "next sunrise",
        }
    }
}

impl fmt::Display for Zman {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Oracle results for one civil day. Everything else is derived from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZmanimAnchors {
    pub civil_date: NaiveDate,
    pub prev_sunset: DateTime<Utc>,
    pub alos: DateTime<Utc>,
    pub misheyakir: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub tzeis: DateTime<Utc>,
    /// Sun at -16.1° in the evening; closes the Magen Avraham day.
    pub mga_day_end: DateTime<Utc>,
    pub next_sunrise: DateTime<Utc>,
}

impl ZmanimAnchors {
    /// Length of one seasonal daytime hour.
    pub fn day_hour(&self) -> TimeDelta {
        (self.sunset - self.sunrise) / 12
    }

    /// Length of one Magen Avraham hour (dawn to 16.1° nightfall).
    pub fn mga_hour(&self) -> TimeDelta {
        (self.mga_day_end - self.alos) / 12
    }
}

/// Complete zmanim for one civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZmanimSet {
    pub civil_date: NaiveDate,
    pub prev_sunset: DateTime<Utc>,
    pub alos: DateTime<Utc>,
    pub misheyakir: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub shema_mga: DateTime<Utc>,
    pub shema_gra: DateTime<Utc>,
    pub tefila_mga: DateTime<Utc>,
    pub tefila_gra: DateTime<Utc>,
    pub chatzos: DateTime<Utc>,
    pub mincha_gedola: DateTime<Utc>,
    pub mincha_ketana: DateTime<Utc>,
    pub plag_hamincha: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub tzeis: DateTime<Utc>,
    pub rabbeinu_tam: DateTime<Utc>,
    pub mga_day_end: DateTime<Utc>,
    pub chatzos_layla: DateTime<Utc>,
    pub next_sunrise: DateTime<Utc>,
}

impl ZmanimSet {
    pub fn get(&self, zman: Zman) -> DateTime<Utc> {
        match zman {
            Zman::PrevSunset => self.prev_sunset,
            Zman::Alos => self.alos,
            Zman::Misheyakir => self.misheyakir,
            Zman::Sunrise => self.sunrise,
            Zman::ShemaMga => self.shema_mga,
            Zman::ShemaGra => self.shema_gra,
            Zman::TefilaMga => self.tefila_mga,
            Zman::TefilaGra => self.tefila_gra,
            Zman::Chatzos => self.chatzos,
            Zman::MinchaGedola => self.mincha_gedola,
            Zman::MinchaKetana => self.mincha_ketana,
            Zman::PlagHamincha => self.plag_hamincha,
            Zman::Sunset => self.sunset,
            Zman::Tzeis => self.tzeis,
            Zman::RabbeinuTam => self.rabbeinu_tam,
            Zman::MgaDayEnd => self.mga_day_end,
            Zman::ChatzosLayla => self.chatzos_layla,
            Zman::NextSunrise => self.next_sunrise,
        }
    }

    /// All zmanim in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Zman, DateTime<Utc>)> + '_ {
        let mut all: Vec<(Zman, DateTime<Utc>)> = Zman::ALL.iter().map(|&z| (z, self.get(z))).collect();
        all.sort_by_key(|&(z, t)| (t, z));
        all.into_iter()
    }

    /// Length of one seasonal daytime hour.
    pub fn day_hour(&self) -> TimeDelta {
        (self.sunset - self.sunrise) / 12
    }
}

fn midpoint(a: DateTime<Utc>, b: DateTime<Utc>) -> DateTime<Utc> {
    a + (b - a) / 2
}

fn required(found: Option<DateTime<Utc>>, event: Zman) -> Result<DateTime<Utc>, ZmanError> {
    found.ok_or(ZmanError::PolarRegion { event })
}

/// Query the oracle for the anchors of the civil day containing `instant`
/// in `timezone`.
///
/// Fails with [`ZmanError::PolarRegion`] when any required event does not
/// occur within a day of its search start.
pub fn day_anchors<O: AstronomicalOracle + ?Sized>(
    oracle: &O,
    location: &GeoLocation,
    timezone: &TimeZoneContext,
    instant: DateTime<Utc>,
) -> Result<ZmanimAnchors, ZmanError> {
    let civil_date = timezone.civil_date(instant);
    let midnight = timezone.start_of_day(civil_date)?;
    let sun = Body::Sun;
    let w = SEARCH_WINDOW_DAYS;

    let sunrise = required(
        oracle.rise_set_search(sun, location, CrossingDirection::Rising, midnight, w)?,
        Zman::Sunrise,
    )?;
    let sunset = required(
        oracle.rise_set_search(sun, location, CrossingDirection::Setting, sunrise, w)?,
        Zman::Sunset,
    )?;
    let prev_sunset = required(
        oracle.rise_set_search(sun, location, CrossingDirection::Setting, sunrise, -w)?,
        Zman::PrevSunset,
    )?;
    let next_sunrise = required(
        oracle.rise_set_search(sun, location, CrossingDirection::Rising, sunset, w)?,
        Zman::NextSunrise,
    )?;
    let alos = required(
        oracle.altitude_crossing_search(sun, location, CrossingDirection::Rising, sunrise, -w, ALOS_ALTITUDE_DEG)?,
        Zman::Alos,
    )?;
    let misheyakir = required(
        oracle.altitude_crossing_search(
            sun,
            location,
            CrossingDirection::Rising,
            sunrise,
            -w,
            MISHEYAKIR_ALTITUDE_DEG,
        )?,
        Zman::Misheyakir,
    )?;
    let tzeis = required(
        oracle.altitude_crossing_search(sun, location, CrossingDirection::Setting, sunset, w, TZEIS_ALTITUDE_DEG)?,
        Zman::Tzeis,
    )?;
    let mga_day_end = required(
        oracle.altitude_crossing_search(sun, location, CrossingDirection::Setting, sunset, w, ALOS_ALTITUDE_DEG)?,
        Zman::MgaDayEnd,
    )?;

    debug!("anchors for {civil_date}: sunrise {sunrise}, sunset {sunset}, tzeis {tzeis}");
    Ok(ZmanimAnchors {
        civil_date,
        prev_sunset,
        alos,
        misheyakir,
        sunrise,
        sunset,
        tzeis,
        mga_day_end,
        next_sunrise,
    })
}

/// Derive the named zmanim from a day's anchors.
///
/// Pure arithmetic. `instant` only selects which night chatzos layla
/// belongs to: the coming night once rabbeinu tam has passed, the night
/// that ended at this sunrise before that.
pub fn zmanim_from_anchors(anchors: &ZmanimAnchors, instant: DateTime<Utc>) -> ZmanimSet {
    let a = anchors;
    let hour = a.day_hour();
    let mga_hour = a.mga_hour();
    let chatzos = midpoint(a.sunrise, a.sunset);
    let rabbeinu_tam = a.sunset + TimeDelta::minutes(72);
    let chatzos_layla = if instant >= rabbeinu_tam {
        midpoint(a.sunset, a.next_sunrise)
    } else {
        midpoint(a.prev_sunset, a.sunrise)
    };

    ZmanimSet {
        civil_date: a.civil_date,
        prev_sunset: a.prev_sunset,
        alos: a.alos,
        misheyakir: a.misheyakir,
        sunrise: a.sunrise,
        shema_mga: a.alos + mga_hour * 3,
        shema_gra: a.sunrise + hour * 3,
        tefila_mga: a.alos + mga_hour * 4,
        tefila_gra: a.sunrise + hour * 4,
        chatzos,
        mincha_gedola: chatzos + (hour / 2).max(TimeDelta::minutes(30)),
        mincha_ketana: a.sunrise + hour * 19 / 2,
        plag_hamincha: a.sunrise + hour * 43 / 4,
        sunset: a.sunset,
        tzeis: a.tzeis,
        rabbeinu_tam,
        mga_day_end: a.mga_day_end,
        chatzos_layla,
        next_sunrise: a.next_sunrise,
    }
}

/// Zmanim for the civil day containing `instant` in `timezone`.
pub fn compute_zmanim<O: AstronomicalOracle + ?Sized>(
    oracle: &O,
    location: &GeoLocation,
    timezone: &TimeZoneContext,
    instant: DateTime<Utc>,
) -> Result<ZmanimSet, ZmanError> {
    let anchors = day_anchors(oracle, location, timezone, instant)?;
    Ok(zmanim_from_anchors(&anchors, instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 23, h, m, 0).unwrap()
    }

    fn anchors() -> ZmanimAnchors {
        ZmanimAnchors {
            civil_date: NaiveDate::from_ymd_opt(2024, 4, 23).unwrap(),
            prev_sunset: Utc.with_ymd_and_hms(2024, 4, 22, 16, 0, 0).unwrap(),
            alos: t(1, 30),
            misheyakir: t(2, 0),
            sunrise: t(3, 0),
            sunset: t(15, 0),
            tzeis: t(15, 40),
            mga_day_end: t(16, 30),
            next_sunrise: Utc.with_ymd_and_hms(2024, 4, 24, 3, 0, 0).unwrap(),
        }
    }

    #[test]
    fn twelve_hour_day_fractions() {
        let z = zmanim_from_anchors(&anchors(), t(12, 0));
        assert_eq!(z.chatzos, t(9, 0));
        assert_eq!(z.shema_gra, t(6, 0));
        assert_eq!(z.tefila_gra, t(7, 0));
        assert_eq!(z.mincha_gedola, t(9, 30));
        assert_eq!(z.mincha_ketana, t(12, 30));
        assert_eq!(z.plag_hamincha, t(13, 45));
        assert_eq!(z.rabbeinu_tam, t(16, 12));
    }

    #[test]
    fn magen_avraham_hours() {
        // 01:30 → 16:30 is 15 h, so one MGA hour is 75 min.
        let z = zmanim_from_anchors(&anchors(), t(12, 0));
        assert_eq!(z.shema_mga, t(5, 15));
        assert_eq!(z.tefila_mga, t(6, 30));
    }

    #[test]
    fn mincha_gedola_floor_applies_to_short_day() {
        let mut a = anchors();
        a.sunrise = t(11, 0);
        a.sunset = t(12, 0);
        let z = zmanim_from_anchors(&a, t(11, 30));
        assert_eq!(z.chatzos, t(11, 30));
        assert_eq!(z.mincha_gedola - z.chatzos, TimeDelta::minutes(30));
    }

    #[test]
    fn chatzos_layla_follows_rabbeinu_tam() {
        let a = anchors();
        let before = zmanim_from_anchors(&a, t(16, 11));
        assert_eq!(before.chatzos_layla, Utc.with_ymd_and_hms(2024, 4, 22, 21, 30, 0).unwrap());
        let after = zmanim_from_anchors(&a, t(16, 12));
        assert_eq!(after.chatzos_layla, t(21, 0));
    }

    #[test]
    fn iter_is_chronological() {
        let z = zmanim_from_anchors(&anchors(), t(20, 0));
        let times: Vec<_> = z.iter().map(|(_, t)| t).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(z.iter().count(), Zman::ALL.len());
        assert_eq!(z.iter().next().map(|(z, _)| z), Some(Zman::PrevSunset));
    }

    #[test]
    fn get_matches_fields() {
        let z = zmanim_from_anchors(&anchors(), t(12, 0));
        assert_eq!(z.get(Zman::Tzeis), z.tzeis);
        assert_eq!(z.get(Zman::PlagHamincha), z.plag_hamincha);
    }

    #[test]
    fn zman_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Zman::ChatzosLayla).unwrap(), "\"chatzos_layla\"");
    }
}
