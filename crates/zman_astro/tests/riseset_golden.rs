//! Golden rise/set checks against published almanac times.
//!
//! Reference times are sea-level, 34' refraction, upper limb. The analytic
//! series agree with them to well under a minute.

use chrono::{DateTime, TimeZone, Utc};
use zman_astro::{AnalyticOracle, AstronomicalOracle, Body, CrossingDirection, GeoLocation};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn assert_near(label: &str, got: DateTime<Utc>, want: DateTime<Utc>, tol_s: i64) {
    let diff = (got - want).num_seconds().abs();
    assert!(diff <= tol_s, "{label}: got {got}, want {want} (off by {diff} s)");
}

fn jerusalem() -> GeoLocation {
    GeoLocation::new(31.78, 35.22, 0.0).unwrap()
}

#[test]
fn jerusalem_sunrise_sunset_april() {
    let oracle = AnalyticOracle::default();
    let loc = jerusalem();
    // Local midnight 2024-04-23 IDT
    let midnight = utc(2024, 4, 22, 21, 0);
    let rise = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Rising, midnight, 1.0)
        .unwrap()
        .unwrap();
    assert_near("sunrise", rise, utc(2024, 4, 23, 3, 1), 90);

    let set = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Setting, rise, 1.0)
        .unwrap()
        .unwrap();
    assert_near("sunset", set, utc(2024, 4, 23, 16, 14), 90);
}

#[test]
fn jerusalem_twilight_crossings() {
    let oracle = AnalyticOracle::default();
    let loc = jerusalem();
    let rise = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Rising, utc(2024, 4, 22, 21, 0), 1.0)
        .unwrap()
        .unwrap();

    let dawn = oracle
        .altitude_crossing_search(Body::Sun, &loc, CrossingDirection::Rising, rise, -1.0, -16.1)
        .unwrap()
        .unwrap();
    assert!(dawn < rise);
    assert_near("16.1 deg dawn", dawn, utc(2024, 4, 23, 1, 44), 120);

    let set = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Setting, rise, 1.0)
        .unwrap()
        .unwrap();
    let dusk = oracle
        .altitude_crossing_search(Body::Sun, &loc, CrossingDirection::Setting, set, 1.0, -8.5)
        .unwrap()
        .unwrap();
    assert!(dusk > set);
    assert_near("8.5 deg dusk", dusk, utc(2024, 4, 23, 16, 52), 120);
}

#[test]
fn new_york_winter_day() {
    let oracle = AnalyticOracle::default();
    let loc = GeoLocation::new(40.7128, -74.006, 0.0).unwrap();
    let midnight = utc(2024, 1, 15, 5, 0);
    let rise = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Rising, midnight, 1.0)
        .unwrap()
        .unwrap();
    let set = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Setting, rise, 1.0)
        .unwrap()
        .unwrap();
    assert_near("sunrise", rise, utc(2024, 1, 15, 12, 18), 90);
    assert_near("sunset", set, utc(2024, 1, 15, 21, 53), 90);
}

#[test]
fn tromso_polar_night_has_no_sunrise() {
    let oracle = AnalyticOracle::default();
    let loc = GeoLocation::new(69.65, 18.96, 0.0).unwrap();
    let r = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Rising, utc(2024, 12, 20, 23, 0), 1.0)
        .unwrap();
    assert!(r.is_none());
}

#[test]
fn tromso_midnight_sun_has_no_sunrise_or_dawn() {
    let oracle = AnalyticOracle::default();
    let loc = GeoLocation::new(69.65, 18.96, 0.0).unwrap();
    let start = utc(2024, 6, 20, 22, 0);
    let rise = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Rising, start, 1.0)
        .unwrap();
    let dawn = oracle
        .altitude_crossing_search(Body::Sun, &loc, CrossingDirection::Rising, start, 1.0, -16.1)
        .unwrap();
    assert!(rise.is_none());
    assert!(dawn.is_none());
}

#[test]
fn backward_search_returns_previous_sunset() {
    let oracle = AnalyticOracle::default();
    let loc = jerusalem();
    let rise = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Rising, utc(2024, 4, 22, 21, 0), 1.0)
        .unwrap()
        .unwrap();
    let prev_set = oracle
        .rise_set_search(Body::Sun, &loc, CrossingDirection::Setting, rise, -1.0)
        .unwrap()
        .unwrap();
    assert!(prev_set < rise);
    assert_near("previous sunset", prev_set, utc(2024, 4, 22, 16, 13), 120);
}

#[test]
fn moon_rises_once_in_two_days() {
    let oracle = AnalyticOracle::default();
    let loc = jerusalem();
    let start = utc(2024, 4, 22, 21, 0);
    let first = oracle
        .rise_set_search(Body::Moon, &loc, CrossingDirection::Rising, start, 2.0)
        .unwrap()
        .unwrap();
    // The next moonrise is about 24h50m later.
    let second = oracle
        .rise_set_search(
            Body::Moon,
            &loc,
            CrossingDirection::Rising,
            first + chrono::TimeDelta::hours(1),
            2.0,
        )
        .unwrap()
        .unwrap();
    let gap_min = (second - first).num_minutes();
    assert!((1_400..=1_560).contains(&gap_min), "gap = {gap_min} min");
}
