//! Day-boundary behaviour of `TimeZoneContext` across zones far from UTC.

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc, Weekday};
use zman_time::{TimeZoneContext, jd_from_instant, sidereal_time_hours};

#[test]
fn same_instant_different_civil_days() {
    // 2024-01-01 10:30 UTC is already Jan 2 in Kiritimati (UTC+14) and still
    // Jan 1 in Honolulu (UTC-10).
    let t = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap();
    let kiri = TimeZoneContext::named("Pacific/Kiritimati").unwrap();
    let hnl = TimeZoneContext::named("Pacific/Honolulu").unwrap();
    assert_eq!(kiri.civil_date(t), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(hnl.civil_date(t), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(kiri.weekday(t), Weekday::Tue);
    assert_eq!(hnl.weekday(t), Weekday::Mon);
}

#[test]
fn day_spans_are_contiguous_across_dst() {
    let nyc = TimeZoneContext::named("America/New_York").unwrap();
    let mut day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
    for _ in 0..4 {
        let start = nyc.start_of_day(day).unwrap();
        let next = day.succ_opt().unwrap();
        let end = nyc.start_of_day(next).unwrap();
        let len = end - start;
        assert!(len == TimeDelta::hours(24) || len == TimeDelta::hours(23), "{day}: {len}");
        assert_eq!(nyc.civil_date(start), day);
        assert_eq!(nyc.civil_date(end - TimeDelta::milliseconds(1)), day);
        day = next;
    }
}

#[test]
fn sidereal_advances_with_jd() {
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::hours(1);
    assert!((jd_from_instant(t1) - jd_from_instant(t0) - 1.0 / 24.0).abs() < 1e-9);
    let dh = (sidereal_time_hours(t1) - sidereal_time_hours(t0)).rem_euclid(24.0);
    assert!((dh - 1.002_737_9).abs() < 1e-4, "sidereal hour step {dh}");
}
