use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zman_astro::{AnalyticOracle, GeoLocation};
use zman_clock::{ClockSession, ConstantFence, SeasonalHourState, compute_zmanim, day_anchors, project, zmanim_from_anchors};
use zman_hebcal::ArithmeticCalendar;
use zman_time::TimeZoneContext;

fn setup() -> (GeoLocation, TimeZoneContext, DateTime<Utc>) {
    (
        GeoLocation::new(31.78, 35.22, 0.0).expect("valid location"),
        TimeZoneContext::named("Asia/Jerusalem").expect("known zone"),
        Utc.with_ymd_and_hms(2024, 4, 23, 9, 0, 0).unwrap(),
    )
}

fn zmanim_bench(c: &mut Criterion) {
    let (loc, tz, t) = setup();
    let oracle = AnalyticOracle::default();

    let mut group = c.benchmark_group("zmanim");
    group.sample_size(30);
    group.bench_function("compute_zmanim", |b| {
        b.iter(|| compute_zmanim(black_box(&oracle), black_box(&loc), &tz, black_box(t)).expect("non-polar"))
    });
    let anchors = day_anchors(&oracle, &loc, &tz, t).expect("non-polar");
    group.bench_function("zmanim_from_anchors", |b| {
        b.iter(|| zmanim_from_anchors(black_box(&anchors), black_box(t)))
    });
    group.finish();
}

fn render_tick_bench(c: &mut Criterion) {
    let (loc, tz, t) = setup();
    let mut session = ClockSession::new(AnalyticOracle::default(), ArithmeticCalendar, ConstantFence(true), loc, tz.clone());
    let z = compute_zmanim(&AnalyticOracle::default(), &loc, &tz, t).expect("non-polar");

    let mut group = c.benchmark_group("render");
    group.bench_function("project", |b| {
        let mut state = SeasonalHourState::new();
        let mut i = 0i64;
        b.iter(|| {
            i += 1;
            project(black_box(t + TimeDelta::seconds(i % 3600)), &z, &mut state)
        })
    });
    // Warm cache: same civil day every iteration.
    group.bench_function("session_render_cached", |b| {
        let mut i = 0i64;
        b.iter(|| {
            i += 1;
            session.render(black_box(t + TimeDelta::seconds(i % 3600)))
        })
    });
    group.finish();
}

criterion_group!(benches, zmanim_bench, render_tick_bench);
criterion_main!(benches);
