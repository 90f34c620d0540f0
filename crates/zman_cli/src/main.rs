use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use clap::{Args, Parser, Subcommand};
use log::debug;
use zman_astro::{AnalyticOracle, AstronomicalOracle, Body, GeoLocation};
use zman_clock::{
    ClockConfig, ClockFrame, ClockSession, FrameOutcome, HebrewDate, IsraelGeofence, ManualClock,
    NauticalZoneLookup, RegionZoneLookup, SystemClock, TickKind, TickSchedule, TzfZoneLookup, VirtualClock,
    WallClock, ZmanimSet, compute_zmanim,
};
use zman_hebcal::{ArithmeticCalendar, HebrewCalendar};
use zman_time::TimeZoneContext;

#[derive(Parser)]
#[command(name = "zman", about = "Halachic clock: zmanim, seasonal hours and Hebrew dates")]
struct Cli {
    /// JSON config file (location, zone, tick periods, horizon parameters)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct LocationArgs {
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Elevation in meters
    #[arg(long)]
    elevation: Option<f64>,
    /// IANA timezone (looked up from the coordinates when omitted)
    #[arg(long)]
    tz: Option<String>,
    /// Force Israel (true) or diaspora (false) holiday rules
    #[arg(long)]
    israel: Option<bool>,
}

#[derive(Subcommand)]
enum Commands {
    /// Zmanim for one civil day
    Zmanim {
        #[command(flatten)]
        loc: LocationArgs,
        /// Civil date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Hebrew date in force at an instant, with its derived facts
    HebrewDate {
        #[command(flatten)]
        loc: LocationArgs,
        /// Instant (RFC 3339), now when omitted
        #[arg(long)]
        at: Option<String>,
    },
    /// Civil date of a Hebrew date (months counted from Nisan, 13 = Adar II)
    Convert {
        year: i32,
        month: u8,
        day: u8,
        /// Move by whole months first, clamping the day
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        add_months: i32,
    },
    /// One full render frame
    Frame {
        #[command(flatten)]
        loc: LocationArgs,
        /// Instant (RFC 3339), now when omitted
        #[arg(long)]
        at: Option<String>,
        /// Print the frame as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the cooperative scheduler on a simulated wall clock
    Simulate {
        #[command(flatten)]
        loc: LocationArgs,
        /// Playback multiplier: -100, -10, 0, 10 or 100
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        speed: i32,
        /// Whole days to jump ahead (negative for back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        days_ahead: i64,
        /// Number of render ticks to run
        #[arg(long, default_value = "10")]
        ticks: u32,
        /// Simulated wall-clock start (RFC 3339), now when omitted
        #[arg(long)]
        start: Option<String>,
    },
    /// Moon illumination and sidereal time at an instant
    Moon {
        /// Instant (RFC 3339), now when omitted
        #[arg(long)]
        at: Option<String>,
    },
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn parse_instant(s: Option<&str>) -> DateTime<Utc> {
    match s {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|e| fail(format!("Invalid instant {s}: {e} (expected e.g. 2024-04-23T12:00:00Z)"))),
        None => SystemClock.now(),
    }
}

fn load_config(path: Option<&PathBuf>, loc: &LocationArgs) -> ClockConfig {
    let mut config = match path {
        Some(p) => ClockConfig::load(p).unwrap_or_else(|e| fail(format!("Failed to load {}: {e}", p.display()))),
        None => ClockConfig::default(),
    };
    if let Some(v) = loc.lat {
        config.location.latitude = v;
    }
    if let Some(v) = loc.lon {
        config.location.longitude = v;
    }
    if let Some(v) = loc.elevation {
        config.location.elevation = v;
    }
    if loc.tz.is_some() {
        config.timezone = loc.tz.clone();
    }
    if loc.israel.is_some() {
        config.israel = loc.israel;
    }
    if let Err(e) = config.validate() {
        fail(e);
    }
    config
}

/// Session for the configured location. Without an explicit zone the zone
/// is looked up from the coordinates.
fn open_session(config: &ClockConfig) -> ClockSession {
    let mut session = ClockSession::from_config(config).unwrap_or_else(|e| fail(e));
    if config.timezone.is_none() {
        let lookup = RegionZoneLookup {
            fence: IsraelGeofence::default(),
            zone: "Asia/Jerusalem".to_string(),
            fallback: (TzfZoneLookup::new(), NauticalZoneLookup),
        };
        let location = *session.location();
        session.set_location_with_lookup(location, &lookup);
    }
    debug!("zone {}", session.timezone().iana_name().unwrap_or("local"));
    session
}

fn local(tz: &TimeZoneContext, t: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(tz.utc_offset_seconds(t)) {
        Some(off) => t.with_timezone(&off).format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        None => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

fn print_zmanim(z: &ZmanimSet, tz: &TimeZoneContext) {
    println!("Zmanim for {}", z.civil_date);
    for (zman, t) in z.iter() {
        println!("  {:<22} {}", zman.label(), local(tz, t));
    }
    println!("  seasonal hour          {:.1} min", z.day_hour().num_seconds() as f64 / 60.0);
}

fn print_frame(frame: &ClockFrame, tz: &TimeZoneContext) {
    println!("{}  {:?}", local(tz, frame.instant), frame.weekday);
    match &frame.hebrew_text {
        Some(h) => println!("  Hebrew date      {h}"),
        None => println!("  Hebrew date      unavailable"),
    }
    println!(
        "  hand             {:.3} deg ({}, {:.3} seasonal hours)",
        frame.projection.angle_deg,
        if frame.projection.is_daytime { "day" } else { "night" },
        frame.projection.seasonal_hours
    );
    println!("  region           {}", if frame.israel { "Israel" } else { "diaspora" });
    let f = &frame.facts;
    for h in &f.holidays {
        println!("  holiday          {h}");
    }
    if let Some(s) = &f.sedra {
        println!("  sedra            {s}");
    }
    if let Some(o) = &f.omer {
        println!("  omer             {}", o.label);
    }
    if let Some(t) = f.candle_lighting {
        println!("  candle lighting  {}", local(tz, t));
    }
    if f.status.minor_fast {
        println!("  minor fast");
    }
    if let Some(t) = f.status.biur_chametz {
        println!("  burn chametz by  {}", local(tz, t));
    }
    if !f.degraded.is_empty() {
        println!("  unavailable      {}", f.degraded.join(", "));
    }
}

fn render_or_exit(session: &mut ClockSession, at: DateTime<Utc>) -> ClockFrame {
    match session.render(at) {
        FrameOutcome::Frame(f) => *f,
        FrameOutcome::Unsupported { event } => fail(format!("Unsupported location: no {event} on this date")),
        FrameOutcome::Rejected { reason } => fail(format!("Rejected location: {reason}")),
        FrameOutcome::Skipped { reason } => fail(format!("No frame: {reason}")),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config_path = cli.config.as_ref();

    match cli.command {
        Commands::Zmanim { loc, date } => {
            let config = load_config(config_path, &loc);
            let session = open_session(&config);
            let tz = session.timezone().clone();
            let date = date.unwrap_or_else(|| tz.civil_date(SystemClock.now()));
            let noon = tz.local_noon(date).unwrap_or_else(|e| fail(e));
            let oracle = AnalyticOracle::new(config.rise_set).unwrap_or_else(|e| fail(e));
            let location: GeoLocation = *session.location();
            match compute_zmanim(&oracle, &location, &tz, noon) {
                Ok(z) => print_zmanim(&z, &tz),
                Err(e) => fail(format!("Unsupported location: {e}")),
            }
        }

        Commands::HebrewDate { loc, at } => {
            let config = load_config(config_path, &loc);
            let mut session = open_session(&config);
            let frame = render_or_exit(&mut session, parse_instant(at.as_deref()));
            let tz = session.timezone().clone();
            print_frame(&frame, &tz);
        }

        Commands::Convert {
            year,
            month,
            day,
            add_months,
        } => {
            let cal = ArithmeticCalendar;
            let date = HebrewDate::new(&cal, year, month, day)
                .and_then(|d| d.add_months(&cal, add_months))
                .unwrap_or_else(|e| fail(e));
            let lib = date.to_library(&cal).unwrap_or_else(|e| fail(e));
            let civil = cal.to_civil(&lib).unwrap_or_else(|e| fail(e));
            println!("{date} = {civil} ({:?})", lib.weekday());
        }

        Commands::Frame { loc, at, json } => {
            let config = load_config(config_path, &loc);
            let mut session = open_session(&config);
            let frame = render_or_exit(&mut session, parse_instant(at.as_deref()));
            if json {
                match serde_json::to_string_pretty(&frame) {
                    Ok(s) => println!("{s}"),
                    Err(e) => fail(e),
                }
            } else {
                let tz = session.timezone().clone();
                print_zmanim(&frame.zmanim, &tz);
                print_frame(&frame, &tz);
            }
        }

        Commands::Simulate {
            loc,
            speed,
            days_ahead,
            ticks,
            start,
        } => {
            let config = load_config(config_path, &loc);
            let mut session = open_session(&config);
            let tz = session.timezone().clone();
            let t0 = parse_instant(start.as_deref());

            let wall = ManualClock::new(t0);
            let mut clock = VirtualClock::new(wall.clone(), config.fine_tick_ms);
            clock.set_days_ahead(days_ahead);
            clock.set_speed(speed).unwrap_or_else(|e| fail(e));
            let schedule = TickSchedule::new(t0, config.fine_tick_ms, config.render_tick_ms);

            let mut rendered = 0;
            for (kind, due) in schedule {
                if rendered >= ticks {
                    break;
                }
                wall.set(due);
                match kind {
                    TickKind::Fine => {
                        clock.pump();
                    }
                    TickKind::Render => {
                        rendered += 1;
                        let shown = clock.tick();
                        match session.render(shown) {
                            FrameOutcome::Frame(f) => println!(
                                "{}  {:<20} {:>10.3} deg  {}",
                                local(&tz, shown),
                                f.hebrew_text.as_deref().unwrap_or("-"),
                                f.projection.angle_deg,
                                if f.projection.is_daytime { "day" } else { "night" }
                            ),
                            FrameOutcome::Unsupported { event } => {
                                fail(format!("Unsupported location: no {event} on this date"))
                            }
                            FrameOutcome::Rejected { reason } => fail(format!("Rejected location: {reason}")),
                            FrameOutcome::Skipped { reason } => println!("{}  skipped: {reason}", local(&tz, shown)),
                        }
                    }
                }
            }
            let elapsed: TimeDelta = wall.now() - t0;
            println!(
                "{rendered} frames over {:.1} s of wall time, virtual offset {} ms",
                elapsed.num_milliseconds() as f64 / 1000.0,
                clock.time_offset_ms()
            );
        }

        Commands::Moon { at } => {
            let t = parse_instant(at.as_deref());
            let oracle = AnalyticOracle::default();
            let ill = oracle.illumination(Body::Moon, t).unwrap_or_else(|e| fail(e));
            let gmst = oracle.sidereal_time_hours(t).unwrap_or_else(|e| fail(e));
            println!("Moon at {t}");
            println!("  illuminated  {:.1}%", ill.fraction * 100.0);
            println!("  phase angle  {:.2} deg", ill.phase_angle_deg);
            println!("  elongation   {:.2} deg ({})", ill.elongation_deg, if ill.is_waxing() { "waxing" } else { "waning" });
            println!("  GMST         {gmst:.4} h");
        }
    }
}
