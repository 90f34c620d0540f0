//! The render-tick pipeline.
//!
//! A [`ClockSession`] owns the location, the zone, the anchor cache and the
//! projector's rotation memory. Each [`render`](ClockSession::render) call
//! runs zmanim → projection → Hebrew date → facts for one displayed instant
//! and returns a [`FrameOutcome`] for the renderer.
//!
//! Anchors are reused while the displayed instant stays on the same civil
//! day in the session's zone. Replacing the location or zone clears the
//! cache and any terminal state in one step and bumps the generation, so a
//! frame can always be matched to the location it was computed for.

use chrono::{DateTime, Days, NaiveDate, Utc, Weekday};
use log::{debug, error, info, warn};
use serde::Serialize;
use zman_astro::{AnalyticOracle, AstronomicalOracle, GeoLocation};
use zman_hebcal::{ArithmeticCalendar, HebrewCalendar};
use zman_time::TimeZoneContext;

use crate::config::ClockConfig;
use crate::error::{ConfigError, ZmanError};
use crate::facts::{DayFacts, derive_facts, is_biur_chametz_day};
use crate::geofence::{Geofence, IsraelGeofence};
use crate::projector::{Projection, SeasonalHourState, project};
use crate::resolver::{ResolvedDay, resolve};
use crate::tz_lookup::TimezoneLookup;
use crate::zmanim::{Zman, ZmanimAnchors, ZmanimSet, day_anchors, zmanim_from_anchors};

/// Whether the session is still producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Active,
    /// The location has no `event` on some day; halted until it changes.
    Unsupported { event: Zman },
    /// The oracle rejected the location or its parameters; halted until the
    /// location changes.
    Rejected,
}

/// Everything the renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockFrame {
    /// Location generation this frame belongs to.
    pub generation: u64,
    pub instant: DateTime<Utc>,
    pub civil_date: NaiveDate,
    /// Weekday of the Hebrew day in force.
    pub weekday: Weekday,
    pub zmanim: ZmanimSet,
    pub projection: Projection,
    /// `None` when the calendar could not resolve the date this tick.
    pub hebrew: Option<ResolvedDay>,
    /// Rendered Hebrew date, e.g. "16 Nisan 5784".
    pub hebrew_text: Option<String>,
    pub israel: bool,
    pub facts: DayFacts,
}

/// Result of one render tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameOutcome {
    Frame(Box<ClockFrame>),
    /// Terminal: nothing is rendered until the location changes.
    Unsupported { event: Zman },
    /// Non-retryable oracle failure: nothing is rendered until the location
    /// changes.
    Rejected { reason: String },
    /// Transient failure; the renderer keeps its last frame and the next
    /// tick retries. Cached anchors are kept.
    Skipped { reason: String },
}

impl FrameOutcome {
    pub fn frame(&self) -> Option<&ClockFrame> {
        match self {
            Self::Frame(f) => Some(f),
            _ => None,
        }
    }
}

pub struct ClockSession<O = AnalyticOracle, C = ArithmeticCalendar, G = IsraelGeofence> {
    oracle: O,
    calendar: C,
    geofence: G,
    location: GeoLocation,
    timezone: TimeZoneContext,
    israel_override: Option<bool>,
    israel: bool,
    anchors: Option<ZmanimAnchors>,
    /// Next civil day's anchors, only fetched for the biur chametz deadline
    /// after nightfall.
    next_day_anchors: Option<ZmanimAnchors>,
    rotation: SeasonalHourState,
    status: SessionStatus,
    /// Why the session is `Rejected`.
    rejection: Option<String>,
    generation: u64,
}

impl ClockSession {
    /// Session with the built-in oracle, calendar and Israel geofence.
    pub fn from_config(config: &ClockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let oracle = AnalyticOracle::new(config.rise_set).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let mut session = Self::new(
            oracle,
            ArithmeticCalendar,
            IsraelGeofence::default(),
            config.geo_location()?,
            config.timezone_context()?,
        );
        session.set_israel_override(config.israel);
        Ok(session)
    }
}

impl<O, C, G> ClockSession<O, C, G>
where
    O: AstronomicalOracle,
    C: HebrewCalendar,
    G: Geofence,
{
    pub fn new(oracle: O, calendar: C, geofence: G, location: GeoLocation, timezone: TimeZoneContext) -> Self {
        let israel = geofence.point_in_region(location.latitude_deg, location.longitude_deg);
        Self {
            oracle,
            calendar,
            geofence,
            location,
            timezone,
            israel_override: None,
            israel,
            anchors: None,
            next_day_anchors: None,
            rotation: SeasonalHourState::new(),
            status: SessionStatus::Active,
            rejection: None,
            generation: 0,
        }
    }

    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    pub fn timezone(&self) -> &TimeZoneContext {
        &self.timezone
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_israel(&self) -> bool {
        self.israel
    }

    pub fn rotation(&self) -> &SeasonalHourState {
        &self.rotation
    }

    /// Force the holiday region, or `None` to follow the geofence.
    pub fn set_israel_override(&mut self, israel: Option<bool>) {
        self.israel_override = israel;
        self.refresh_region();
    }

    fn refresh_region(&mut self) {
        self.israel = match self.israel_override {
            Some(v) => v,
            None => self
                .geofence
                .point_in_region(self.location.latitude_deg, self.location.longitude_deg),
        };
    }

    /// Replace location and zone together.
    pub fn set_location(&mut self, location: GeoLocation, timezone: TimeZoneContext) {
        self.location = location;
        self.timezone = timezone;
        self.anchors = None;
        self.next_day_anchors = None;
        self.status = SessionStatus::Active;
        self.rejection = None;
        self.generation += 1;
        self.refresh_region();
        info!(
            "location set to ({:.4}, {:.4}) in {} [generation {}]",
            location.latitude_deg,
            location.longitude_deg,
            self.timezone.iana_name().unwrap_or("local time"),
            self.generation
        );
    }

    /// Replace the location, resolving its zone once through `lookup`.
    /// Falls back to the process-local zone when the lookup has no answer.
    pub fn set_location_with_lookup<L: TimezoneLookup + ?Sized>(&mut self, location: GeoLocation, lookup: &L) {
        let timezone = lookup
            .zone_for(location.latitude_deg, location.longitude_deg)
            .and_then(|name| match TimeZoneContext::named(&name) {
                Ok(tz) => Some(tz),
                Err(e) => {
                    warn!("zone lookup returned {name}: {e}");
                    None
                }
            })
            .unwrap_or_else(TimeZoneContext::local);
        self.set_location(location, timezone);
    }

    /// Replace only the zone. Same invalidation as a location change.
    pub fn set_timezone(&mut self, timezone: TimeZoneContext) {
        self.set_location(self.location, timezone);
    }

    /// Cached anchors for `date`, if any.
    fn cached(slot: Option<ZmanimAnchors>, date: NaiveDate) -> Option<ZmanimAnchors> {
        slot.filter(|a| a.civil_date == date)
    }

    /// Anchors for the civil day of `instant`.
    ///
    /// Anchors of another civil day are never substituted: their tzeis would
    /// roll the Hebrew date and pin the hand. A failed fetch leaves the
    /// cache untouched so the next tick retries against it.
    fn anchors_for(&mut self, instant: DateTime<Utc>) -> Result<ZmanimAnchors, ZmanError> {
        let date = self.timezone.civil_date(instant);
        if let Some(a) = Self::cached(self.anchors, date) {
            debug!("anchor cache hit for {date}");
            return Ok(a);
        }
        // The next-day slot may already hold today after crossing midnight.
        if let Some(a) = Self::cached(self.next_day_anchors, date) {
            debug!("anchor cache promoted for {date}");
            self.anchors = Some(a);
            return Ok(a);
        }
        debug!("anchor cache miss for {date}");
        let a = day_anchors(&self.oracle, &self.location, &self.timezone, instant)?;
        self.anchors = Some(a);
        Ok(a)
    }

    /// Zmanim of the civil day after `date`, for facts that belong to the
    /// Hebrew day in force after nightfall.
    fn next_day_zmanim(&mut self, date: NaiveDate) -> Option<ZmanimSet> {
        let next = date.checked_add_days(Days::new(1))?;
        let noon = self.timezone.local_noon(next).ok()?;
        let anchors = match Self::cached(self.next_day_anchors, next) {
            Some(a) => a,
            None => match day_anchors(&self.oracle, &self.location, &self.timezone, noon) {
                Ok(a) => {
                    self.next_day_anchors = Some(a);
                    a
                }
                Err(e) => {
                    warn!("zmanim for {next} unavailable: {e}");
                    return None;
                }
            },
        };
        Some(zmanim_from_anchors(&anchors, noon))
    }

    /// Run the pipeline for one displayed instant.
    pub fn render(&mut self, instant: DateTime<Utc>) -> FrameOutcome {
        match self.status {
            SessionStatus::Active => {}
            SessionStatus::Unsupported { event } => return FrameOutcome::Unsupported { event },
            SessionStatus::Rejected => {
                return FrameOutcome::Rejected {
                    reason: self.rejection.clone().unwrap_or_default(),
                };
            }
        }

        let anchors = match self.anchors_for(instant) {
            Ok(found) => found,
            Err(ZmanError::PolarRegion { event }) => {
                info!("no {event} at this location; halting updates until it changes");
                self.status = SessionStatus::Unsupported { event };
                return FrameOutcome::Unsupported { event };
            }
            Err(e) if !e.is_retryable() => {
                error!("{e}; halting updates until the location changes");
                self.status = SessionStatus::Rejected;
                self.rejection = Some(e.to_string());
                return FrameOutcome::Rejected { reason: e.to_string() };
            }
            Err(e) => {
                match self.anchors {
                    Some(kept) => warn!("skipping frame: {e}; keeping zmanim for {}", kept.civil_date),
                    None => warn!("skipping frame: {e}"),
                }
                return FrameOutcome::Skipped { reason: e.to_string() };
            }
        };

        let zmanim = zmanim_from_anchors(&anchors, instant);
        let projection = project(instant, &zmanim, &mut self.rotation);

        let resolved = match resolve(&self.calendar, instant, &self.timezone, zmanim.tzeis) {
            Ok(day) => Some(day),
            Err(e) => {
                warn!("Hebrew date unavailable: {e}");
                None
            }
        };

        let facts = match &resolved {
            Some(day) => {
                let burning_day = is_biur_chametz_day(&day.hebrew, &day.library).unwrap_or(false);
                let day_zmanim = if !burning_day {
                    None
                } else if day.after_nightfall {
                    self.next_day_zmanim(day.civil_date)
                } else {
                    Some(zmanim)
                };
                derive_facts(&self.calendar, day, &zmanim, day_zmanim.as_ref(), self.israel)
            }
            None => DayFacts {
                degraded: vec!["hebrew date"],
                ..DayFacts::default()
            },
        };

        let civil_date = self.timezone.civil_date(instant);
        let weekday = resolved
            .map(|d| d.displayed_weekday)
            .unwrap_or_else(|| self.timezone.weekday(instant));

        FrameOutcome::Frame(Box::new(ClockFrame {
            generation: self.generation,
            instant,
            civil_date,
            weekday,
            zmanim,
            projection,
            hebrew_text: resolved.map(|d| d.hebrew.to_string()),
            hebrew: resolved,
            israel: self.israel,
            facts,
        }))
    }
}
