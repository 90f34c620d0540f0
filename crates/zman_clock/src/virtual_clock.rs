//! Virtual time: a wall clock shifted by whole days and by a continuously
//! accumulated playback offset.
//!
//! `displayed = wall_now + time_offset_ms + days_ahead * 86_400_000`.
//!
//! The playback offset only grows through fine ticks. [`VirtualClock::pump`]
//! fires every fine tick that has come due since the last pump, so a slow
//! render never drops ticks and displayed time stays locked to real
//! elapsed time at any multiplier.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ZmanError;

const MS_PER_DAY: i64 = 86_400_000;

/// Source of real time.
pub trait WallClock {
    fn now(&self) -> DateTime<Utc>;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A wall clock moved by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    unix_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            unix_ms: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.unix_ms.store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.unix_ms.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.unix_ms.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Allowed playback multipliers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum PlaybackSpeed {
    Rewind100,
    Rewind10,
    #[default]
    Paused,
    Forward10,
    Forward100,
}

impl PlaybackSpeed {
    const STEPS: [PlaybackSpeed; 5] = [
        Self::Rewind100,
        Self::Rewind10,
        Self::Paused,
        Self::Forward10,
        Self::Forward100,
    ];

    pub fn multiplier(self) -> i32 {
        match self {
            Self::Rewind100 => -100,
            Self::Rewind10 => -10,
            Self::Paused => 0,
            Self::Forward10 => 10,
            Self::Forward100 => 100,
        }
    }

    fn index(self) -> usize {
        Self::STEPS.iter().position(|&s| s == self).unwrap_or(2)
    }

    /// One step toward fast-forward, saturating at 100×.
    pub fn faster(self) -> Self {
        Self::STEPS[(self.index() + 1).min(Self::STEPS.len() - 1)]
    }

    /// One step toward rewind, saturating at −100×.
    pub fn slower(self) -> Self {
        Self::STEPS[self.index().saturating_sub(1)]
    }
}

impl TryFrom<i32> for PlaybackSpeed {
    type Error = ZmanError;

    fn try_from(m: i32) -> Result<Self, Self::Error> {
        Self::STEPS
            .into_iter()
            .find(|s| s.multiplier() == m)
            .ok_or(ZmanError::InvalidSpeed(m))
    }
}

impl From<PlaybackSpeed> for i32 {
    fn from(s: PlaybackSpeed) -> i32 {
        s.multiplier()
    }
}

/// Snapshot of the persistent navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualClockState {
    pub days_ahead_offset: i64,
    pub time_offset_ms: i64,
    pub speed: PlaybackSpeed,
    /// Whether the fine ticker is running.
    pub ticking: bool,
}

/// Fine ticker bookkeeping; present only while the speed is nonzero.
#[derive(Debug, Clone, Copy)]
struct FineTicker {
    next_due: DateTime<Utc>,
}

/// Displayed time with day-jump and playback controls.
#[derive(Debug, Clone)]
pub struct VirtualClock<C: WallClock> {
    wall: C,
    fine_period: TimeDelta,
    days_ahead: i64,
    time_offset_ms: i64,
    speed: PlaybackSpeed,
    ticker: Option<FineTicker>,
}

impl<C: WallClock> VirtualClock<C> {
    /// A clock showing real time, paused, with the given fine-tick period.
    /// Periods under one millisecond are raised to one.
    pub fn new(wall: C, fine_period_ms: u32) -> Self {
        Self {
            wall,
            fine_period: TimeDelta::milliseconds(i64::from(fine_period_ms.max(1))),
            days_ahead: 0,
            time_offset_ms: 0,
            speed: PlaybackSpeed::Paused,
            ticker: None,
        }
    }

    pub fn wall(&self) -> &C {
        &self.wall
    }

    pub fn fine_period(&self) -> TimeDelta {
        self.fine_period
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn days_ahead(&self) -> i64 {
        self.days_ahead
    }

    pub fn time_offset_ms(&self) -> i64 {
        self.time_offset_ms
    }

    pub fn state(&self) -> VirtualClockState {
        VirtualClockState {
            days_ahead_offset: self.days_ahead,
            time_offset_ms: self.time_offset_ms,
            speed: self.speed,
            ticking: self.ticker.is_some(),
        }
    }

    /// Fire every fine tick due at or before the current wall time.
    /// Returns the number of ticks fired.
    pub fn pump(&mut self) -> i64 {
        let Some(ticker) = self.ticker.as_mut() else {
            return 0;
        };
        let now = self.wall.now();
        if now < ticker.next_due {
            return 0;
        }
        let period_ms = self.fine_period.num_milliseconds();
        let due = (now - ticker.next_due).num_milliseconds() / period_ms + 1;
        let step = period_ms * i64::from(self.speed.multiplier());
        self.time_offset_ms = self.time_offset_ms.saturating_add(step.saturating_mul(due));
        ticker.next_due += TimeDelta::milliseconds(period_ms * due);
        due
    }

    /// Displayed instant without firing pending ticks.
    pub fn displayed(&self) -> DateTime<Utc> {
        let offset = self
            .time_offset_ms
            .saturating_add(self.days_ahead.saturating_mul(MS_PER_DAY));
        self.wall
            .now()
            .checked_add_signed(TimeDelta::milliseconds(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Catch up on due ticks and return the displayed instant.
    pub fn tick(&mut self) -> DateTime<Utc> {
        self.pump();
        self.displayed()
    }

    /// Jump to `days` whole days from today.
    pub fn set_days_ahead(&mut self, days: i64) {
        debug!("days ahead {} -> {days}", self.days_ahead);
        self.days_ahead = days;
    }

    /// Jump by `delta` whole days.
    pub fn shift_days(&mut self, delta: i64) {
        self.set_days_ahead(self.days_ahead.saturating_add(delta));
    }

    /// Change the playback multiplier. Only the discrete steps are accepted.
    pub fn set_speed(&mut self, multiplier: i32) -> Result<(), ZmanError> {
        let speed = PlaybackSpeed::try_from(multiplier)?;
        self.apply_speed(speed);
        Ok(())
    }

    pub fn step_faster(&mut self) {
        self.apply_speed(self.speed.faster());
    }

    pub fn step_slower(&mut self) {
        self.apply_speed(self.speed.slower());
    }

    fn apply_speed(&mut self, speed: PlaybackSpeed) {
        // Settle ticks owed at the old rate first.
        self.pump();
        if speed == self.speed {
            return;
        }
        debug!("playback speed {} -> {}", self.speed.multiplier(), speed.multiplier());
        self.speed = speed;
        self.ticker = match (speed, self.ticker) {
            (PlaybackSpeed::Paused, _) => None,
            (_, Some(t)) => Some(t),
            (_, None) => Some(FineTicker {
                next_due: self.wall.now() + self.fine_period,
            }),
        };
    }

    /// Back to real time: offsets zeroed, paused, ticker cancelled.
    pub fn reset(&mut self) {
        debug!("virtual clock reset");
        self.days_ahead = 0;
        self.time_offset_ms = 0;
        self.speed = PlaybackSpeed::Paused;
        self.ticker = None;
    }
}
