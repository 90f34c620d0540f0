//! Seasonal-hour projection onto the clock face.
//!
//! The day (sunrise → sunset) fills the upper semicircle clockwise from the
//! left horizon, the night (sunset → next sunrise) the lower one. Sunrise
//! sits at 270°, midday at 0°, sunset at 90° and midnight at 180°.
//!
//! The renderer consumes the accumulated rotation, not the raw angle: each
//! update adds the shortest signed step from the previous angle, so the
//! hand never snaps back across the 0°/360° seam however many turns it has
//! made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::zmanim::ZmanimSet;

/// Rotation memory across updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalHourState {
    pub previous_angle_deg: Option<f64>,
    pub accumulated_rotation_deg: f64,
}

impl SeasonalHourState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One projected hand position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Unbounded accumulated rotation for the renderer.
    pub angle_deg: f64,
    /// Raw face angle in [0, 360).
    pub face_angle_deg: f64,
    pub is_daytime: bool,
    /// Seasonal hours elapsed in the current day or night span, [0, 12].
    pub seasonal_hours: f64,
}

/// The span `instant` falls in: `(start, end, is_daytime)`.
pub fn active_span(instant: DateTime<Utc>, zmanim: &ZmanimSet) -> (DateTime<Utc>, DateTime<Utc>, bool) {
    if instant >= zmanim.sunrise && instant < zmanim.sunset {
        (zmanim.sunrise, zmanim.sunset, true)
    } else if instant >= zmanim.sunset {
        (zmanim.sunset, zmanim.next_sunrise, false)
    } else {
        (zmanim.prev_sunset, zmanim.sunrise, false)
    }
}

/// Seasonal hours elapsed in the active span, clamped to [0, 12].
pub fn seasonal_hours(instant: DateTime<Utc>, zmanim: &ZmanimSet) -> (f64, bool) {
    let (start, end, day) = active_span(instant, zmanim);
    let span_ms = (end - start).num_milliseconds() as f64;
    if span_ms <= 0.0 {
        return (0.0, day);
    }
    let elapsed_ms = (instant - start).num_milliseconds() as f64;
    ((elapsed_ms / (span_ms / 12.0)).clamp(0.0, 12.0), day)
}

/// Raw face angle for a seasonal-hour value.
pub fn face_angle_deg(seasonal_hours: f64, is_daytime: bool) -> f64 {
    let half = seasonal_hours / 12.0 * 180.0 + if is_daytime { 0.0 } else { 180.0 };
    (half + 270.0).rem_euclid(360.0)
}

/// Wrap a step into (-180, 180].
fn shortest_step(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta <= -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Project `instant` onto the face and advance `state`.
pub fn project(instant: DateTime<Utc>, zmanim: &ZmanimSet, state: &mut SeasonalHourState) -> Projection {
    let (hours, is_daytime) = seasonal_hours(instant, zmanim);
    let face = face_angle_deg(hours, is_daytime);

    state.accumulated_rotation_deg = match state.previous_angle_deg {
        None => face,
        Some(prev) => state.accumulated_rotation_deg + shortest_step(face - prev),
    };
    state.previous_angle_deg = Some(face);

    Projection {
        angle_deg: state.accumulated_rotation_deg,
        face_angle_deg: face,
        is_daytime,
        seasonal_hours: hours,
    }
}
