//! Halachic clock core.
//!
//! Turns a location and a displayed instant into:
//! - the day's zmanim ([`zmanim`]),
//! - a continuously accumulated seasonal-hour hand angle ([`projector`]),
//! - the Hebrew date in force, rolled at nightfall ([`resolver`]), and the
//!   facts derived from it ([`facts`]).
//!
//! [`virtual_clock`] supplies the displayed instant, [`ticker`] interleaves
//! its fine ticks with render ticks, and [`session`] ties the pipeline
//! together with caching and the error policy.

pub mod config;
pub mod error;
pub mod facts;
pub mod geofence;
pub mod hebrew_date;
pub mod projector;
pub mod resolver;
pub mod session;
pub mod ticker;
pub mod tz_lookup;
pub mod virtual_clock;
pub mod zmanim;

pub use config::{ClockConfig, LocationConfig};
pub use error::{ConfigError, ZmanError};
pub use facts::{DayFacts, OmerFact, SpecialDayStatus, derive_facts};
pub use geofence::{ConstantFence, Geofence, IsraelGeofence, PolygonFence};
pub use hebrew_date::{HebrewDate, from_library_month, to_library_month};
pub use projector::{Projection, SeasonalHourState, project};
pub use resolver::{ResolvedDay, resolve};
pub use session::{ClockFrame, ClockSession, FrameOutcome, SessionStatus};
pub use ticker::{TickKind, TickSchedule};
pub use tz_lookup::{FixedZoneLookup, NauticalZoneLookup, RegionZoneLookup, TimezoneLookup, TzfZoneLookup};
pub use virtual_clock::{
    ManualClock, PlaybackSpeed, SystemClock, VirtualClock, VirtualClockState, WallClock,
};
pub use zmanim::{Zman, ZmanimAnchors, ZmanimSet, compute_zmanim, day_anchors, zmanim_from_anchors};

// Capability crates, re-exported for front ends.
pub use zman_astro;
pub use zman_hebcal;
pub use zman_time;
