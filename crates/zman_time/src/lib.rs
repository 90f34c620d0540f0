//! Time helpers shared by the zmanim workspace.
//!
//! This crate provides:
//! - Julian Date ↔ `DateTime<Utc>` conversions
//! - Earth rotation angle, GMST and local sidereal time
//! - `TimeZoneContext`, the explicit zone used for every "which civil day is
//!   this instant" question

pub mod civil;
pub mod error;
pub mod julian;
pub mod sidereal;

pub use civil::TimeZoneContext;
pub use error::TimeError;
pub use julian::{
    J2000_JD, MS_PER_DAY, SECONDS_PER_DAY, UNIX_EPOCH_JD, instant_from_jd, jd_from_instant,
    julian_centuries_tt,
};
pub use sidereal::{
    earth_rotation_angle_rad, gmst_rad, local_sidereal_time_rad, sidereal_time_hours,
};
