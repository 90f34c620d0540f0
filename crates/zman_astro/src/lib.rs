//! Astronomy for the zmanim workspace.
//!
//! Low-precision analytic positions for the Sun and Moon, horizon geometry,
//! and scan + bisection searches for rise/set and fixed-altitude crossings.
//! [`AstronomicalOracle`] is the seam the rest of the workspace talks to.

pub mod error;
pub mod horizon;
pub mod lunar;
pub mod oracle;
pub mod riseset_types;
pub mod search;
pub mod solar;

pub use error::AstroError;
pub use horizon::{altitude_deg, body_altitude_deg, horizon_event_altitude_deg};
pub use lunar::{LunarCoordinates, moon_coordinates, moon_illumination};
pub use oracle::{AnalyticOracle, AstronomicalOracle};
pub use riseset_types::{
    Body, CrossingDirection, GeoLocation, Illumination, RiseSetConfig, normalize_longitude,
};
pub use search::normalize_to_pm180;
pub use solar::{SolarCoordinates, sun_coordinates};
