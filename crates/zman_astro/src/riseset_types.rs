//! Types for rise/set and altitude-crossing searches.
//!
//! Provides the observer location, the bodies the oracle knows about, the
//! crossing direction, search configuration and the illumination result.

use serde::{Deserialize, Serialize};

use crate::error::AstroError;

/// Mean Earth radius in meters (IAU nominal, for geometric dip).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic observer location.
///
/// Construct with [`GeoLocation::new`], which validates latitude and wraps
/// longitude into [-180, 180).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive. Range: [-90, 90].
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive. Range: [-180, 180).
    pub longitude_deg: f64,
    /// Elevation above mean sea level in meters.
    pub elevation_m: f64,
}

impl GeoLocation {
    /// Create a validated location.
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Result<Self, AstroError> {
        if !latitude_deg.is_finite() || !longitude_deg.is_finite() || !elevation_m.is_finite() {
            return Err(AstroError::InvalidLocation("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(AstroError::InvalidLocation("latitude outside [-90, 90]"));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg: normalize_longitude(longitude_deg),
            elevation_m,
        })
    }

    /// Latitude in radians.
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude in radians (east positive).
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_longitude(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Bodies with rise/set and illumination support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
}

/// Which way the altitude crosses the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossingDirection {
    /// Altitude goes from below the target to at-or-above it.
    Rising,
    /// Altitude goes from at-or-above the target to below it.
    Setting,
}

/// Configurable parameters for horizon events and crossing searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiseSetConfig {
    /// Atmospheric refraction at the horizon in arcminutes. Default: 34.0.
    pub refraction_arcmin: f64,
    /// Whether to apply geometric dip for observer elevation.
    /// Approximation: dip = sqrt(2h/R) radians. Default: false, matching the
    /// sea-level convention most published tables use.
    pub altitude_correction: bool,
    /// TT − UT in seconds. Default: 69.0.
    pub delta_t_seconds: f64,
    /// Coarse scan step in minutes. Default: 10.0.
    pub scan_step_minutes: f64,
    /// Maximum bisection iterations. Default: 50.
    pub max_iterations: u32,
    /// Bisection stops when the bracket is narrower than this. Default: ~1 ms.
    pub convergence_days: f64,
}

impl Default for RiseSetConfig {
    fn default() -> Self {
        Self {
            refraction_arcmin: 34.0,
            altitude_correction: false,
            delta_t_seconds: 69.0,
            scan_step_minutes: 10.0,
            max_iterations: 50,
            convergence_days: 1.0e-8,
        }
    }
}

impl RiseSetConfig {
    /// Validate search parameters.
    pub fn validate(&self) -> Result<(), AstroError> {
        if !(self.scan_step_minutes.is_finite() && self.scan_step_minutes > 0.0) {
            return Err(AstroError::InvalidConfig("scan_step_minutes must be positive"));
        }
        if self.scan_step_minutes > 120.0 {
            return Err(AstroError::InvalidConfig("scan_step_minutes must be at most 120"));
        }
        if self.max_iterations == 0 {
            return Err(AstroError::InvalidConfig("max_iterations must be > 0"));
        }
        if !(self.convergence_days.is_finite() && self.convergence_days > 0.0) {
            return Err(AstroError::InvalidConfig("convergence_days must be positive"));
        }
        if !self.refraction_arcmin.is_finite() || !self.delta_t_seconds.is_finite() {
            return Err(AstroError::InvalidConfig("refraction and delta_t must be finite"));
        }
        Ok(())
    }

    /// Scan step in days.
    pub fn scan_step_days(&self) -> f64 {
        self.scan_step_minutes / 1440.0
    }

    /// Geometric dip of the horizon in degrees for an observer at `elevation_m`.
    pub fn dip_deg(&self, elevation_m: f64) -> f64 {
        if self.altitude_correction && elevation_m > 0.0 {
            (2.0 * elevation_m / EARTH_RADIUS_M).sqrt().to_degrees()
        } else {
            0.0
        }
    }
}

/// Illuminated state of a body as seen from Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Illumination {
    /// Illuminated fraction of the disk in [0, 1].
    pub fraction: f64,
    /// Sun–body–Earth phase angle in degrees, [0, 180].
    pub phase_angle_deg: f64,
    /// Ecliptic elongation east of the Sun in degrees, [0, 360).
    /// 0 is new, 90 first quarter, 180 full.
    pub elongation_deg: f64,
}

impl Illumination {
    /// Whether the illuminated fraction is increasing.
    pub fn is_waxing(&self) -> bool {
        self.elongation_deg < 180.0
    }
}
