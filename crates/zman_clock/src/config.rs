//! Session configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use zman_astro::{GeoLocation, RiseSetConfig};
use zman_time::TimeZoneContext;

use crate::error::ConfigError;

/// Observer position as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Default for LocationConfig {
    /// Jerusalem.
    fn default() -> Self {
        Self {
            latitude: 31.78,
            longitude: 35.22,
            elevation: 0.0,
        }
    }
}

/// Everything a [`ClockSession`](crate::session::ClockSession) and its
/// scheduler need. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub location: LocationConfig,
    /// IANA zone. Absent means the process-local zone.
    pub timezone: Option<String>,
    /// Force Israel (`true`) or diaspora (`false`) holiday rules instead of
    /// asking the geofence.
    pub israel: Option<bool>,
    /// Fine (offset) tick period in milliseconds.
    pub fine_tick_ms: u32,
    /// Render tick period in milliseconds.
    pub render_tick_ms: u32,
    pub rise_set: RiseSetConfig,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            timezone: None,
            israel: None,
            fine_tick_ms: 10,
            render_tick_ms: 1000,
            rise_set: RiseSetConfig::default(),
        }
    }
}

impl ClockConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fine_tick_ms == 0 || self.render_tick_ms == 0 {
            return Err(ConfigError::Invalid("tick periods must be positive".into()));
        }
        if self.render_tick_ms < self.fine_tick_ms {
            return Err(ConfigError::Invalid(
                "render tick must not be shorter than the fine tick".into(),
            ));
        }
        self.geo_location()?;
        self.timezone_context()?;
        self.rise_set
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn geo_location(&self) -> Result<GeoLocation, ConfigError> {
        let l = &self.location;
        GeoLocation::new(l.latitude, l.longitude, l.elevation).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn timezone_context(&self) -> Result<TimeZoneContext, ConfigError> {
        TimeZoneContext::from_optional(self.timezone.as_deref()).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let c = ClockConfig::from_json_str("{}").unwrap();
        assert_eq!(c, ClockConfig::default());
        assert_eq!(c.fine_tick_ms, 10);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let c = ClockConfig::from_json_str(
            r#"{"location": {"latitude": 40.71, "longitude": -74.01},
                "timezone": "America/New_York",
                "rise_set": {"altitude_correction": true}}"#,
        )
        .unwrap();
        assert_eq!(c.location.elevation, 0.0);
        assert!(c.rise_set.altitude_correction);
        assert_eq!(c.rise_set.refraction_arcmin, 34.0);
        assert_eq!(c.timezone_context().unwrap().iana_name(), Some("America/New_York"));
    }

    #[test]
    fn longitude_is_normalized() {
        let c = ClockConfig {
            location: LocationConfig {
                latitude: 0.0,
                longitude: 395.22,
                elevation: 0.0,
            },
            ..ClockConfig::default()
        };
        assert!((c.geo_location().unwrap().longitude_deg - 35.22).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_values() {
        for json in [
            r#"{"fine_tick_ms": 0}"#,
            r#"{"fine_tick_ms": 100, "render_tick_ms": 50}"#,
            r#"{"location": {"latitude": 95.0}}"#,
            r#"{"timezone": "Mars/Olympus_Mons"}"#,
        ] {
            assert!(
                matches!(ClockConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(ClockConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            ClockConfig::load("/nonexistent/zman-clock.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
