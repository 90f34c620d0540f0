//! Error types for the clock core.

use thiserror::Error;
use zman_astro::AstroError;
use zman_hebcal::CalendarError;
use zman_time::TimeError;

use crate::zmanim::Zman;

/// Errors from the zmanim pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ZmanError {
    /// The sun never reaches a required altitude for this date here.
    /// Terminal for the current location.
    #[error("no {event} at this location on this date")]
    PolarRegion { event: Zman },
    /// The astronomical oracle failed transiently.
    #[error("astronomical oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// The oracle rejected the location or search parameters. Retrying with
    /// the same inputs cannot succeed.
    #[error("astronomical oracle rejected its input: {0}")]
    InvalidOracleInput(String),
    /// A picker-supplied Hebrew date does not exist.
    #[error("invalid Hebrew date {year}-{month}-{day}")]
    InvalidHebrewDateInput { year: i32, month: u8, day: u8 },
    /// The Hebrew calendar backend failed.
    #[error("calendar unavailable: {0}")]
    CalendarUnavailable(String),
    /// Speed outside the allowed playback steps.
    #[error("invalid playback speed {0}")]
    InvalidSpeed(i32),
    #[error("time error: {0}")]
    Time(#[from] TimeError),
}

impl ZmanError {
    /// Whether the error should halt recomputation until the location changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PolarRegion { .. })
    }

    /// Whether the next render tick may succeed with the same inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OracleUnavailable(_) | Self::CalendarUnavailable(_) | Self::Time(_))
    }
}

impl From<AstroError> for ZmanError {
    fn from(e: AstroError) -> Self {
        match e {
            AstroError::Time(t) => Self::Time(t),
            e @ (AstroError::InvalidLocation(_) | AstroError::InvalidConfig(_)) => {
                Self::InvalidOracleInput(e.to_string())
            }
            other => Self::OracleUnavailable(other.to_string()),
        }
    }
}

impl From<CalendarError> for ZmanError {
    fn from(e: CalendarError) -> Self {
        match e {
            CalendarError::InvalidDate { year, month, day } => {
                Self::InvalidHebrewDateInput { year, month, day }
            }
            other => Self::CalendarUnavailable(other.to_string()),
        }
    }
}

/// Errors loading or validating [`ClockConfig`](crate::config::ClockConfig).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_is_terminal() {
        assert!(ZmanError::PolarRegion { event: Zman::Sunrise }.is_terminal());
        assert!(!ZmanError::OracleUnavailable("x".into()).is_terminal());
    }

    #[test]
    fn astro_errors_become_transient() {
        let e: ZmanError = AstroError::Unavailable("down".into()).into();
        assert!(matches!(e, ZmanError::OracleUnavailable(_)));
    }

    #[test]
    fn rejected_oracle_input_is_not_retryable() {
        let e: ZmanError = AstroError::InvalidConfig("altitude out of range").into();
        assert!(matches!(e, ZmanError::InvalidOracleInput(_)));
        assert!(!e.is_retryable());
        let e: ZmanError = AstroError::InvalidLocation("latitude").into();
        assert!(matches!(e, ZmanError::InvalidOracleInput(_)));
        assert!(ZmanError::OracleUnavailable("x".into()).is_retryable());
    }

    #[test]
    fn calendar_invalid_date_maps_to_input_error() {
        let e: ZmanError = CalendarError::InvalidDate { year: 5785, month: 7, day: 1 }.into();
        assert_eq!(e, ZmanError::InvalidHebrewDateInput { year: 5785, month: 7, day: 1 });
    }
}
