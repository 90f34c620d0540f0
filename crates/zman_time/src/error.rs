//! Error types for time conversions and zone resolution.

use thiserror::Error;

/// Errors from instant conversion or timezone lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// The IANA zone name is not in the tz database.
    #[error("unknown timezone: {0}")]
    UnknownZone(String),
    /// A Julian Date maps outside the range `DateTime<Utc>` can represent.
    #[error("julian date out of range: {0}")]
    OutOfRange(String),
    /// A local wall-clock time could not be mapped to an instant.
    #[error("unmappable local time: {0}")]
    UnmappableLocalTime(String),
}
