//! Error types for the Hebrew calendar.

use thiserror::Error;

/// Errors from Hebrew calendar conversion and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CalendarError {
    /// The (year, month, day) triple does not exist in the Hebrew calendar.
    #[error("invalid Hebrew date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },
    /// Date outside the supported range.
    #[error("date out of range: {0}")]
    OutOfRange(String),
    /// The calendar backend cannot answer.
    #[error("calendar unavailable: {0}")]
    Unavailable(String),
}
