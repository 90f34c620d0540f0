//! Error types for astronomical calculations.

use thiserror::Error;
use zman_time::TimeError;

/// Errors from the astronomical oracle.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AstroError {
    /// Latitude outside [-90, 90] or a non-finite coordinate.
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),
    /// Search or horizon parameters are unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The oracle could not produce an answer for this query.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// Instant ↔ Julian Date conversion failed.
    #[error("time error: {0}")]
    Time(#[from] TimeError),
}
