//! Error types for the ephemeris module
//!
//! Every failure of the accessor is distinguishable: no lookup ever answers
//! with a fabricated zero position.

use thiserror::Error;

use crate::cache::CacheError;
use crate::ephemeris::Body;

/// Main error type for ephemeris lookups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// Error when a date is outside the range covered by the ephemeris
    #[error("Date {jd} is outside ephemeris range ({start_jd}..{end_jd})")]
    OutOfRange {
        /// The Julian date that was requested
        jd: f64,
        /// The start of the ephemeris range
        start_jd: f64,
        /// The end of the ephemeris range
        end_jd: f64,
    },

    /// Error when the requested time is NaN or infinite
    #[error("Invalid time: {0}")]
    InvalidTime(f64),

    /// Error when the provider cannot compute the requested body
    #[error("Unsupported body: {0}")]
    UnsupportedBody(Body),

    /// Error when the observer location is outside the valid range
    #[error("Invalid location: latitude={latitude}, longitude={longitude}")]
    InvalidLocation {
        /// Geographic latitude in degrees
        latitude: f64,
        /// Geographic longitude in degrees
        longitude: f64,
    },

    /// Error when a quantity is geometrically undefined, e.g. the ascendant
    /// inside the polar circles
    #[error("Undefined: {0}")]
    Undefined(String),

    /// Error raised by the result cache wrapping the provider
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Extension of the Result type for ephemeris operations
pub type Result<T> = std::result::Result<T, EphemerisError>;
