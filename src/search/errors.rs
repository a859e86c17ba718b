//! Error types for event searches

use thiserror::Error;

use crate::cache::CacheError;
use crate::ephemeris::{Body, EphemerisError};

/// Errors from event searches.
///
/// An event that simply does not occur within the search horizon is not an
/// error; searches report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The ephemeris could not answer for the reference time
    #[error("Ephemeris lookup failed: {0}")]
    Lookup(#[from] EphemerisError),

    /// A search configuration failed validation
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(&'static str),

    /// The body cannot take part in this kind of event
    #[error("{body} {reason}")]
    InvalidBody { body: Body, reason: &'static str },

    /// An argument is outside its domain, e.g. sign 13
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A fixed-point iteration hit its iteration cap
    #[error("No convergence after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    /// Memoizing a result failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
