//! Error types for the result cache

use thiserror::Error;

/// Errors raised by memoized calls and cache configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// An argument cannot be turned into a table key (e.g. a NaN float)
    #[error("Argument of '{function}' cannot be used as a cache key: {reason}")]
    UnsupportedKey { function: String, reason: String },

    /// A stored value was not of the type the function returns
    #[error("Cached value for '{function}' has an unexpected type")]
    TypeMismatch { function: String },

    /// A category name that does not exist
    #[error("Unknown cache category: {0}")]
    UnknownCategory(String),
}

/// Failure to lower a single argument into a key
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct KeyError(pub String);
