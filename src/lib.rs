//! Gochara: astronomical event search with a categorized result cache
//!
//! This crate finds the moments at which angular quantities of celestial
//! bodies cross target values: a planet reaching a longitude or a sign, two
//! planets forming an aspect, a planet stationing, the Sun returning to a
//! natal longitude and the Moon reaching conjunction or opposition with the
//! Sun. Ephemeris lookups are memoized in bounded per-category LRU caches.
//!
//! ```rust
//! use gochara::cache::CacheManager;
//! use gochara::ephemeris::{Body, MeanElementsEphemeris};
//! use gochara::search::EventFinder;
//!
//! let cache = CacheManager::default();
//! let finder = EventFinder::new(MeanElementsEphemeris::new(), &cache);
//!
//! let new_moon = finder.syzygy(2_451_552.0).unwrap();
//! assert!(new_moon <= 2_451_552.0);
//! assert!(cache.stats(None).iter().any(|s| s.misses > 0));
//! ```

use thiserror::Error;

pub mod angle;
pub mod cache;
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod search;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheManager, Category};
pub use config::GocharaConfig;
pub use ephemeris::{Body, BodyState, Ephemeris, Location, MeanElementsEphemeris, SiderealMode};
pub use search::{EventFinder, SearchSettings, Station, StationKind, Syzygy, SyzygyKind};

/// Main error type for the gochara library
#[derive(Debug, Error)]
pub enum GocharaError {
    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] ephemeris::EphemerisError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type for gochara operations
pub type Result<T> = std::result::Result<T, GocharaError>;
