//! # Result Cache
//!
//! Categorized memoization for expensive deterministic computations.
//!
//! Every memoized function is registered with a [`CacheManager`] under one
//! [`Category`]. Each category owns a bounded LRU store shared by all of its
//! functions; entries are keyed by (function identity, argument tuple).
//!
//! | Category      | Name               | Default capacity |
//! |---------------|--------------------|------------------|
//! | `Reference`   | `reference_data`   | 512              |
//! | `Calculation` | `calculations`     | 256              |
//! | `Ephemeris`   | `ephemeris`        | 128              |
//!
//! Reconfiguring the capacity of a category clears it, and disabling the
//! cache clears every category. While disabled, memoized calls are plain
//! passthroughs without bookkeeping.
//!
//! ## Example
//!
//! ```rust
//! use gochara::cache::{CacheManager, Category};
//!
//! let cache = CacheManager::default();
//! let square = cache.memoize::<u64, u64>("square", Category::Calculation, None);
//!
//! assert_eq!(square.get_or_compute(&12, |n| n * n).unwrap(), 144);
//! assert_eq!(square.get_or_compute(&12, |_| unreachable!()).unwrap(), 144);
//! assert_eq!(square.stats().hits, 1);
//! ```

mod errors;
mod key;
mod manager;
mod memoized;
mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use errors::{CacheError, KeyError};
pub use key::{CacheKey, KeyPart};
pub use manager::CacheManager;
pub use memoized::{Memoized, MemoizedFn};

/// Cache partition with its own capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Static lookup data
    Reference,
    /// Derived results such as event times
    Calculation,
    /// Raw ephemeris lookups
    Ephemeris,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Reference,
        Category::Calculation,
        Category::Ephemeris,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Reference => "reference_data",
            Category::Calculation => "calculations",
            Category::Ephemeris => "ephemeris",
        }
    }

    pub fn default_capacity(&self) -> usize {
        match self {
            Category::Reference => 512,
            Category::Calculation => 256,
            Category::Ephemeris => 128,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Reference => 0,
            Category::Calculation => 1,
            Category::Ephemeris => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" | "reference_data" => Ok(Category::Reference),
            "calculation" | "calculations" => Ok(Category::Calculation),
            "ephemeris" => Ok(Category::Ephemeris),
            other => Err(CacheError::UnknownCategory(other.to_string())),
        }
    }
}

/// Capacity of each category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCapacities {
    pub reference: usize,
    pub calculation: usize,
    pub ephemeris: usize,
}

impl Default for CategoryCapacities {
    fn default() -> Self {
        Self {
            reference: Category::Reference.default_capacity(),
            calculation: Category::Calculation.default_capacity(),
            ephemeris: Category::Ephemeris.default_capacity(),
        }
    }
}

impl CategoryCapacities {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Reference => self.reference,
            Category::Calculation => self.calculation,
            Category::Ephemeris => self.ephemeris,
        }
    }

    pub fn set(&mut self, category: Category, capacity: usize) {
        match category {
            Category::Reference => self.reference = capacity,
            Category::Calculation => self.calculation = capacity,
            Category::Ephemeris => self.ephemeris = capacity,
        }
    }
}

/// Cache settings as loaded from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity_per_category: CategoryCapacities,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity_per_category: CategoryCapacities::default(),
        }
    }
}

/// Counters for one registered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionStats {
    pub function: String,
    pub category: Category,
    pub hits: u64,
    pub misses: u64,
    /// Live entries owned by the function
    pub size: usize,
    /// Maximum live entries the function may hold
    pub capacity: usize,
}
