//! Solar system bodies known to the event engine
//!
//! This module provides the [`Body`] enum along with mappings between body
//! names (including the traditional Vedic names) and the enum.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Enum representing the bodies whose positions the engine can search over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    /// Mean ascending lunar node (Rahu)
    NorthNode,
    /// Mean descending lunar node (Ketu)
    SouthNode,
}

lazy_static! {
    /// Map from lowercase names and aliases to bodies
    static ref BODY_IDS: HashMap<&'static str, Body> = {
        let mut m = HashMap::new();
        for &(name, body) in BODY_NAME_PAIRS.iter() {
            m.insert(name, body);
        }
        m
    };
}

/// Pairs of (lowercase name, body), aliases included
const BODY_NAME_PAIRS: &[(&str, Body)] = &[
    ("sun", Body::Sun),
    ("surya", Body::Sun),
    ("moon", Body::Moon),
    ("chandra", Body::Moon),
    ("mercury", Body::Mercury),
    ("budha", Body::Mercury),
    ("venus", Body::Venus),
    ("shukra", Body::Venus),
    ("earth", Body::Earth),
    ("mars", Body::Mars),
    ("mangala", Body::Mars),
    ("jupiter", Body::Jupiter),
    ("guru", Body::Jupiter),
    ("saturn", Body::Saturn),
    ("shani", Body::Saturn),
    ("uranus", Body::Uranus),
    ("neptune", Body::Neptune),
    ("pluto", Body::Pluto),
    ("north node", Body::NorthNode),
    ("north_node", Body::NorthNode),
    ("rahu", Body::NorthNode),
    ("south node", Body::SouthNode),
    ("south_node", Body::SouthNode),
    ("ketu", Body::SouthNode),
];

impl Body {
    /// All bodies in canonical order
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::NorthNode,
        Body::SouthNode,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::NorthNode => "North Node",
            Body::SouthNode => "South Node",
        }
    }

    /// Look a body up by name or alias, case-insensitively
    pub fn from_name(name: &str) -> Option<Body> {
        BODY_IDS.get(name.trim().to_lowercase().as_str()).copied()
    }

    /// Approximate peak geocentric speed in degrees/day.
    ///
    /// Used to bound coarse scan steps so that a pair of bodies cannot sweep
    /// past an aspect within a single step.
    pub fn max_daily_motion(&self) -> f64 {
        match self {
            Body::Sun => 1.02,
            Body::Moon => 15.4,
            Body::Mercury => 2.2,
            Body::Venus => 1.26,
            Body::Earth => 0.0,
            Body::Mars => 0.8,
            Body::Jupiter => 0.25,
            Body::Saturn => 0.13,
            Body::Uranus => 0.07,
            Body::Neptune => 0.04,
            Body::Pluto => 0.04,
            Body::NorthNode | Body::SouthNode => 0.06,
        }
    }

    /// Whether the body can turn retrograde as seen from the Earth
    pub fn can_station(&self) -> bool {
        !matches!(self, Body::Sun | Body::Moon | Body::Earth)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
