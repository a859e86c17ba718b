//! Configuration and result types for event searches.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::Precision;
use crate::ephemeris::Body;

/// Direction of a coarse scan in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// +1 for forward, -1 for backward.
    pub fn sign(&self) -> f64 {
        match self {
            SearchDirection::Forward => 1.0,
            SearchDirection::Backward => -1.0,
        }
    }
}

fn validate_precision(
    angular_error_deg: f64,
    speed_floor: f64,
    min_step_days: f64,
) -> Result<(), &'static str> {
    if !angular_error_deg.is_finite() || angular_error_deg <= 0.0 {
        return Err("angular_error_deg must be positive");
    }
    if !speed_floor.is_finite() || speed_floor <= 0.0 {
        return Err("speed_floor must be positive");
    }
    if !min_step_days.is_finite() || min_step_days <= 0.0 {
        return Err("min_step_days must be positive");
    }
    Ok(())
}

fn validate_scan(step_days: f64, max_iterations: u32) -> Result<(), &'static str> {
    if !step_days.is_finite() || step_days <= 0.0 {
        return Err("step_days must be positive");
    }
    if max_iterations == 0 {
        return Err("max_iterations must be > 0");
    }
    Ok(())
}

/// Configuration for longitude, sign and nakshatra transits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongitudeTransitConfig {
    /// Coarse scan step in days (default 1).
    pub step_days: f64,
    /// Maximum coarse steps before giving up (default 1000).
    pub max_iterations: u32,
    /// Target accuracy in degrees (default 0.001).
    pub angular_error_deg: f64,
    /// Lower bound on the speed used to size the final bracket, deg/day (default 0.1).
    pub speed_floor: f64,
    /// Smallest bracket width in days (default 1e-6).
    pub min_step_days: f64,
}

impl Default for LongitudeTransitConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0,
            max_iterations: 1000,
            angular_error_deg: 0.001,
            speed_floor: 0.1,
            min_step_days: 1e-6,
        }
    }
}

impl LongitudeTransitConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_scan(self.step_days, self.max_iterations)?;
        validate_precision(self.angular_error_deg, self.speed_floor, self.min_step_days)
    }

    pub(crate) fn precision(&self) -> Precision {
        Precision::Angular {
            error_deg: self.angular_error_deg,
            speed_floor: self.speed_floor,
            min_step_days: self.min_step_days,
        }
    }
}

/// Configuration for two-body aspect transits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    /// Nominal coarse scan step in days (default 10).
    pub step_days: f64,
    /// Coarse steps at the nominal step size (default 36).
    pub max_iterations: u32,
    /// Largest change of relative longitude allowed per step, degrees (default 30).
    /// The step is shortened for fast pairs and the iteration count raised so
    /// the time horizon stays `step_days * max_iterations`.
    pub max_step_arc_deg: f64,
    pub angular_error_deg: f64,
    pub speed_floor: f64,
    pub min_step_days: f64,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            step_days: 10.0,
            max_iterations: 36,
            max_step_arc_deg: 30.0,
            angular_error_deg: 0.001,
            speed_floor: 0.1,
            min_step_days: 1e-6,
        }
    }
}

impl AspectConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_scan(self.step_days, self.max_iterations)?;
        if !self.max_step_arc_deg.is_finite()
            || self.max_step_arc_deg <= 0.0
            || self.max_step_arc_deg >= 180.0
        {
            return Err("max_step_arc_deg must be in (0, 180)");
        }
        validate_precision(self.angular_error_deg, self.speed_floor, self.min_step_days)
    }

    pub(crate) fn precision(&self) -> Precision {
        Precision::Angular {
            error_deg: self.angular_error_deg,
            speed_floor: self.speed_floor,
            min_step_days: self.min_step_days,
        }
    }
}

/// Configuration for station searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Coarse scan step in days (default 1).
    pub step_days: f64,
    /// Coarse steps of the primary scan (default 100).
    pub max_iterations: u32,
    /// Bracket width at which bisection stops, days (default 0.001).
    pub convergence_days: f64,
    /// Sampling interval of the fallback grid, days (default 5).
    pub fallback_grid_days: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0,
            max_iterations: 100,
            convergence_days: 0.001,
            fallback_grid_days: 5.0,
        }
    }
}

impl StationConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_scan(self.step_days, self.max_iterations)?;
        if !self.convergence_days.is_finite() || self.convergence_days <= 0.0 {
            return Err("convergence_days must be positive");
        }
        if !self.fallback_grid_days.is_finite() || self.fallback_grid_days <= 0.0 {
            return Err("fallback_grid_days must be positive");
        }
        Ok(())
    }
}

/// All search configurations together.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub longitude: LongitudeTransitConfig,
    pub aspect: AspectConfig,
    pub station: StationConfig,
}

impl SearchSettings {
    pub fn validate(&self) -> Result<(), &'static str> {
        self.longitude.validate()?;
        self.aspect.validate()?;
        self.station.validate()
    }
}

/// Direction a body turns at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationKind {
    /// Speed goes from positive to negative.
    Retrograde,
    /// Speed goes from negative to positive.
    Direct,
}

impl StationKind {
    /// Kind of station reached from a sample with the given speed.
    pub(crate) fn from_incoming_speed(speed: f64) -> Self {
        if speed > 0.0 {
            StationKind::Retrograde
        } else {
            StationKind::Direct
        }
    }

    /// Single-letter code, "R" or "D".
    pub fn code(&self) -> &'static str {
        match self {
            StationKind::Retrograde => "R",
            StationKind::Direct => "D",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A station: the body's longitude speed changes sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub jd: f64,
    pub body: Body,
    /// Ecliptic longitude at the station in degrees [0, 360).
    pub longitude: f64,
    pub latitude: f64,
    pub kind: StationKind,
}

/// Which syzygy the Moon reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyzygyKind {
    NewMoon,
    FullMoon,
}

impl SyzygyKind {
    /// Target elongation of the Moon from the Sun.
    pub fn elongation(&self) -> f64 {
        match self {
            SyzygyKind::NewMoon => 0.0,
            SyzygyKind::FullMoon => 180.0,
        }
    }
}

/// The most recent new or full moon before a reference time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Syzygy {
    pub jd: f64,
    pub kind: SyzygyKind,
}
