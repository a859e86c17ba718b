//! Ephemeris accessor module
//!
//! The event search engine never computes planetary positions itself. It asks
//! an [`Ephemeris`] for the geocentric state of a body at a Julian day and
//! treats the answer as an immutable value. This module defines that accessor
//! contract, the value types flowing through it, a low-precision analytic
//! provider ([`MeanElementsEphemeris`]) and a memoizing wrapper
//! ([`CachedEphemeris`]).

mod ayanamsa;
mod body;
mod cached;
mod errors;
mod houses;
mod mean_elements;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use body::Body;
pub use cached::CachedEphemeris;
pub use errors::{EphemerisError, Result};
pub use houses::compute_houses;
pub use mean_elements::MeanElementsEphemeris;

/// Geocentric (or topocentric) ecliptic state of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Ecliptic longitude in degrees, within [0, 360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Rate of change of longitude in degrees/day; negative when retrograde
    pub longitude_speed: f64,
    /// Rate of change of latitude in degrees/day
    pub latitude_speed: f64,
}

impl BodyState {
    /// True when the body moves backwards along the ecliptic
    pub fn is_retrograde(&self) -> bool {
        self.longitude_speed < 0.0
    }
}

/// Observer position on the Earth's surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Geographic latitude in degrees, north positive
    pub latitude: f64,
    /// Geographic longitude in degrees, east positive
    pub longitude: f64,
    /// Height above sea level in meters
    #[serde(default)]
    pub altitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Rejects latitudes beyond the poles and non-finite coordinates
    pub fn validate(&self) -> Result<()> {
        let finite =
            self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite();
        if !finite || self.latitude.abs() > 90.0 {
            return Err(EphemerisError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        Ok(())
    }
}

/// Ayanamsa used to convert tropical longitudes to sidereal ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiderealMode {
    Lahiri,
    Raman,
    Krishnamurti,
    FaganBradley,
    Yukteshwar,
    JnBhasin,
}

impl SiderealMode {
    pub const ALL: [SiderealMode; 6] = [
        SiderealMode::Lahiri,
        SiderealMode::Raman,
        SiderealMode::Krishnamurti,
        SiderealMode::FaganBradley,
        SiderealMode::Yukteshwar,
        SiderealMode::JnBhasin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SiderealMode::Lahiri => "Lahiri",
            SiderealMode::Raman => "Raman",
            SiderealMode::Krishnamurti => "Krishnamurti",
            SiderealMode::FaganBradley => "Fagan/Bradley",
            SiderealMode::Yukteshwar => "Yukteshwar",
            SiderealMode::JnBhasin => "JN Bhasin",
        }
    }

    /// Ayanamsa in degrees at the given Julian day
    pub fn ayanamsa(&self, jd: f64) -> f64 {
        ayanamsa::ayanamsa(*self, jd)
    }
}

impl fmt::Display for SiderealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// House division scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    /// Twelve 30° houses starting at the ascendant
    Equal,
    /// Twelve signs, the first being the sign holding the ascendant
    WholeSign,
    /// Each quadrant between the angles trisected in longitude
    Porphyry,
}

/// House cusps and chart angles, all ecliptic longitudes in [0, 360)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Houses {
    /// Cusps of houses 1 through 12
    pub cusps: [f64; 12],
    /// Ascendant, midheaven, descendant and imum coeli
    pub angles: [f64; 4],
}

impl Houses {
    pub fn ascendant(&self) -> f64 {
        self.angles[0]
    }

    pub fn midheaven(&self) -> f64 {
        self.angles[1]
    }
}

/// Accessor contract for body positions and house cusps.
///
/// Implementations must be deterministic: the same arguments always produce
/// the same answer, which is what makes memoization sound. Failures must be
/// reported as a distinguishable [`EphemerisError`], never as a zero state.
pub trait Ephemeris: Send + Sync {
    /// Ecliptic state of `body` at Julian day `jd`.
    ///
    /// With a `location` the state is topocentric, otherwise geocentric. With
    /// a sidereal `mode` the longitude is measured from the sidereal zodiac.
    fn position(
        &self,
        body: Body,
        jd: f64,
        location: Option<Location>,
        mode: Option<SiderealMode>,
    ) -> Result<BodyState>;

    /// House cusps for an observer at (`latitude`, `longitude`) at `jd`
    fn houses(
        &self,
        jd: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
        mode: Option<SiderealMode>,
    ) -> Result<Houses>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn position(
        &self,
        body: Body,
        jd: f64,
        location: Option<Location>,
        mode: Option<SiderealMode>,
    ) -> Result<BodyState> {
        (**self).position(body, jd, location, mode)
    }

    fn houses(
        &self,
        jd: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
        mode: Option<SiderealMode>,
    ) -> Result<Houses> {
        (**self).houses(jd, latitude, longitude, system, mode)
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for Arc<E> {
    fn position(
        &self,
        body: Body,
        jd: f64,
        location: Option<Location>,
        mode: Option<SiderealMode>,
    ) -> Result<BodyState> {
        (**self).position(body, jd, location, mode)
    }

    fn houses(
        &self,
        jd: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
        mode: Option<SiderealMode>,
    ) -> Result<Houses> {
        (**self).houses(jd, latitude, longitude, system, mode)
    }
}
