//! Longitude transits: when a body reaches a given ecliptic longitude.
//!
//! Sign and nakshatra ingresses are longitude transits to the start of the
//! sign (a multiple of 30°) or the lunar mansion (a multiple of 360°/27).

use log::debug;

use super::engine::{self, Scan, Signal};
use super::errors::{Result, SearchError};
use super::types::{LongitudeTransitConfig, SearchDirection};
use crate::angle::{closest_distance, is_genuine_sign_change, normalize};
use crate::constants::{NAKSHATRA_SPAN, SIGN_SPAN};
use crate::ephemeris::{Body, Ephemeris, SiderealMode};

/// Signed offset of the body from the target and its speed.
#[derive(Debug, Clone, Copy)]
struct LongitudeSample {
    offset: f64,
    speed: f64,
}

impl Signal for LongitudeSample {
    fn rate(&self) -> f64 {
        self.speed
    }
}

fn crossed(prev: &LongitudeSample, curr: &LongitudeSample) -> bool {
    is_genuine_sign_change(prev.offset, curr.offset)
}

/// Time at which `body` reaches `target` longitude, scanning in `direction`.
///
/// Returns `Ok(None)` if no crossing is found within the configured number
/// of coarse steps. A body already exactly on the target at `jd` transits at
/// `jd`.
pub fn longitude_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    target: f64,
    direction: SearchDirection,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !target.is_finite() {
        return Err(SearchError::InvalidArgument(format!(
            "target longitude {}",
            target
        )));
    }
    let target = normalize(target);

    let sample = |t: f64| -> Result<LongitudeSample> {
        let state = ephem.position(body, t, None, mode)?;
        Ok(LongitudeSample {
            offset: closest_distance(target, state.longitude),
            speed: state.longitude_speed,
        })
    };

    let start = sample(jd)?;
    if start.offset == 0.0 {
        return Ok(Some(jd));
    }

    let scan = Scan {
        step_days: config.step_days,
        max_iterations: config.max_iterations,
        direction,
    };
    let Some(window) = engine::scan(jd, start, &scan, sample, crossed) else {
        debug!("{} does not reach {}° from JD {} ({:?})", body, target, jd, direction);
        return Ok(None);
    };
    Ok(engine::refine(window, &config.precision(), sample, crossed))
}

/// Earliest time at or after `jd` at which `body` reaches `target`.
pub fn next_longitude_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    target: f64,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    longitude_transit(ephem, body, jd, target, SearchDirection::Forward, mode, config)
}

/// Latest time at or before `jd` at which `body` was at `target`.
pub fn last_longitude_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    target: f64,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    longitude_transit(ephem, body, jd, target, SearchDirection::Backward, mode, config)
}

/// Starting longitude of zodiac sign `sign` (1 = Aries .. 12 = Pisces).
pub fn sign_start(sign: u8) -> Result<f64> {
    if !(1..=12).contains(&sign) {
        return Err(SearchError::InvalidArgument(format!(
            "sign must be 1..=12, got {}",
            sign
        )));
    }
    Ok(f64::from(sign - 1) * SIGN_SPAN)
}

/// Starting longitude of nakshatra `nakshatra` (1 = Ashvini .. 27 = Revati).
pub fn nakshatra_start(nakshatra: u8) -> Result<f64> {
    if !(1..=27).contains(&nakshatra) {
        return Err(SearchError::InvalidArgument(format!(
            "nakshatra must be 1..=27, got {}",
            nakshatra
        )));
    }
    Ok(f64::from(nakshatra - 1) * NAKSHATRA_SPAN)
}

/// Next ingress of `body` into zodiac sign `sign`.
pub fn next_sign_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    sign: u8,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    next_longitude_transit(ephem, body, jd, sign_start(sign)?, mode, config)
}

/// Most recent ingress of `body` into zodiac sign `sign`.
pub fn last_sign_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    sign: u8,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    last_longitude_transit(ephem, body, jd, sign_start(sign)?, mode, config)
}

/// Next ingress of `body` into nakshatra `nakshatra`.
pub fn next_nakshatra_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    nakshatra: u8,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    next_longitude_transit(ephem, body, jd, nakshatra_start(nakshatra)?, mode, config)
}

/// Most recent ingress of `body` into nakshatra `nakshatra`.
pub fn last_nakshatra_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    nakshatra: u8,
    mode: Option<SiderealMode>,
    config: &LongitudeTransitConfig,
) -> Result<Option<f64>> {
    last_longitude_transit(ephem, body, jd, nakshatra_start(nakshatra)?, mode, config)
}
