//! House cusps from sidereal time and obliquity

use super::{EphemerisError, HouseSystem, Houses, Result, SiderealMode};
use crate::angle::{forward_distance, normalize};
use crate::constants::{DAYS_PER_CENTURY, DEG2RAD, J2000, OBLIQUITY_J2000, RAD2DEG, SIGN_SPAN};

/// Greenwich mean sidereal time in degrees
pub(super) fn greenwich_sidereal_degrees(jd: f64) -> f64 {
    normalize(280.460_618_37 + 360.985_647_366_29 * (jd - J2000))
}

/// Mean obliquity of the ecliptic in degrees
pub(super) fn mean_obliquity(jd: f64) -> f64 {
    let t = (jd - J2000) / DAYS_PER_CENTURY;
    OBLIQUITY_J2000 - 0.013_004_2 * t
}

/// Compute house cusps and angles for an observer.
///
/// `longitude` is east positive. Inside the polar circles the ascendant is
/// not well defined and `EphemerisError::Undefined` is returned.
pub fn compute_houses(
    jd: f64,
    latitude: f64,
    longitude: f64,
    system: HouseSystem,
    mode: Option<SiderealMode>,
) -> Result<Houses> {
    if !jd.is_finite() {
        return Err(EphemerisError::InvalidTime(jd));
    }
    if !latitude.is_finite() || !longitude.is_finite() || latitude.abs() > 90.0 {
        return Err(EphemerisError::InvalidLocation {
            latitude,
            longitude,
        });
    }

    let eps = mean_obliquity(jd);
    if latitude.abs() > 90.0 - eps {
        return Err(EphemerisError::Undefined(format!(
            "ascendant at latitude {}",
            latitude
        )));
    }

    let ramc = normalize(greenwich_sidereal_degrees(jd) + longitude) * DEG2RAD;
    let eps_r = eps * DEG2RAD;
    let phi = latitude * DEG2RAD;

    let mc = normalize(ramc.sin().atan2(ramc.cos() * eps_r.cos()) * RAD2DEG);
    let asc = normalize(
        ramc.cos()
            .atan2(-(ramc.sin() * eps_r.cos() + phi.tan() * eps_r.sin()))
            * RAD2DEG,
    );
    let desc = normalize(asc + 180.0);
    let ic = normalize(mc + 180.0);

    let mut cusps = [0.0; 12];
    match system {
        HouseSystem::Equal => {
            for (i, cusp) in cusps.iter_mut().enumerate() {
                *cusp = normalize(asc + SIGN_SPAN * i as f64);
            }
        }
        HouseSystem::WholeSign => {
            let first = (asc / SIGN_SPAN).floor() * SIGN_SPAN;
            for (i, cusp) in cusps.iter_mut().enumerate() {
                *cusp = normalize(first + SIGN_SPAN * i as f64);
            }
        }
        HouseSystem::Porphyry => {
            // Angles sit on cusps 1, 4, 7 and 10
            let quadrants = [(asc, ic), (ic, desc), (desc, mc), (mc, asc)];
            for (q, &(start, end)) in quadrants.iter().enumerate() {
                let third = forward_distance(start, end) / 3.0;
                for k in 0..3 {
                    cusps[3 * q + k] = normalize(start + third * k as f64);
                }
            }
        }
    }

    let mut angles = [asc, mc, desc, ic];
    if let Some(mode) = mode {
        let ayanamsa = mode.ayanamsa(jd);
        for value in cusps.iter_mut().chain(angles.iter_mut()) {
            *value = normalize(*value - ayanamsa);
        }
    }

    Ok(Houses { cusps, angles })
}
