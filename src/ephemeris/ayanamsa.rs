//! Linear ayanamsa models
//!
//! Each mode is its value at J2000 plus general precession. This is adequate
//! for event timing; the reference values agree with the usual tabulations to
//! a few arc-seconds across the twentieth and twenty-first centuries.

use super::SiderealMode;
use crate::constants::{DAYS_PER_CENTURY, J2000, PRECESSION_PER_CENTURY};

/// Ayanamsa at J2000 in degrees
fn value_at_j2000(mode: SiderealMode) -> f64 {
    match mode {
        SiderealMode::Lahiri => 23.857_092,
        SiderealMode::Raman => 22.410_791,
        SiderealMode::Krishnamurti => 23.760_240,
        SiderealMode::FaganBradley => 24.740_300,
        SiderealMode::Yukteshwar => 22.478_803,
        SiderealMode::JnBhasin => 22.762_137,
    }
}

pub(super) fn ayanamsa(mode: SiderealMode, jd: f64) -> f64 {
    let t = (jd - J2000) / DAYS_PER_CENTURY;
    value_at_j2000(mode) + PRECESSION_PER_CENTURY * t
}
