//! Constants module for astronomical event calculations

use std::f64::consts::PI;

// Time constants
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;
/// Epoch of the mean orbital elements (1999-12-31T00:00 UT) as Julian date
pub const ELEMENTS_EPOCH: f64 = 2_451_543.5;

// Angles
/// Degrees in a full circle
pub const FULL_CIRCLE: f64 = 360.0;
/// Degrees spanned by one zodiac sign
pub const SIGN_SPAN: f64 = 30.0;
/// Degrees spanned by one nakshatra (lunar mansion)
pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

// Mean motions (degrees/day)
/// Mean daily motion of the Sun
pub const SUN_MEAN_MOTION: f64 = 0.9833;
/// Mean daily motion of the Moon relative to the Sun (synodic)
pub const LUNAR_SOLAR_MEAN_MOTION: f64 = 12.190_749;
/// General precession in longitude, degrees per Julian century
pub const PRECESSION_PER_CENTURY: f64 = 1.396_971_3;

// Iterative algorithms
/// One arc-second tolerance for the solar return and syzygy iterations
pub const MAX_ARC_ERROR: f64 = 0.0003;
/// Iteration cap for the fixed-point solar return and syzygy searches
pub const MAX_FIXED_POINT_ITERATIONS: u32 = 100;

// Earth constants
/// Earth's equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6_378.14;
/// Mean obliquity of the ecliptic at J2000 in degrees
pub const OBLIQUITY_J2000: f64 = 23.439_291_1;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_motions() {
        // synodic month of 29.530589 days
        assert_abs_diff_eq!(LUNAR_SOLAR_MEAN_MOTION, FULL_CIRCLE / 29.530_589, epsilon = 1e-4);
        // one lap of the zodiac in a year and a bit
        assert!(FULL_CIRCLE / SUN_MEAN_MOTION > 365.0 && FULL_CIRCLE / SUN_MEAN_MOTION < 367.0);
    }

    #[test]
    fn test_spans_tile_the_circle() {
        assert_abs_diff_eq!(12.0 * SIGN_SPAN, FULL_CIRCLE, epsilon = 1e-12);
        assert_abs_diff_eq!(27.0 * NAKSHATRA_SPAN, FULL_CIRCLE, epsilon = 1e-9);
        assert_abs_diff_eq!(DEG2RAD * RAD2DEG, 1.0, epsilon = 1e-15);
    }
}
