//! # Angular Utilities
//!
//! Pure functions over ecliptic longitudes expressed in degrees.
//!
//! ## Conventions
//!
//! - Longitudes live in `[0, 360)`; [`normalize`] maps any finite angle there.
//! - Signed offsets live in `(-180, 180]`; [`signed_normalize`] maps any finite
//!   angle there, so that `180` stays `180` and `-180` becomes `180`.
//! - [`closest_distance`] is the signed shortest rotation taking `a` onto `b`.
//!   A positive value means `b` lies ahead of `a` in the direction of
//!   increasing longitude.
//! - [`distance`] is the unsigned shortest separation, `|closest_distance|`.
//! - [`forward_distance`] is the counter-clockwise arc from `a` to `b`, which is
//!   what an always-direct body such as the Sun still has to travel.
//!
//! ## Examples
//!
//! ```rust
//! use gochara::angle;
//!
//! assert_eq!(angle::normalize(-10.0), 350.0);
//! assert_eq!(angle::closest_distance(355.0, 5.0), 10.0);
//! assert_eq!(angle::closest_distance(5.0, 355.0), -10.0);
//! assert_eq!(angle::distance(5.0, 355.0), 10.0);
//! assert_eq!(angle::forward_distance(5.0, 355.0), 350.0);
//! ```

use crate::constants::FULL_CIRCLE;

/// Normalizes an angle into `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `360.0`; that
/// value is folded back to `0.0` so the half-open range always holds.
pub fn normalize(angle: f64) -> f64 {
    let n = angle.rem_euclid(FULL_CIRCLE);
    if n >= FULL_CIRCLE {
        0.0
    } else {
        n
    }
}

/// Normalizes an angle into `(-180, 180]`.
pub fn signed_normalize(angle: f64) -> f64 {
    let n = normalize(angle);
    if n > 180.0 {
        n - FULL_CIRCLE
    } else {
        n
    }
}

/// Signed shortest separation from `a` to `b` in `(-180, 180]`.
pub fn closest_distance(a: f64, b: f64) -> f64 {
    signed_normalize(b - a)
}

/// Unsigned shortest separation between `a` and `b` in `[0, 180]`.
pub fn distance(a: f64, b: f64) -> f64 {
    closest_distance(a, b).abs()
}

/// Counter-clockwise arc from `a` to `b` in `[0, 360)`.
pub fn forward_distance(a: f64, b: f64) -> f64 {
    normalize(b - a)
}

/// Returns true when a move from `prev` to `curr` crosses `target`.
///
/// Both `prev` and `curr` are longitudes sampled one coarse step apart. The
/// test works on signed offsets to `target`, so a raw wrap from 359° to 1° is
/// handled like any other step: with the target at 0° the offsets go from -1
/// to +1 and the crossing is detected. A flip of the offset through ±180°
/// (the body being diametrically opposite the target) is a seam artefact and
/// is rejected. Motion in either direction counts.
pub fn crosses(prev: f64, curr: f64, target: f64) -> bool {
    let d_prev = closest_distance(target, prev);
    let d_curr = closest_distance(target, curr);
    is_genuine_sign_change(d_prev, d_curr)
}

/// Sign change between two signed offsets that is not a ±180° seam jump.
///
/// Touching zero counts as a crossing on the side that reaches it.
pub(crate) fn is_genuine_sign_change(d_prev: f64, d_curr: f64) -> bool {
    let changed = (d_prev < 0.0 && d_curr >= 0.0) || (d_prev > 0.0 && d_curr <= 0.0);
    changed && (d_prev - d_curr).abs() < 180.0
}
