//! Solar returns and syzygies by fixed-point iteration.
//!
//! Both searches step time by the remaining arc divided by a mean daily
//! motion until the arc is below one arc-second. They converge in a handful
//! of iterations because the true motion stays close to the mean.

use log::debug;

use super::errors::{Result, SearchError};
use super::types::{Syzygy, SyzygyKind};
use crate::angle::{closest_distance, forward_distance, normalize};
use crate::constants::{
    LUNAR_SOLAR_MEAN_MOTION, MAX_ARC_ERROR, MAX_FIXED_POINT_ITERATIONS, SUN_MEAN_MOTION,
};
use crate::ephemeris::{Body, Ephemeris, SiderealMode};

fn longitude<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    mode: Option<SiderealMode>,
) -> Result<f64> {
    Ok(ephem.position(body, jd, None, mode)?.longitude)
}

/// Time at which the Sun reaches `target` longitude.
///
/// With `forward` the result is at or after `jd`, otherwise at or before it.
pub fn solar_return<E: Ephemeris + ?Sized>(
    ephem: &E,
    jd: f64,
    target: f64,
    forward: bool,
    mode: Option<SiderealMode>,
) -> Result<f64> {
    if !target.is_finite() {
        return Err(SearchError::InvalidArgument(format!(
            "target longitude {}",
            target
        )));
    }
    let target = normalize(target);
    let sun = longitude(ephem, Body::Sun, jd, mode)?;
    let mut arc = if forward {
        forward_distance(sun, target)
    } else {
        -forward_distance(target, sun)
    };

    let mut t = jd;
    for i in 0..MAX_FIXED_POINT_ITERATIONS {
        if arc.abs() <= MAX_ARC_ERROR {
            debug!("Solar return to {}° at JD {} after {} iterations", target, t, i);
            return Ok(t);
        }
        t += arc / SUN_MEAN_MOTION;
        arc = closest_distance(longitude(ephem, Body::Sun, t, mode)?, target);
    }
    Err(SearchError::NoConvergence {
        iterations: MAX_FIXED_POINT_ITERATIONS,
    })
}

/// Next solar return at or after `jd`.
pub fn next_solar_return<E: Ephemeris + ?Sized>(
    ephem: &E,
    jd: f64,
    target: f64,
    mode: Option<SiderealMode>,
) -> Result<f64> {
    solar_return(ephem, jd, target, true, mode)
}

/// Previous solar return at or before `jd`.
pub fn prev_solar_return<E: Ephemeris + ?Sized>(
    ephem: &E,
    jd: f64,
    target: f64,
    mode: Option<SiderealMode>,
) -> Result<f64> {
    solar_return(ephem, jd, target, false, mode)
}

/// Most recent new or full moon at or before `jd`.
///
/// A new moon is sought when the Moon is less than 180° ahead of the Sun,
/// otherwise a full moon.
pub fn syzygy_event<E: Ephemeris + ?Sized>(ephem: &E, jd: f64) -> Result<Syzygy> {
    let sun = longitude(ephem, Body::Sun, jd, None)?;
    let moon = longitude(ephem, Body::Moon, jd, None)?;
    let elongation = forward_distance(sun, moon);
    let kind = if elongation >= 180.0 {
        SyzygyKind::FullMoon
    } else {
        SyzygyKind::NewMoon
    };
    let offset = kind.elongation();

    let mut arc = elongation - offset;
    let mut t = jd;
    for i in 0..MAX_FIXED_POINT_ITERATIONS {
        if arc.abs() <= MAX_ARC_ERROR {
            debug!("{:?} at JD {} after {} iterations", kind, t, i);
            return Ok(Syzygy { jd: t.min(jd), kind });
        }
        t -= arc / LUNAR_SOLAR_MEAN_MOTION;
        let sun = longitude(ephem, Body::Sun, t, None)?;
        let moon = longitude(ephem, Body::Moon, t, None)?;
        arc = closest_distance(sun + offset, moon);
    }
    Err(SearchError::NoConvergence {
        iterations: MAX_FIXED_POINT_ITERATIONS,
    })
}

/// Time of the most recent new or full moon at or before `jd`.
pub fn syzygy<E: Ephemeris + ?Sized>(ephem: &E, jd: f64) -> Result<f64> {
    syzygy_event(ephem, jd).map(|s| s.jd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::MeanElementsEphemeris;
    use crate::search::testing::{Motion, SyntheticEphemeris};
    use approx::assert_abs_diff_eq;

    const T0: f64 = 2_451_545.0;

    #[test]
    fn test_solar_return_linear_sun() {
        let eph = SyntheticEphemeris::new().with(Body::Sun, Motion::linear(100.0, 1.0, T0));
        let t = next_solar_return(&eph, T0, 130.0, None).unwrap();
        assert_abs_diff_eq!(t, T0 + 30.0, epsilon = 0.001);
        let t = prev_solar_return(&eph, T0, 130.0, None).unwrap();
        assert_abs_diff_eq!(t, T0 - 330.0, epsilon = 0.001);
    }

    #[test]
    fn test_solar_return_already_there() {
        let eph = SyntheticEphemeris::new().with(Body::Sun, Motion::linear(100.0, 1.0, T0));
        assert_eq!(next_solar_return(&eph, T0, 100.0, None).unwrap(), T0);
    }

    #[test]
    fn test_solar_return_on_mean_elements() {
        let eph = MeanElementsEphemeris::new();
        let natal = eph.position(Body::Sun, T0, None, None).unwrap().longitude;
        let t = next_solar_return(&eph, T0 + 10.0, natal, None).unwrap();
        assert!((t - T0 - 365.25).abs() < 0.1, "return at {}", t);
        let lon = eph.position(Body::Sun, t, None, None).unwrap().longitude;
        assert!(closest_distance(lon, natal).abs() <= MAX_ARC_ERROR);
    }

    #[test]
    fn test_syzygy_precedes_reference() {
        let eph = MeanElementsEphemeris::new();
        for k in 0..12 {
            let jd = T0 + 7.3 * f64::from(k);
            let event = syzygy_event(&eph, jd).unwrap();
            assert!(event.jd <= jd);
            assert!(jd - event.jd < 16.0, "{} -> {}", jd, event.jd);

            let sun = eph.position(Body::Sun, event.jd, None, None).unwrap().longitude;
            let moon = eph.position(Body::Moon, event.jd, None, None).unwrap().longitude;
            let elongation = closest_distance(sun + event.kind.elongation(), moon);
            assert!(elongation.abs() < 0.001, "elongation {}", elongation);
        }
    }

    #[test]
    fn test_new_moon_of_january_2000() {
        // New moon of 2000-01-06 18:14 UT
        let jd = syzygy(&MeanElementsEphemeris::new(), 2_451_552.0).unwrap();
        assert_abs_diff_eq!(jd, 2_451_550.26, epsilon = 0.05);
    }

    #[test]
    fn test_syzygy_failure_surfaces() {
        let eph = SyntheticEphemeris::new().with(Body::Sun, Motion::linear(0.0, 1.0, T0));
        assert!(matches!(syzygy(&eph, T0), Err(SearchError::Lookup(_))));
    }
}
