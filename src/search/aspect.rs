//! Aspect transits between two bodies.
//!
//! An aspect of angle `α` holds when the unsigned separation of the two
//! bodies equals `α`. For `0 < α < 180` that happens on two sides: body A
//! `α` ahead of B, or `α` behind it. Both are tracked as signed offsets of
//! the directed elongation `A - B` so that each crossing is a plain sign
//! change.

use log::debug;

use super::engine::{self, Scan, Signal};
use super::errors::{Result, SearchError};
use super::types::{AspectConfig, SearchDirection};
use crate::angle::{closest_distance, distance, is_genuine_sign_change, signed_normalize};
use crate::ephemeris::{Body, Ephemeris, SiderealMode};

#[derive(Debug, Clone, Copy)]
struct AspectSample {
    /// Offset of the elongation from `+α`
    ahead: f64,
    /// Offset of the elongation from `-α`
    behind: f64,
    relative_speed: f64,
}

impl AspectSample {
    /// Offset to whichever side of the aspect is closer
    fn nearest(&self) -> f64 {
        if self.ahead.abs() <= self.behind.abs() {
            self.ahead
        } else {
            self.behind
        }
    }

    fn within(&self, orb: f64) -> bool {
        self.nearest().abs() <= orb
    }
}

impl Signal for AspectSample {
    fn rate(&self) -> f64 {
        self.relative_speed
    }
}

fn passes_exact(prev: &AspectSample, curr: &AspectSample) -> bool {
    is_genuine_sign_change(prev.ahead, curr.ahead)
        || is_genuine_sign_change(prev.behind, curr.behind)
}

/// Coarse step and step count for a pair, keeping the nominal time horizon.
fn scan_for_pair(a: Body, b: Body, config: &AspectConfig) -> Scan {
    let relative = a.max_daily_motion() + b.max_daily_motion();
    let step_days = if relative > 0.0 {
        config.step_days.min(config.max_step_arc_deg / relative)
    } else {
        config.step_days
    };
    let horizon = config.step_days * f64::from(config.max_iterations);
    Scan {
        step_days,
        max_iterations: (horizon / step_days).ceil() as u32,
        direction: SearchDirection::Forward,
    }
}

/// Earliest time at or after `jd` at which `a` and `b` come within `orb`
/// degrees of the `aspect` angle.
///
/// With `orb = 0` the exact aspect is returned. If the pair is already
/// inside the orb at `jd`, the search continues to the exact aspect when the
/// bodies are approaching and to the next orb entry when they are
/// separating; that choice is made once from the relative speed at `jd`.
#[allow(clippy::too_many_arguments)]
pub fn next_aspect_transit<E: Ephemeris + ?Sized>(
    ephem: &E,
    a: Body,
    b: Body,
    jd: f64,
    aspect: f64,
    orb: f64,
    mode: Option<SiderealMode>,
    config: &AspectConfig,
) -> Result<Option<f64>> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if a == b {
        return Err(SearchError::InvalidArgument(format!(
            "aspect of {} with itself",
            a
        )));
    }
    if !aspect.is_finite() || !orb.is_finite() || !(0.0..90.0).contains(&orb) {
        return Err(SearchError::InvalidArgument(format!(
            "aspect {} with orb {}",
            aspect, orb
        )));
    }
    let aspect = distance(0.0, aspect);

    let sample = |t: f64| -> Result<AspectSample> {
        let pa = ephem.position(a, t, None, mode)?;
        let pb = ephem.position(b, t, None, mode)?;
        let elongation = closest_distance(pb.longitude, pa.longitude);
        Ok(AspectSample {
            ahead: signed_normalize(elongation - aspect),
            behind: signed_normalize(elongation + aspect),
            relative_speed: pa.longitude_speed - pb.longitude_speed,
        })
    };

    let start = sample(jd)?;
    if start.nearest() == 0.0 {
        return Ok(Some(jd));
    }
    let mut scan = scan_for_pair(a, b, config);
    let approaching = start.nearest() * start.relative_speed < 0.0;

    let (target_orb, from_jd, from) = if !start.within(orb) {
        (orb, jd, start)
    } else if approaching {
        (0.0, jd, start)
    } else {
        let Some(exit) = engine::scan(jd, start, &scan, sample, |_, s| !s.within(orb)) else {
            return Ok(None);
        };
        scan.max_iterations -= exit.steps;
        if scan.max_iterations == 0 {
            return Ok(None);
        }
        (orb, exit.far_jd, exit.far)
    };

    let crossed = move |prev: &AspectSample, curr: &AspectSample| {
        !prev.within(target_orb) && (curr.within(target_orb) || passes_exact(prev, curr))
    };
    let Some(window) = engine::scan(from_jd, from, &scan, sample, crossed) else {
        debug!("No {}° aspect of {} and {} after JD {}", aspect, a, b, jd);
        return Ok(None);
    };
    Ok(engine::refine(window, &config.precision(), sample, crossed))
}
