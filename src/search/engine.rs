//! Generic event search: coarse bracketing then bisection.
//!
//! A search samples some signal of time (a longitude offset, a speed, ...)
//! at fixed steps from a reference time until a crossing predicate fires
//! between two consecutive samples. The pair of samples is a
//! [`SearchWindow`]; bisection then shrinks it, always keeping the side
//! that still contains the crossing, and the midpoint is reported.
//!
//! The predicate is always evaluated as `crossed(anchor, candidate)`, with
//! the anchor being the sample nearer the reference time, so the same
//! predicate works for forward and backward scans.

use log::{debug, trace, warn};

use super::errors::SearchError;
use super::types::SearchDirection;

/// Offset applied to a failed sample before it is retried once.
pub(crate) const SAMPLE_RETRY_OFFSET_DAYS: f64 = 0.01;

/// Bisection halves the window; this bound is never reached in practice.
const MAX_BISECTION_STEPS: u32 = 200;

/// A sampled signal value that knows its rate of change.
pub(crate) trait Signal: Copy {
    /// Rate of the underlying angle in degrees/day.
    fn rate(&self) -> f64;
}

/// When to stop bisecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Precision {
    /// Stop once the window is narrower than the time needed to move
    /// `error_deg` at the anchor's rate (floored at `speed_floor`).
    Angular {
        error_deg: f64,
        speed_floor: f64,
        min_step_days: f64,
    },
    /// Stop once the window is narrower than a fixed number of days.
    Days(f64),
}

impl Precision {
    pub fn window_days(&self, rate: f64) -> f64 {
        match *self {
            Precision::Angular {
                error_deg,
                speed_floor,
                min_step_days,
            } => (error_deg / rate.abs().max(speed_floor)).max(min_step_days),
            Precision::Days(days) => days,
        }
    }
}

/// Coarse scan parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scan {
    pub step_days: f64,
    pub max_iterations: u32,
    pub direction: SearchDirection,
}

/// Two consecutive samples on either side of a crossing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchWindow<S> {
    /// The sample nearer the reference time.
    pub anchor_jd: f64,
    pub anchor: S,
    /// The sample beyond the crossing.
    pub far_jd: f64,
    pub far: S,
    /// Coarse steps taken to find the window.
    pub steps: u32,
}

impl<S> SearchWindow<S> {
    /// (lower, upper) in time order.
    pub fn bounds(&self) -> (f64, f64) {
        if self.anchor_jd <= self.far_jd {
            (self.anchor_jd, self.far_jd)
        } else {
            (self.far_jd, self.anchor_jd)
        }
    }

    pub fn width(&self) -> f64 {
        (self.far_jd - self.anchor_jd).abs()
    }
}

/// Sample at `jd`, retrying once slightly further along the scan.
fn resample<S, F>(jd: f64, direction: SearchDirection, sample: &mut F) -> Option<(f64, S)>
where
    F: FnMut(f64) -> Result<S, SearchError>,
{
    match sample(jd) {
        Ok(value) => Some((jd, value)),
        Err(err) => {
            let retry_jd = jd + direction.sign() * SAMPLE_RETRY_OFFSET_DAYS;
            warn!("Sample at JD {} failed ({}), retrying at JD {}", jd, err, retry_jd);
            match sample(retry_jd) {
                Ok(value) => Some((retry_jd, value)),
                Err(err) => {
                    warn!("Retry at JD {} failed ({}), abandoning scan", retry_jd, err);
                    None
                }
            }
        }
    }
}

/// Step from `start` until `crossed(previous, current)` fires.
///
/// Returns `None` when the iteration cap is reached or sampling fails twice
/// in a row. The caller is responsible for sampling `start` itself so that a
/// failure at the reference time surfaces as an error.
pub(crate) fn scan<S, F, C>(
    start_jd: f64,
    start: S,
    scan: &Scan,
    mut sample: F,
    mut crossed: C,
) -> Option<SearchWindow<S>>
where
    S: Copy,
    F: FnMut(f64) -> Result<S, SearchError>,
    C: FnMut(&S, &S) -> bool,
{
    let step = scan.direction.sign() * scan.step_days;
    let mut prev_jd = start_jd;
    let mut prev = start;

    for steps in 1..=scan.max_iterations {
        let (jd, curr) = resample(prev_jd + step, scan.direction, &mut sample)?;
        if crossed(&prev, &curr) {
            debug!(
                "Crossing bracketed between JD {} and JD {} after {} steps",
                prev_jd, jd, steps
            );
            return Some(SearchWindow {
                anchor_jd: prev_jd,
                anchor: prev,
                far_jd: jd,
                far: curr,
                steps,
            });
        }
        prev_jd = jd;
        prev = curr;
    }

    debug!(
        "No crossing within {} steps of {} days from JD {}",
        scan.max_iterations, scan.step_days, start_jd
    );
    None
}

/// Bisect a window down to the requested precision and return its midpoint.
///
/// The stopping width is fixed from the anchor's rate. A failed sample ends
/// the search with `None`.
pub(crate) fn refine<S, F, C>(
    window: SearchWindow<S>,
    precision: &Precision,
    mut sample: F,
    mut crossed: C,
) -> Option<f64>
where
    S: Signal,
    F: FnMut(f64) -> Result<S, SearchError>,
    C: FnMut(&S, &S) -> bool,
{
    let tolerance = precision.window_days(window.anchor.rate());
    let (lo, hi) = window.bounds();
    trace!(
        "Refining [{}, {}] ({} days) down to {} days",
        lo,
        hi,
        window.width(),
        tolerance
    );
    let mut anchor_jd = window.anchor_jd;
    let mut anchor = window.anchor;
    let mut far_jd = window.far_jd;

    for _ in 0..MAX_BISECTION_STEPS {
        if (far_jd - anchor_jd).abs() <= tolerance {
            break;
        }
        let mid_jd = 0.5 * (anchor_jd + far_jd);
        let mid = match sample(mid_jd) {
            Ok(value) => value,
            Err(err) => {
                warn!("Bisection sample at JD {} failed ({})", mid_jd, err);
                return None;
            }
        };
        if crossed(&anchor, &mid) {
            far_jd = mid_jd;
        } else {
            anchor_jd = mid_jd;
            anchor = mid;
        }
        trace!("Bisection window [{}, {}]", anchor_jd.min(far_jd), anchor_jd.max(far_jd));
    }

    Some(0.5 * (anchor_jd + far_jd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisError;
    use approx::assert_abs_diff_eq;

    #[derive(Debug, Clone, Copy)]
    struct Value {
        v: f64,
        rate: f64,
    }

    impl Signal for Value {
        fn rate(&self) -> f64 {
            self.rate
        }
    }

    fn sign_change(a: &Value, b: &Value) -> bool {
        (a.v < 0.0 && b.v >= 0.0) || (a.v > 0.0 && b.v <= 0.0)
    }

    fn linear(root: f64) -> impl Fn(f64) -> Result<Value, SearchError> + Copy {
        move |t| Ok(Value { v: t - root, rate: 1.0 })
    }

    fn forward(step: f64, n: u32) -> Scan {
        Scan {
            step_days: step,
            max_iterations: n,
            direction: SearchDirection::Forward,
        }
    }

    #[test]
    fn test_window_brackets_root() {
        let f = linear(7.3);
        let start = f(0.0).unwrap();
        let window = scan(0.0, start, &forward(1.0, 20), f, sign_change).unwrap();
        let (lo, hi) = window.bounds();
        assert!(lo <= 7.3 && 7.3 <= hi);
        assert_eq!(window.steps, 8);
        assert_abs_diff_eq!(window.width(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_backward_scan() {
        let f = linear(-4.6);
        let start = f(0.0).unwrap();
        let backward = Scan {
            direction: SearchDirection::Backward,
            ..forward(1.0, 20)
        };
        let window = scan(0.0, start, &backward, f, sign_change).unwrap();
        let t = refine(window, &Precision::Days(1e-6), f, sign_change).unwrap();
        assert_abs_diff_eq!(t, -4.6, epsilon = 1e-6);
    }

    #[test]
    fn test_refine_meets_angular_precision() {
        let f = linear(3.14159);
        let window = scan(0.0, f(0.0).unwrap(), &forward(1.0, 10), f, sign_change).unwrap();
        let precision = Precision::Angular {
            error_deg: 0.001,
            speed_floor: 0.1,
            min_step_days: 1e-6,
        };
        let t = refine(window, &precision, f, sign_change).unwrap();
        assert!((t - 3.14159).abs() <= 0.0005);
    }

    #[test]
    fn test_iteration_cap_gives_none() {
        let f = linear(50.0);
        assert!(scan(0.0, f(0.0).unwrap(), &forward(1.0, 10), f, sign_change).is_none());
    }

    #[test]
    fn test_failed_sample_is_retried_once() {
        let f = |t: f64| {
            if (t - 3.0).abs() < 1e-9 {
                Err(SearchError::Lookup(EphemerisError::InvalidTime(t)))
            } else {
                Ok(Value { v: t - 5.5, rate: 1.0 })
            }
        };
        let window = scan(0.0, f(0.0).unwrap(), &forward(1.0, 10), f, sign_change).unwrap();
        // the step at 3.0 moved to 3.01, later steps follow from there
        assert_abs_diff_eq!(window.anchor_jd, 5.01, epsilon = 1e-9);
    }

    #[test]
    fn test_double_failure_abandons_scan() {
        let f = |t: f64| {
            if t > 2.5 {
                Err(SearchError::Lookup(EphemerisError::InvalidTime(t)))
            } else {
                Ok(Value { v: t - 5.5, rate: 1.0 })
            }
        };
        assert!(scan(0.0, f(0.0).unwrap(), &forward(1.0, 10), f, sign_change).is_none());
    }

    #[test]
    fn test_precision_floor_and_minimum() {
        let p = Precision::Angular {
            error_deg: 0.001,
            speed_floor: 0.1,
            min_step_days: 1e-6,
        };
        assert_abs_diff_eq!(p.window_days(0.0), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(p.window_days(-13.0), 0.001 / 13.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.window_days(1e6), 1e-6, epsilon = 1e-15);
        assert_abs_diff_eq!(Precision::Days(0.25).window_days(9.0), 0.25, epsilon = 1e-15);
    }
}
