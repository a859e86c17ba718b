//! Stations: times when a body's longitude speed changes sign.
//!
//! The primary search scans the speed forward at a fixed step and bisects
//! the first sign change. Mercury and Venus can spend longer than the
//! primary horizon between stations, so for them a coarse fixed-window grid
//! is tried afterwards; that grid is not refined and reports the midpoint of
//! the sampling interval in which the sign changed.

use log::{debug, warn};

use super::engine::{self, Precision, Scan, Signal};
use super::errors::{Result, SearchError};
use super::types::{SearchDirection, Station, StationConfig, StationKind};
use crate::ephemeris::{Body, Ephemeris};

#[derive(Debug, Clone, Copy)]
struct SpeedSample {
    speed: f64,
}

impl Signal for SpeedSample {
    fn rate(&self) -> f64 {
        self.speed
    }
}

fn sign_changed(prev: f64, curr: f64) -> bool {
    (prev > 0.0 && curr <= 0.0) || (prev < 0.0 && curr >= 0.0)
}

fn speed_crossed(prev: &SpeedSample, curr: &SpeedSample) -> bool {
    sign_changed(prev.speed, curr.speed)
}

/// Reject bodies that never turn retrograde as seen from the Earth.
pub fn validate_station_body(body: Body) -> Result<()> {
    if body.can_station() {
        Ok(())
    } else {
        Err(SearchError::InvalidBody {
            body,
            reason: "has no stations",
        })
    }
}

/// Span of the fallback grid for bodies that can outlast the primary scan.
fn fallback_window_days(body: Body) -> Option<f64> {
    match body {
        Body::Mercury => Some(120.0),
        Body::Venus => Some(540.0),
        _ => None,
    }
}

fn station_at<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    kind: StationKind,
) -> Option<Station> {
    match ephem.position(body, jd, None, None) {
        Ok(state) => Some(Station {
            jd,
            body,
            longitude: state.longitude,
            latitude: state.latitude,
            kind,
        }),
        Err(err) => {
            warn!("Position of {} at station JD {} unavailable: {}", body, jd, err);
            None
        }
    }
}

/// Next station of `body` at or after `jd`.
///
/// The station kind is `Retrograde` when the speed was positive before the
/// sign change and `Direct` otherwise.
pub fn next_station<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    config: &StationConfig,
) -> Result<Option<Station>> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    validate_station_body(body)?;

    let sample = |t: f64| -> Result<SpeedSample> {
        let state = ephem.position(body, t, None, None)?;
        Ok(SpeedSample {
            speed: state.longitude_speed,
        })
    };
    let start = sample(jd)?;

    let scan = Scan {
        step_days: config.step_days,
        max_iterations: config.max_iterations,
        direction: SearchDirection::Forward,
    };
    if let Some(window) = engine::scan(jd, start, &scan, sample, speed_crossed) {
        let kind = StationKind::from_incoming_speed(window.anchor.speed);
        let precision = Precision::Days(config.convergence_days);
        return Ok(engine::refine(window, &precision, sample, speed_crossed)
            .and_then(|t| station_at(ephem, body, t, kind)));
    }

    match fallback_window_days(body) {
        Some(window_days) => Ok(fallback_station(ephem, body, jd, window_days, config)),
        None => Ok(None),
    }
}

fn fallback_station<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    jd: f64,
    window_days: f64,
    config: &StationConfig,
) -> Option<Station> {
    let grid = config.fallback_grid_days;
    let samples = (window_days / grid).ceil() as u32;
    debug!(
        "Primary scan found no station of {}; sampling {} points every {} days",
        body, samples, grid
    );

    let mut prev: Option<(f64, f64)> = None;
    for i in 0..samples {
        let t = jd + f64::from(i) * grid;
        let speed = match ephem.position(body, t, None, None) {
            Ok(state) => state.longitude_speed,
            Err(err) => {
                warn!("Skipping grid sample of {} at JD {}: {}", body, t, err);
                continue;
            }
        };
        if let Some((prev_t, prev_speed)) = prev {
            if sign_changed(prev_speed, speed) {
                let kind = StationKind::from_incoming_speed(prev_speed);
                return station_at(ephem, body, 0.5 * (prev_t + t), kind);
            }
        }
        prev = Some((t, speed));
    }
    None
}

/// Every station of `body` in `[start, end]`, in time order.
pub fn stations_between<E: Ephemeris + ?Sized>(
    ephem: &E,
    body: Body,
    start: f64,
    end: f64,
    config: &StationConfig,
) -> Result<Vec<Station>> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    validate_station_body(body)?;
    if !start.is_finite() || !end.is_finite() || end < start {
        return Err(SearchError::InvalidArgument(format!(
            "time range [{}, {}]",
            start, end
        )));
    }

    let sample = |t: f64| -> Result<SpeedSample> {
        let state = ephem.position(body, t, None, None)?;
        Ok(SpeedSample {
            speed: state.longitude_speed,
        })
    };
    let precision = Precision::Days(config.convergence_days);

    let mut stations = Vec::new();
    let mut from_jd = start;
    let mut from = sample(start)?;
    loop {
        let remaining = ((end - from_jd) / config.step_days).ceil();
        if remaining < 1.0 {
            break;
        }
        let scan = Scan {
            step_days: config.step_days,
            max_iterations: remaining as u32,
            direction: SearchDirection::Forward,
        };
        let Some(window) = engine::scan(from_jd, from, &scan, sample, speed_crossed) else {
            break;
        };
        let kind = StationKind::from_incoming_speed(window.anchor.speed);
        let (next_jd, next) = (window.far_jd, window.far);
        if let Some(t) = engine::refine(window, &precision, sample, speed_crossed) {
            if t <= end {
                stations.extend(station_at(ephem, body, t, kind));
            }
        }
        from_jd = next_jd;
        from = next;
    }

    debug!(
        "{} stations of {} between JD {} and JD {}",
        stations.len(),
        body,
        start,
        end
    );
    Ok(stations)
}
