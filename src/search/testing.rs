//! Analytic ephemeris for exercising the searches against known answers.

use std::collections::HashMap;

use crate::angle::normalize;
use crate::ephemeris::{
    Body, BodyState, Ephemeris, EphemerisError, HouseSystem, Houses, Location, Result,
    SiderealMode,
};

/// `lon(t) = l0 + rate * (t - epoch) + amplitude * sin(omega * (t - epoch))`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Motion {
    pub l0: f64,
    pub rate: f64,
    pub amplitude: f64,
    pub omega: f64,
    pub epoch: f64,
}

impl Motion {
    pub fn linear(l0: f64, rate: f64, epoch: f64) -> Self {
        Self {
            l0,
            rate,
            amplitude: 0.0,
            omega: 0.0,
            epoch,
        }
    }

    pub fn longitude(&self, jd: f64) -> f64 {
        let tau = jd - self.epoch;
        normalize(self.l0 + self.rate * tau + self.amplitude * (self.omega * tau).sin())
    }

    pub fn speed(&self, jd: f64) -> f64 {
        let tau = jd - self.epoch;
        self.rate + self.amplitude * self.omega * (self.omega * tau).cos()
    }
}

#[derive(Debug, Default)]
pub(crate) struct SyntheticEphemeris {
    motions: HashMap<Body, Motion>,
    failing: Vec<(f64, f64)>,
}

impl SyntheticEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, body: Body, motion: Motion) -> Self {
        self.motions.insert(body, motion);
        self
    }

    /// Make every lookup inside `[start, end]` fail
    pub fn failing_between(mut self, start: f64, end: f64) -> Self {
        self.failing.push((start, end));
        self
    }
}

impl Ephemeris for SyntheticEphemeris {
    fn position(
        &self,
        body: Body,
        jd: f64,
        _location: Option<Location>,
        _mode: Option<SiderealMode>,
    ) -> Result<BodyState> {
        if self.failing.iter().any(|&(a, b)| jd >= a && jd <= b) {
            return Err(EphemerisError::OutOfRange {
                jd,
                start_jd: f64::NEG_INFINITY,
                end_jd: f64::INFINITY,
            });
        }
        let motion = self
            .motions
            .get(&body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        Ok(BodyState {
            longitude: motion.longitude(jd),
            latitude: 0.0,
            longitude_speed: motion.speed(jd),
            latitude_speed: 0.0,
        })
    }

    fn houses(
        &self,
        _jd: f64,
        _latitude: f64,
        _longitude: f64,
        _system: HouseSystem,
        _mode: Option<SiderealMode>,
    ) -> Result<Houses> {
        Err(EphemerisError::Undefined("houses".to_string()))
    }
}
