//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use gochara::angle::normalize;
use gochara::ephemeris::{
    Body, BodyState, Ephemeris, EphemerisError, HouseSystem, Houses, Location, Result,
    SiderealMode,
};

pub const T0: f64 = 2_451_545.0;

/// `lon(t) = l0 + rate * (t - T0) + amplitude * sin(omega * (t - T0))`
#[derive(Debug, Clone, Copy)]
pub struct Track {
    pub l0: f64,
    pub rate: f64,
    pub amplitude: f64,
    pub omega: f64,
}

impl Track {
    pub fn linear(l0: f64, rate: f64) -> Self {
        Self {
            l0,
            rate,
            amplitude: 0.0,
            omega: 0.0,
        }
    }

    pub fn longitude(&self, jd: f64) -> f64 {
        let tau = jd - T0;
        normalize(self.l0 + self.rate * tau + self.amplitude * (self.omega * tau).sin())
    }

    pub fn speed(&self, jd: f64) -> f64 {
        let tau = jd - T0;
        self.rate + self.amplitude * self.omega * (self.omega * tau).cos()
    }
}

/// Analytic ephemeris that counts every position lookup
#[derive(Debug, Default)]
pub struct CountingEphemeris {
    tracks: HashMap<Body, Track>,
    calls: AtomicUsize,
}

impl CountingEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, body: Body, track: Track) -> Self {
        self.tracks.insert(body, track);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Ephemeris for CountingEphemeris {
    fn position(
        &self,
        body: Body,
        jd: f64,
        _location: Option<Location>,
        _mode: Option<SiderealMode>,
    ) -> Result<BodyState> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let track = self
            .tracks
            .get(&body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        Ok(BodyState {
            longitude: track.longitude(jd),
            latitude: 0.0,
            longitude_speed: track.speed(jd),
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
