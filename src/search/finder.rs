//! Cached entry point bundling an ephemeris with the search configurations.

use super::errors::Result;
use super::types::{SearchSettings, Station, Syzygy};
use super::{aspect, longitude, returns, station, SearchError};
use crate::cache::{CacheManager, Category, Memoized};
use crate::config::GocharaConfig;
use crate::ephemeris::{Body, CachedEphemeris, Ephemeris, SiderealMode};

type SolarReturnArgs = (f64, f64, bool, Option<SiderealMode>);

/// Event searches over a cached ephemeris.
///
/// Every ephemeris lookup goes through the `ephemeris` cache category and
/// solar returns and syzygies are memoized in the `calculations` category.
///
/// ```rust
/// use gochara::cache::CacheManager;
/// use gochara::ephemeris::{Body, MeanElementsEphemeris};
/// use gochara::search::EventFinder;
///
/// let finder = EventFinder::new(MeanElementsEphemeris::new(), &CacheManager::default());
/// let ingress = finder
///     .next_sign_transit(Body::Sun, 2_451_545.0, 2, None)
///     .unwrap()
///     .expect("the Sun enters Taurus within a year");
/// assert!(ingress > 2_451_545.0 && ingress < 2_451_545.0 + 366.0);
/// ```
pub struct EventFinder<E: Ephemeris> {
    ephemeris: CachedEphemeris<E>,
    cache: CacheManager,
    settings: SearchSettings,
    solar_returns: Memoized<SolarReturnArgs, f64>,
    syzygies: Memoized<f64, Syzygy>,
}

impl<E: Ephemeris> EventFinder<E> {
    /// Create a finder with default search settings
    pub fn new(ephemeris: E, cache: &CacheManager) -> Self {
        Self {
            ephemeris: CachedEphemeris::new(ephemeris, cache),
            cache: cache.clone(),
            settings: SearchSettings::default(),
            solar_returns: cache.memoize("search.solar_return", Category::Calculation, None),
            syzygies: cache.memoize("search.syzygy", Category::Calculation, None),
        }
    }

    /// Create a finder with custom settings, validating them first
    pub fn with_settings(
        ephemeris: E,
        cache: &CacheManager,
        settings: SearchSettings,
    ) -> Result<Self> {
        settings.validate().map_err(SearchError::InvalidConfig)?;
        let mut finder = Self::new(ephemeris, cache);
        finder.settings = settings;
        Ok(finder)
    }

    /// Create a finder and its own cache from a loaded configuration
    pub fn from_config(ephemeris: E, config: &GocharaConfig) -> crate::Result<Self> {
        config.validate()?;
        let cache = CacheManager::new(&config.cache);
        Ok(Self::with_settings(ephemeris, &cache, config.search)?)
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn ephemeris(&self) -> &CachedEphemeris<E> {
        &self.ephemeris
    }

    pub fn next_longitude_transit(
        &self,
        body: Body,
        jd: f64,
        target: f64,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        longitude::next_longitude_transit(
            &self.ephemeris,
            body,
            jd,
            target,
            mode,
            &self.settings.longitude,
        )
    }

    pub fn last_longitude_transit(
        &self,
        body: Body,
        jd: f64,
        target: f64,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        longitude::last_longitude_transit(
            &self.ephemeris,
            body,
            jd,
            target,
            mode,
            &self.settings.longitude,
        )
    }

    pub fn next_sign_transit(
        &self,
        body: Body,
        jd: f64,
        sign: u8,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        longitude::next_sign_transit(
            &self.ephemeris,
            body,
            jd,
            sign,
            mode,
            &self.settings.longitude,
        )
    }

    pub fn last_sign_transit(
        &self,
        body: Body,
        jd: f64,
        sign: u8,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        longitude::last_sign_transit(
            &self.ephemeris,
            body,
            jd,
            sign,
            mode,
            &self.settings.longitude,
        )
    }

    pub fn next_nakshatra_transit(
        &self,
        body: Body,
        jd: f64,
        nakshatra: u8,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        longitude::next_nakshatra_transit(
            &self.ephemeris,
            body,
            jd,
            nakshatra,
            mode,
            &self.settings.longitude,
        )
    }

    pub fn last_nakshatra_transit(
        &self,
        body: Body,
        jd: f64,
        nakshatra: u8,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        longitude::last_nakshatra_transit(
            &self.ephemeris,
            body,
            jd,
            nakshatra,
            mode,
            &self.settings.longitude,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn next_aspect_transit(
        &self,
        a: Body,
        b: Body,
        jd: f64,
        aspect: f64,
        orb: f64,
        mode: Option<SiderealMode>,
    ) -> Result<Option<f64>> {
        aspect::next_aspect_transit(
            &self.ephemeris,
            a,
            b,
            jd,
            aspect,
            orb,
            mode,
            &self.settings.aspect,
        )
    }

    pub fn next_station(&self, body: Body, jd: f64) -> Result<Option<Station>> {
        station::next_station(&self.ephemeris, body, jd, &self.settings.station)
    }

    pub fn stations_between(&self, body: Body, start: f64, end: f64) -> Result<Vec<Station>> {
        station::stations_between(&self.ephemeris, body, start, end, &self.settings.station)
    }

    pub fn solar_return(
        &self,
        jd: f64,
        target: f64,
        forward: bool,
        mode: Option<SiderealMode>,
    ) -> Result<f64> {
        self.solar_returns
            .try_get_or_compute(&(jd, target, forward, mode), |&(jd, target, forward, mode)| {
                returns::solar_return(&self.ephemeris, jd, target, forward, mode)
            })
    }

    pub fn next_solar_return(
        &self,
        jd: f64,
        target: f64,
        mode: Option<SiderealMode>,
    ) -> Result<f64> {
        self.solar_return(jd, target, true, mode)
    }

    pub fn prev_solar_return(
        &self,
        jd: f64,
        target: f64,
        mode: Option<SiderealMode>,
    ) -> Result<f64> {
        self.solar_return(jd, target, false, mode)
    }

    pub fn syzygy_event(&self, jd: f64) -> Result<Syzygy> {
        self.syzygies
            .try_get_or_compute(&jd, |&jd| returns::syzygy_event(&self.ephemeris, jd))
    }

    pub fn syzygy(&self, jd: f64) -> Result<f64> {
        self.syzygy_event(jd).map(|s| s.jd)
    }
}
