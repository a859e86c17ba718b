//! Memoizing wrapper around an ephemeris provider

use super::{Body, BodyState, Ephemeris, HouseSystem, Houses, Location, Result, SiderealMode};
use crate::cache::{CacheManager, Category, FunctionStats, Memoized};

type PositionArgs = (Body, f64, Option<Location>, Option<SiderealMode>);
type HouseArgs = (f64, f64, f64, HouseSystem, Option<SiderealMode>);

/// Serves repeated lookups from the `ephemeris` cache category.
///
/// Only successful lookups are stored; failures reach the caller every time.
pub struct CachedEphemeris<E> {
    inner: E,
    positions: Memoized<PositionArgs, BodyState>,
    houses: Memoized<HouseArgs, Houses>,
}

impl<E: Ephemeris> CachedEphemeris<E> {
    pub fn new(inner: E, cache: &CacheManager) -> Self {
        Self {
            inner,
            positions: cache.memoize("ephemeris.position", Category::Ephemeris, None),
            houses: cache.memoize("ephemeris.houses", Category::Ephemeris, None),
        }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn stats(&self) -> Vec<FunctionStats> {
        vec![self.positions.stats(), self.houses.stats()]
    }
}

impl<E: Ephemeris> Ephemeris for CachedEphemeris<E> {
    fn position(
        &self,
        body: Body,
        jd: f64,
        location: Option<Location>,
        mode: Option<SiderealMode>,
    ) -> Result<BodyState> {
        self.positions
            .try_get_or_compute(&(body, jd, location, mode), |&(body, jd, location, mode)| {
                self.inner.position(body, jd, location, mode)
            })
    }

    fn houses(
        &self,
        jd: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
        mode: Option<SiderealMode>,
    ) -> Result<Houses> {
        self.houses.try_get_or_compute(
            &(jd, latitude, longitude, system, mode),
            |&(jd, latitude, longitude, system, mode)| {
                self.inner.houses(jd, latitude, longitude, system, mode)
            },
        )
    }
}
