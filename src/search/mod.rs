//! # Event Search
//!
//! Times at which an angular quantity crosses a target value:
//!
//! - longitude transits, including sign and nakshatra ingresses
//! - aspect transits between two bodies
//! - stations, where a body turns retrograde or direct
//! - solar returns and the most recent new or full moon
//!
//! The first three share a coarse scan followed by bisection (see
//! `engine`). Solar returns and syzygies converge by fixed-point iteration on
//! the mean motion instead.
//!
//! Every search is a free function over any [`Ephemeris`](crate::ephemeris::Ephemeris);
//! [`EventFinder`] bundles the same searches with a cached ephemeris and a
//! set of [`SearchSettings`].

pub(crate) mod engine;
mod errors;
mod types;

mod aspect;
mod finder;
mod longitude;
mod returns;
mod station;

#[cfg(test)]
pub(crate) mod testing;

pub use aspect::next_aspect_transit;
pub use errors::{Result, SearchError};
pub use finder::EventFinder;
pub use longitude::{
    last_longitude_transit, last_nakshatra_transit, last_sign_transit, longitude_transit,
    nakshatra_start, next_longitude_transit, next_nakshatra_transit, next_sign_transit,
    sign_start,
};
pub use returns::{next_solar_return, prev_solar_return, solar_return, syzygy, syzygy_event};
pub use station::{next_station, stations_between, validate_station_body};
pub use types::{
    AspectConfig, LongitudeTransitConfig, SearchDirection, SearchSettings, Station,
    StationConfig, StationKind, Syzygy, SyzygyKind,
};
