//! Event searches against analytic motions with known answers

mod common;

use approx::assert_abs_diff_eq;
use common::{CountingEphemeris, Track, T0};
use gochara::angle::closest_distance;
use gochara::cache::{CacheConfig, CacheManager, Category};
use gochara::ephemeris::Body;
use gochara::search::{EventFinder, SearchError, StationKind};
use rstest::rstest;

fn oscillating() -> Track {
    Track {
        l0: 100.0,
        rate: 0.2,
        amplitude: 3.0,
        omega: 0.05,
    }
}

/// Speed 0.3 + 0.5 cos(2π τ / 100), so the body loops every 100 days
fn looping() -> Track {
    let omega = std::f64::consts::TAU / 100.0;
    Track {
        l0: 200.0,
        rate: 0.3,
        amplitude: 0.5 / omega,
        omega,
    }
}

#[rstest]
#[case(110.0)]
#[case(130.0)]
#[case(150.0)]
fn test_bracket_contains_analytic_crossing(#[case] target: f64) {
    let track = oscillating();
    let eph = CountingEphemeris::new().with(Body::Jupiter, track);
    let finder = EventFinder::new(eph, &CacheManager::default());
    let t = finder
        .next_longitude_transit(Body::Jupiter, T0, target, None)
        .unwrap()
        .unwrap();

    println!("Transit to {}° at T0 + {:.6}", target, t - T0);
    assert!(closest_distance(target, track.longitude(t)).abs() <= 0.001);
    assert!(closest_distance(target, track.longitude(t - 0.01)) < 0.0);
    assert!(closest_distance(target, track.longitude(t + 0.01)) > 0.0);
}

#[test]
fn test_wraparound_both_directions() {
    let eph = CountingEphemeris::new()
        .with(Body::Mars, Track::linear(355.0, 1.0))
        .with(Body::Venus, Track::linear(5.0, 1.0));
    let finder = EventFinder::new(eph, &CacheManager::default());

    let t = finder.next_longitude_transit(Body::Mars, T0, 5.0, None).unwrap().unwrap();
    assert_abs_diff_eq!(t, T0 + 10.0, epsilon = 0.001);

    let t = finder.last_longitude_transit(Body::Venus, T0, 350.0, None).unwrap().unwrap();
    assert_abs_diff_eq!(t, T0 - 15.0, epsilon = 0.001);
}

#[test]
fn test_station_kinds_alternate() {
    let track = looping();
    let eph = CountingEphemeris::new().with(Body::Mars, track);
    let finder = EventFinder::new(eph, &CacheManager::default());
    let stations = finder.stations_between(Body::Mars, T0, T0 + 300.0).unwrap();
    assert_eq!(stations.len(), 6);

    for station in &stations {
        let before = track.speed(station.jd - 0.01);
        let after = track.speed(station.jd + 0.01);
        match station.kind {
            StationKind::Retrograde => assert!(before > 0.0 && after < 0.0),
            StationKind::Direct => assert!(before < 0.0 && after > 0.0),
        }
    }

    let first = finder.next_station(Body::Mars, T0).unwrap().unwrap();
    assert_eq!(first.kind.to_string(), "R");
    assert_abs_diff_eq!(first.jd, stations[0].jd, epsilon = 0.002);
}

#[test]
fn test_aspect_orb_then_exact() {
    let eph = CountingEphemeris::new()
        .with(Body::Mars, Track::linear(0.0, 0.6))
        .with(Body::Saturn, Track::linear(40.0, 0.1));
    let finder = EventFinder::new(eph, &CacheManager::default());

    let entry = finder
        .next_aspect_transit(Body::Mars, Body::Saturn, T0, 0.0, 8.0, None)
        .unwrap()
        .unwrap();
    assert_abs_diff_eq!(entry, T0 + 64.0, epsilon = 0.01);

    // inside the orb and approaching: the exact conjunction comes next
    let exact = finder
        .next_aspect_transit(Body::Mars, Body::Saturn, entry + 1.0, 0.0, 8.0, None)
        .unwrap()
        .unwrap();
    assert_abs_diff_eq!(exact, T0 + 80.0, epsilon = 0.01);
}

#[test]
fn test_missing_body_fails_on_first_sample() {
    let finder = EventFinder::new(CountingEphemeris::new(), &CacheManager::default());
    let result = finder.next_sign_transit(Body::Neptune, T0, 1, None);
    assert!(matches!(result, Err(SearchError::Lookup(_))));
}

#[test]
fn test_repeated_search_served_from_cache() {
    let cache = CacheManager::default();
    let eph = CountingEphemeris::new().with(Body::Mars, Track::linear(0.0, 1.0));
    let finder = EventFinder::new(eph, &cache);

    let first = finder.next_longitude_transit(Body::Mars, T0, 10.5, None).unwrap();
    let calls = finder.ephemeris().inner().calls();
    assert!(calls > 0);
    assert!(cache.len(Category::Ephemeris) <= cache.capacity(Category::Ephemeris));

    let second = finder.next_longitude_transit(Body::Mars, T0, 10.5, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(finder.ephemeris().inner().calls(), calls);
}

#[test]
fn test_disabled_cache_gives_identical_results() {
    let track = oscillating();
    let eph = CountingEphemeris::new().with(Body::Jupiter, track);
    let enabled = EventFinder::new(eph, &CacheManager::default());
    let cache = CacheManager::new(&CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    });
    let disabled = EventFinder::new(CountingEphemeris::new().with(Body::Jupiter, track), &cache);

    let a = enabled.next_longitude_transit(Body::Jupiter, T0, 125.0, None).unwrap();
    let b = disabled.next_longitude_transit(Body::Jupiter, T0, 125.0, None).unwrap();
    assert_eq!(a, b);

    let calls = disabled.ephemeris().inner().calls();
    disabled.next_longitude_transit(Body::Jupiter, T0, 125.0, None).unwrap();
    assert_eq!(disabled.ephemeris().inner().calls(), 2 * calls);
    assert!(cache.is_empty());
}
