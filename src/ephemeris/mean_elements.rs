//! Low-precision analytic ephemeris from mean orbital elements
//!
//! Positions come from Keplerian elements with secular rates (epoch
//! 1999-12-31 0h), the largest lunar and Jupiter/Saturn/Uranus perturbations,
//! and longitudes referred to the equinox of date. Accuracy is of the order of
//! an arc-minute for the Sun, Moon and inner planets, ample for event timing
//! tests and demonstrations. Speeds are central differences of the apparent
//! coordinates so they always match what a search samples.

use nalgebra::{Rotation3, Vector3};

use super::houses::{greenwich_sidereal_degrees, mean_obliquity};
use super::{
    compute_houses, Body, BodyState, Ephemeris, EphemerisError, HouseSystem, Houses, Location,
    Result, SiderealMode,
};
use crate::angle::{closest_distance, normalize};
use crate::constants::{
    DAYS_PER_CENTURY, DEG2RAD, EARTH_RADIUS_KM, ELEMENTS_EPOCH, J2000, PRECESSION_PER_CENTURY,
    RAD2DEG,
};

/// Astronomical unit in kilometers
const AU_KM: f64 = 149_597_870.7;
/// Half-width of the supported time span around J2000, in days
const VALID_HALF_SPAN_DAYS: f64 = 3000.0 * 365.25;
/// Half-step of the central difference used for speeds, in days
const SPEED_STEP_DAYS: f64 = 0.01;
const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 30;

/// Keplerian elements, angles in degrees
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    node: f64,
    inclination: f64,
    perihelion: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    mean_anomaly: f64,
}

impl OrbitalElements {
    /// Position in the ecliptic frame, in units of the semi-major axis
    fn position(&self) -> Vector3<f64> {
        let e = self.eccentricity;
        let ecc_anomaly = solve_kepler(normalize(self.mean_anomaly) * DEG2RAD, e);
        let a = self.semi_major_axis;
        let in_plane = Vector3::new(
            a * (ecc_anomaly.cos() - e),
            a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
            0.0,
        );
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), self.node * DEG2RAD)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination * DEG2RAD)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.perihelion * DEG2RAD);
        rotation * in_plane
    }
}

/// Solve Kepler's equation `E - e sin E = M` by Newton iteration (radians)
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let m = mean_anomaly;
    let mut ecc = m + e * m.sin() * (1.0 + e * m.cos());
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ecc
}

fn to_spherical(v: &Vector3<f64>) -> (f64, f64, f64) {
    let r = v.norm();
    let lon = normalize(v.y.atan2(v.x) * RAD2DEG);
    let lat = v.z.atan2((v.x * v.x + v.y * v.y).sqrt()) * RAD2DEG;
    (lon, lat, r)
}

fn from_spherical(lon: f64, lat: f64, r: f64) -> Vector3<f64> {
    let (lon, lat) = (lon * DEG2RAD, lat * DEG2RAD);
    Vector3::new(
        r * lat.cos() * lon.cos(),
        r * lat.cos() * lon.sin(),
        r * lat.sin(),
    )
}

fn sin_deg(x: f64) -> f64 {
    (x * DEG2RAD).sin()
}

fn cos_deg(x: f64) -> f64 {
    (x * DEG2RAD).cos()
}

/// Apparent orbit of the Sun around the Earth
fn sun_elements(d: f64) -> OrbitalElements {
    OrbitalElements {
        node: 0.0,
        inclination: 0.0,
        perihelion: 282.9404 + 4.709_35e-5 * d,
        semi_major_axis: 1.0,
        eccentricity: 0.016_709 - 1.151e-9 * d,
        mean_anomaly: 356.0470 + 0.985_600_258_5 * d,
    }
}

/// Lunar elements; the semi-major axis is in Earth radii
fn moon_elements(d: f64) -> OrbitalElements {
    OrbitalElements {
        node: 125.1228 - 0.052_953_808_3 * d,
        inclination: 5.1454,
        perihelion: 318.0634 + 0.164_357_322_3 * d,
        semi_major_axis: 60.2666,
        eccentricity: 0.054_900,
        mean_anomaly: 115.3654 + 13.064_992_950_9 * d,
    }
}

/// Heliocentric elements of the planets
fn planet_elements(body: Body, d: f64) -> Option<OrbitalElements> {
    let elements = match body {
        Body::Mercury => OrbitalElements {
            node: 48.3313 + 3.245_87e-5 * d,
            inclination: 7.0047 + 5.00e-8 * d,
            perihelion: 29.1241 + 1.014_44e-5 * d,
            semi_major_axis: 0.387_098,
            eccentricity: 0.205_635 + 5.59e-10 * d,
            mean_anomaly: 168.6562 + 4.092_334_436_8 * d,
        },
        Body::Venus => OrbitalElements {
            node: 76.6799 + 2.465_90e-5 * d,
            inclination: 3.3946 + 2.75e-8 * d,
            perihelion: 54.8910 + 1.383_74e-5 * d,
            semi_major_axis: 0.723_330,
            eccentricity: 0.006_773 - 1.302e-9 * d,
            mean_anomaly: 48.0052 + 1.602_130_224_4 * d,
        },
        Body::Mars => OrbitalElements {
            node: 49.5574 + 2.110_81e-5 * d,
            inclination: 1.8497 - 1.78e-8 * d,
            perihelion: 286.5016 + 2.929_61e-5 * d,
            semi_major_axis: 1.523_688,
            eccentricity: 0.093_405 + 2.516e-9 * d,
            mean_anomaly: 18.6021 + 0.524_020_776_6 * d,
        },
        Body::Jupiter => OrbitalElements {
            node: 100.4542 + 2.768_54e-5 * d,
            inclination: 1.3030 - 1.557e-7 * d,
            perihelion: 273.8777 + 1.645_05e-5 * d,
            semi_major_axis: 5.202_56,
            eccentricity: 0.048_498 + 4.469e-9 * d,
            mean_anomaly: 19.8950 + 0.083_085_300_1 * d,
        },
        Body::Saturn => OrbitalElements {
            node: 113.6634 + 2.389_80e-5 * d,
            inclination: 2.4886 - 1.081e-7 * d,
            perihelion: 339.3939 + 2.976_61e-5 * d,
            semi_major_axis: 9.554_75,
            eccentricity: 0.055_546 - 9.499e-9 * d,
            mean_anomaly: 316.9670 + 0.033_444_228_2 * d,
        },
        Body::Uranus => OrbitalElements {
            node: 74.0005 + 1.3978e-5 * d,
            inclination: 0.7733 + 1.9e-8 * d,
            perihelion: 96.6612 + 3.0565e-5 * d,
            semi_major_axis: 19.181_71 - 1.55e-8 * d,
            eccentricity: 0.047_318 + 7.45e-9 * d,
            mean_anomaly: 142.5905 + 0.011_725_806 * d,
        },
        Body::Neptune => OrbitalElements {
            node: 131.7806 + 3.0173e-5 * d,
            inclination: 1.7700 - 2.55e-7 * d,
            perihelion: 272.8461 - 6.027e-6 * d,
            semi_major_axis: 30.058_26 + 3.313e-8 * d,
            eccentricity: 0.008_606 + 2.15e-9 * d,
            mean_anomaly: 260.2471 + 0.005_995_147 * d,
        },
        Body::Pluto => {
            // J2000 elements, node carried to the equinox of date
            let t = d - (J2000 - ELEMENTS_EPOCH);
            OrbitalElements {
                node: 110.303_937 + PRECESSION_PER_CENTURY * t / DAYS_PER_CENTURY,
                inclination: 17.140_012,
                perihelion: 113.764_979,
                semi_major_axis: 39.482_117,
                eccentricity: 0.248_827,
                mean_anomaly: 14.860_122 + 0.003_975_51 * t,
            }
        }
        _ => return None,
    };
    Some(elements)
}

/// Heliocentric longitude and latitude corrections for the giant planets
fn giant_planet_perturbation(body: Body, d: f64) -> (f64, f64) {
    let mj = 19.8950 + 0.083_085_300_1 * d;
    let ms = 316.9670 + 0.033_444_228_2 * d;
    let mu = 142.5905 + 0.011_725_806 * d;
    match body {
        Body::Jupiter => (
            -0.332 * sin_deg(2.0 * mj - 5.0 * ms - 67.6)
                - 0.056 * sin_deg(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sin_deg(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sin_deg(mj - 2.0 * ms)
                + 0.022 * cos_deg(mj - ms)
                + 0.023 * sin_deg(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sin_deg(mj - 5.0 * ms - 69.0),
            0.0,
        ),
        Body::Saturn => (
            0.812 * sin_deg(2.0 * mj - 5.0 * ms - 67.6)
                - 0.229 * cos_deg(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sin_deg(mj - 2.0 * ms - 3.0)
                + 0.046 * sin_deg(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sin_deg(mj - 3.0 * ms + 32.0),
            -0.020 * cos_deg(2.0 * mj - 4.0 * ms - 2.0)
                + 0.018 * sin_deg(2.0 * mj - 6.0 * ms - 49.0),
        ),
        Body::Uranus => (
            0.040 * sin_deg(ms - 2.0 * mu + 6.0)
                + 0.035 * sin_deg(ms - 3.0 * mu + 33.0)
                - 0.015 * sin_deg(mj - mu + 20.0),
            0.0,
        ),
        _ => (0.0, 0.0),
    }
}

/// Geocentric Sun vector in AU
fn sun_vector(d: f64) -> Vector3<f64> {
    sun_elements(d).position()
}

/// Geocentric Moon vector in kilometers
fn moon_vector(d: f64) -> Vector3<f64> {
    let moon = moon_elements(d);
    let sun = sun_elements(d);
    let (lon, lat, r) = to_spherical(&moon.position());

    let mm = moon.mean_anomaly;
    let ms = sun.mean_anomaly;
    let moon_mean_lon = mm + moon.perihelion + moon.node;
    let sun_mean_lon = ms + sun.perihelion;
    let elong = moon_mean_lon - sun_mean_lon;
    let arg_lat = moon_mean_lon - moon.node;

    let dlon = -1.274 * sin_deg(mm - 2.0 * elong)
        + 0.658 * sin_deg(2.0 * elong)
        - 0.186 * sin_deg(ms)
        - 0.059 * sin_deg(2.0 * mm - 2.0 * elong)
        - 0.057 * sin_deg(mm - 2.0 * elong + ms)
        + 0.053 * sin_deg(mm + 2.0 * elong)
        + 0.046 * sin_deg(2.0 * elong - ms)
        + 0.041 * sin_deg(mm - ms)
        - 0.035 * sin_deg(elong)
        - 0.031 * sin_deg(mm + ms)
        - 0.015 * sin_deg(2.0 * arg_lat - 2.0 * elong)
        + 0.011 * sin_deg(mm - 4.0 * elong);
    let dlat = -0.173 * sin_deg(arg_lat - 2.0 * elong)
        - 0.055 * sin_deg(mm - arg_lat - 2.0 * elong)
        - 0.046 * sin_deg(mm + arg_lat - 2.0 * elong)
        + 0.033 * sin_deg(arg_lat + 2.0 * elong)
        + 0.017 * sin_deg(2.0 * mm + arg_lat);
    let dr = -0.58 * cos_deg(mm - 2.0 * elong) - 0.46 * cos_deg(2.0 * elong);

    from_spherical(lon + dlon, lat + dlat, (r + dr) * EARTH_RADIUS_KM)
}

/// Geocentric planet vector in kilometers
fn planet_vector(body: Body, d: f64) -> Option<Vector3<f64>> {
    let elements = planet_elements(body, d)?;
    let (lon, lat, r) = to_spherical(&elements.position());
    let (dlon, dlat) = giant_planet_perturbation(body, d);
    let heliocentric = from_spherical(lon + dlon, lat + dlat, r);
    Some((heliocentric + sun_vector(d)) * AU_KM)
}

/// Observer position relative to the geocenter in ecliptic kilometers
fn observer_vector(location: &Location, jd: f64) -> Vector3<f64> {
    let lst = (greenwich_sidereal_degrees(jd) + location.longitude) * DEG2RAD;
    let phi = location.latitude * DEG2RAD;
    let rho = EARTH_RADIUS_KM + location.altitude / 1000.0;
    let equatorial = Vector3::new(
        rho * phi.cos() * lst.cos(),
        rho * phi.cos() * lst.sin(),
        rho * phi.sin(),
    );
    Rotation3::from_axis_angle(&Vector3::x_axis(), -mean_obliquity(jd) * DEG2RAD) * equatorial
}

/// Mean longitude of the ascending lunar node
fn mean_node(d: f64) -> f64 {
    normalize(moon_elements(d).node)
}

/// Analytic ephemeris valid for 3000 years either side of J2000.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementsEphemeris;

impl MeanElementsEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// First Julian day this ephemeris answers for
    pub fn start_jd(&self) -> f64 {
        J2000 - VALID_HALF_SPAN_DAYS
    }

    /// Last Julian day this ephemeris answers for
    pub fn end_jd(&self) -> f64 {
        J2000 + VALID_HALF_SPAN_DAYS
    }

    fn check_time(&self, jd: f64) -> Result<()> {
        if !jd.is_finite() {
            return Err(EphemerisError::InvalidTime(jd));
        }
        if jd < self.start_jd() || jd > self.end_jd() {
            return Err(EphemerisError::OutOfRange {
                jd,
                start_jd: self.start_jd(),
                end_jd: self.end_jd(),
            });
        }
        Ok(())
    }

    /// Apparent ecliptic longitude and latitude without speeds
    fn apparent(
        &self,
        body: Body,
        jd: f64,
        location: Option<&Location>,
        mode: Option<SiderealMode>,
    ) -> Result<(f64, f64)> {
        let d = jd - ELEMENTS_EPOCH;
        let geocentric = match body {
            Body::Earth => return Err(EphemerisError::UnsupportedBody(body)),
            Body::NorthNode | Body::SouthNode => {
                let mut lon = mean_node(d);
                if body == Body::SouthNode {
                    lon += 180.0;
                }
                return Ok((apply_mode(lon, jd, mode), 0.0));
            }
            Body::Sun => sun_vector(d) * AU_KM,
            Body::Moon => moon_vector(d),
            _ => planet_vector(body, d).ok_or(EphemerisError::UnsupportedBody(body))?,
        };

        let vector = match location {
            Some(location) => geocentric - observer_vector(location, jd),
            None => geocentric,
        };
        let (lon, lat, _) = to_spherical(&vector);
        Ok((apply_mode(lon, jd, mode), lat))
    }
}

fn apply_mode(lon: f64, jd: f64, mode: Option<SiderealMode>) -> f64 {
    match mode {
        Some(mode) => normalize(lon - mode.ayanamsa(jd)),
        None => normalize(lon),
    }
}

impl Ephemeris for MeanElementsEphemeris {
    fn position(
        &self,
        body: Body,
        jd: f64,
        location: Option<Location>,
        mode: Option<SiderealMode>,
    ) -> Result<BodyState> {
        self.check_time(jd)?;
        if let Some(location) = &location {
            location.validate()?;
        }
        let location = location.as_ref();

        let (lon, lat) = self.apparent(body, jd, location, mode)?;
        let (lon_before, lat_before) = self.apparent(body, jd - SPEED_STEP_DAYS, location, mode)?;
        let (lon_after, lat_after) = self.apparent(body, jd + SPEED_STEP_DAYS, location, mode)?;

        Ok(BodyState {
            longitude: lon,
            latitude: lat,
            longitude_speed: closest_distance(lon_before, lon_after) / (2.0 * SPEED_STEP_DAYS),
            latitude_speed: (lat_after - lat_before) / (2.0 * SPEED_STEP_DAYS),
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
        self.check_time(jd)?;
        compute_houses(jd, latitude, longitude, system, mode)
    }
}
