//! Great-circle and ellipsoid geodesy. All angles in radians.

use glam::DVec3;
use std::f64::consts::{PI, TAU};

use crucible_core::constants::{R_EARTH_MEAN, WGS84_A, WGS84_E2};
use crucible_core::types::Geodetic;

/// Convert a geodetic position to ECEF (meters).
pub fn geodetic_to_ecef(geo: &Geodetic) -> DVec3 {
    let sin_lat = geo.lat.sin();
    let cos_lat = geo.lat.cos();
    let sin_lon = geo.lon.sin();
    let cos_lon = geo.lon.cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    DVec3::new(
        (n + geo.alt) * cos_lat * cos_lon,
        (n + geo.alt) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + geo.alt) * sin_lat,
    )
}

/// Spherical-approximation ECEF → geodetic, used to resync the derived
/// geodetic position of orbital entities. Good to a few kilometers at
/// orbital altitudes, which is all the sensor/weapon range checks need.
pub fn ecef_to_geodetic(ecef: DVec3) -> Geodetic {
    let r = ecef.length();
    if r < 1.0 {
        return Geodetic::default();
    }
    Geodetic {
        lat: (ecef.z / r).asin(),
        lon: ecef.y.atan2(ecef.x),
        alt: r - R_EARTH_MEAN,
    }
}

/// Haversine great-circle distance between two points (meters, on the
/// mean-radius sphere). Ignores altitude.
pub fn haversine_distance(a: &Geodetic, b: &Geodetic) -> f64 {
    let dlat = b.lat - a.lat;
    let dlon = b.lon - a.lon;

    let h = (dlat * 0.5).sin().powi(2) + a.lat.cos() * b.lat.cos() * (dlon * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    R_EARTH_MEAN * c
}

/// Initial great-circle bearing from `a` to `b`, in [0, 2π) from north.
pub fn great_circle_bearing(a: &Geodetic, b: &Geodetic) -> f64 {
    let dlon = b.lon - a.lon;
    let y = dlon.sin() * b.lat.cos();
    let x = a.lat.cos() * b.lat.sin() - a.lat.sin() * b.lat.cos() * dlon.cos();
    y.atan2(x).rem_euclid(TAU)
}

/// Destination point after traveling `distance` meters from `start` on the
/// initial bearing. Altitude is carried through unchanged.
pub fn destination_point(start: &Geodetic, bearing: f64, distance: f64) -> Geodetic {
    let delta = distance / R_EARTH_MEAN;

    let sin_lat = start.lat.sin();
    let cos_lat = start.lat.cos();
    let (sin_d, cos_d) = delta.sin_cos();

    let lat2 = (sin_lat * cos_d + cos_lat * sin_d * bearing.cos()).asin();
    let lon2 = start.lon
        + (bearing.sin() * sin_d * cos_lat).atan2(cos_d - sin_lat * lat2.sin());

    Geodetic {
        lat: lat2,
        lon: lon2,
        alt: start.alt,
    }
}

/// Shortest signed angular difference `a − b`, in [−π, π].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut d = a - b;
    while d > PI {
        d -= TAU;
    }
    while d < -PI {
        d += TAU;
    }
    d
}

/// Euclidean slant range between two geodetic points via ECEF (meters).
pub fn slant_range(a: &Geodetic, b: &Geodetic) -> f64 {
    geodetic_to_ecef(a).distance(geodetic_to_ecef(b))
}

/// Elevation angle from observer `a` looking toward target `b` (radians).
pub fn elevation_angle(a: &Geodetic, b: &Geodetic) -> f64 {
    let ground = haversine_distance(a, b);
    let dalt = b.alt - a.alt;
    if ground < 1.0 {
        return if dalt > 0.0 { PI / 2.0 } else { -PI / 2.0 };
    }
    dalt.atan2(ground)
}
