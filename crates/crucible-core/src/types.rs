//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// Geodetic position on the WGS84 ellipsoid.
/// Latitude/longitude in radians, altitude in meters above the ellipsoid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl Geodetic {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Construct from degrees (scenario data is authored in degrees).
    pub fn from_degrees(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat: lat_deg.to_radians(),
            lon: lon_deg.to_radians(),
            alt: alt_m,
        }
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }
}

/// Team/faction tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
    #[default]
    Neutral,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
            Team::Neutral => "neutral",
        }
    }

    /// Whether `other` is a valid sensing/engagement candidate for this team.
    pub fn is_hostile_to(&self, other: Team) -> bool {
        match (self, other) {
            (Team::Blue, Team::Red) | (Team::Red, Team::Blue) => true,
            _ => false,
        }
    }
}

/// Simulation time tracking at a fixed tick size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
    /// Seconds per tick.
    pub dt: f64,
}

impl SimTime {
    pub fn new(dt: f64) -> Self {
        Self {
            tick: 0,
            elapsed_secs: 0.0,
            dt,
        }
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt;
    }
}
