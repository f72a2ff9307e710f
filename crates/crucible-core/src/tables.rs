//! Static scenario tables: aircraft performance presets and air-to-air
//! missile class presets.
//!
//! Immutable, process-wide, initialized at compile time and indexed by class
//! name. Unknown names fall back to a sensible default so a typo in scenario
//! data degrades rather than aborts.

use serde::{Deserialize, Serialize};

use crate::entity::MissileClass;
use crate::enums::Seeker;

/// Aircraft aerodynamic, propulsion, and performance configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AircraftConfig {
    /// Loaded mass (kg).
    pub mass: f64,
    /// Wing reference area (m²).
    pub wing_area: f64,
    pub aspect_ratio: f64,
    /// Zero-lift drag coefficient.
    pub cd0: f64,
    /// Oswald efficiency factor.
    pub oswald: f64,
    /// Lift curve slope (per radian).
    pub cl_alpha: f64,
    pub cl_max: f64,
    /// Military thrust (N).
    pub thrust_mil: f64,
    /// Afterburner thrust (N).
    pub thrust_ab: f64,
    /// Maximum angle of attack (radians).
    pub max_aoa: f64,
}

pub const F16: AircraftConfig = AircraftConfig {
    mass: 12_000.0,
    wing_area: 27.87,
    aspect_ratio: 3.55,
    cd0: 0.0175,
    oswald: 0.85,
    cl_alpha: 4.6,
    cl_max: 1.6,
    thrust_mil: 79_000.0,
    thrust_ab: 127_000.0,
    max_aoa: 25.0 * std::f64::consts::PI / 180.0,
};

pub const MIG29: AircraftConfig = AircraftConfig {
    mass: 15_000.0,
    wing_area: 38.0,
    aspect_ratio: 3.5,
    cd0: 0.020,
    oswald: 0.82,
    cl_alpha: 4.3,
    cl_max: 1.4,
    thrust_mil: 81_000.0,
    thrust_ab: 110_000.0,
    max_aoa: 28.0 * std::f64::consts::PI / 180.0,
};

pub const F15: AircraftConfig = AircraftConfig {
    mass: 24_500.0,
    wing_area: 56.5,
    aspect_ratio: 3.0,
    cd0: 0.019,
    oswald: 0.82,
    cl_alpha: 4.3,
    cl_max: 1.5,
    thrust_mil: 130_000.0,
    thrust_ab: 210_000.0,
    max_aoa: 30.0 * std::f64::consts::PI / 180.0,
};

pub const SU27: AircraftConfig = AircraftConfig {
    mass: 23_430.0,
    wing_area: 62.0,
    aspect_ratio: 3.5,
    cd0: 0.021,
    oswald: 0.82,
    cl_alpha: 4.3,
    cl_max: 1.5,
    thrust_mil: 152_000.0,
    thrust_ab: 245_000.0,
    max_aoa: 30.0 * std::f64::consts::PI / 180.0,
};

pub const AWACS: AircraftConfig = AircraftConfig {
    mass: 147_000.0,
    wing_area: 283.0,
    aspect_ratio: 7.7,
    cd0: 0.030,
    oswald: 0.80,
    cl_alpha: 3.4,
    cl_max: 1.4,
    thrust_mil: 372_000.0,
    thrust_ab: 372_000.0,
    max_aoa: 14.0 * std::f64::consts::PI / 180.0,
};

/// Look up an aircraft class by lowercase name. Unknown names get the F16.
pub fn aircraft_config(name: &str) -> &'static AircraftConfig {
    match name {
        "f16" => &F16,
        "mig29" => &MIG29,
        "f15" => &F15,
        "su27" => &SU27,
        "awacs" => &AWACS,
        _ => &F16,
    }
}

/// Build a missile class by name with the given round count. Unknown names
/// get a conservative medium-range radar shot.
pub fn missile_class(name: &str, rounds: u32) -> MissileClass {
    let (seeker, min_range, max_range, pk, speed) = match name {
        "aim120" => (Seeker::ActiveRadar, 1_000.0, 80_000.0, 0.75, 1_400.0),
        "aim9" => (Seeker::Infrared, 300.0, 18_000.0, 0.85, 900.0),
        "r77" => (Seeker::ActiveRadar, 1_000.0, 80_000.0, 0.70, 1_300.0),
        "r73" => (Seeker::Infrared, 300.0, 18_000.0, 0.80, 850.0),
        _ => (Seeker::ActiveRadar, 1_000.0, 50_000.0, 0.60, 1_000.0),
    };
    MissileClass {
        name: name.to_owned(),
        seeker,
        min_range,
        max_range,
        pk,
        speed,
        rounds,
    }
}

/// Standard western fighter loadout: 4 medium-range + 2 short-range.
pub fn default_loadout_west() -> Vec<MissileClass> {
    vec![missile_class("aim120", 4), missile_class("aim9", 2)]
}

/// Standard eastern fighter loadout: 4 medium-range + 2 short-range.
pub fn default_loadout_east() -> Vec<MissileClass> {
    vec![missile_class("r77", 4), missile_class("r73", 2)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_classes() {
        assert_eq!(aircraft_config("su27").mass, 23_430.0);
        assert_eq!(aircraft_config("awacs").wing_area, 283.0);
    }

    #[test]
    fn test_unknown_class_falls_back() {
        let cfg = aircraft_config("nonexistent");
        assert_eq!(cfg.mass, F16.mass);
    }

    #[test]
    fn test_missile_class_envelopes() {
        let amraam = missile_class("aim120", 4);
        let sidewinder = missile_class("aim9", 2);
        assert!(amraam.max_range > sidewinder.max_range);
        assert!(amraam.lock_time() < sidewinder.lock_time());
    }
}
