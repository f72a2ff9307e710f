//! US Standard Atmosphere 1976.
//!
//! Seven gradient/isothermal layers up to 84.852 km geopotential altitude,
//! with an exponential-density extension above. Layer base pressures are
//! derived from the layer table by integrating upward from sea level.

use crucible_core::constants::G0;

/// Specific gas constant for air (J/(kg·K)).
pub const R_AIR: f64 = 287.058;

/// Ratio of specific heats for air.
pub const GAMMA_AIR: f64 = 1.4;

/// Sea-level temperature (K), pressure (Pa), density (kg/m³).
pub const T0: f64 = 288.15;
pub const P0: f64 = 101_325.0;
pub const RHO0: f64 = 1.225;

/// Geopotential earth radius (m).
const R_GEOPOTENTIAL: f64 = 6_356_766.0;

/// Top of the standard atmosphere (geopotential, m) and its temperature (K).
const H_TOP: f64 = 84_852.0;
const T_TOP: f64 = 186.946;

/// Density scale height for the exponential extension (m).
const SCALE_HEIGHT: f64 = 8_500.0;

const NUM_LAYERS: usize = 7;

/// Layer base geopotential altitudes (m).
const LAYER_H: [f64; NUM_LAYERS] = [
    0.0, 11_000.0, 20_000.0, 32_000.0, 47_000.0, 51_000.0, 71_000.0,
];

/// Layer base temperatures (K).
const LAYER_T: [f64; NUM_LAYERS] = [288.15, 216.65, 216.65, 228.65, 270.65, 270.65, 214.65];

/// Layer temperature lapse rates (K/m).
const LAYER_LAPSE: [f64; NUM_LAYERS] = [-0.0065, 0.0, 0.001, 0.0028, 0.0, -0.0028, -0.002];

/// Atmosphere state at a queried altitude.
#[derive(Debug, Clone, Copy)]
pub struct Atmosphere {
    /// Temperature (K).
    pub temperature: f64,
    /// Pressure (Pa).
    pub pressure: f64,
    /// Density (kg/m³).
    pub density: f64,
    /// Speed of sound (m/s).
    pub speed_of_sound: f64,
}

/// Pressure at the base of each layer, from integrating the layer table.
fn layer_base_pressures() -> [f64; NUM_LAYERS] {
    let mut p = [P0; NUM_LAYERS];
    let mut i = 1;
    while i < NUM_LAYERS {
        let dh = LAYER_H[i] - LAYER_H[i - 1];
        let lapse = LAYER_LAPSE[i - 1];
        let tb = LAYER_T[i - 1];
        p[i] = if lapse.abs() < 1e-12 {
            p[i - 1] * (-G0 * dh / (R_AIR * tb)).exp()
        } else {
            p[i - 1] * (LAYER_T[i] / tb).powf(-G0 / (lapse * R_AIR))
        };
        i += 1;
    }
    p
}

/// Geometric altitude above MSL → geopotential altitude.
fn geometric_to_geopotential(h: f64) -> f64 {
    R_GEOPOTENTIAL * h / (R_GEOPOTENTIAL + h)
}

/// Query the standard atmosphere at a geometric altitude (m above MSL).
pub fn atmosphere_at(altitude_m: f64) -> Atmosphere {
    if altitude_m <= 0.0 {
        return Atmosphere {
            temperature: T0,
            pressure: P0,
            density: RHO0,
            speed_of_sound: (GAMMA_AIR * R_AIR * T0).sqrt(),
        };
    }

    let base = layer_base_pressures();
    let h = geometric_to_geopotential(altitude_m);

    if h >= H_TOP {
        // Exponential extension above the table.
        let dh_top = H_TOP - LAYER_H[6];
        let lapse = LAYER_LAPSE[6];
        let t_at_top = LAYER_T[6] + lapse * dh_top;
        let p_top = base[6] * (t_at_top / LAYER_T[6]).powf(-G0 / (lapse * R_AIR));
        let rho_top = p_top / (R_AIR * T_TOP);

        let rho = rho_top * (-(h - H_TOP) / SCALE_HEIGHT).exp();
        return Atmosphere {
            temperature: T_TOP,
            pressure: rho * R_AIR * T_TOP,
            density: rho,
            speed_of_sound: (GAMMA_AIR * R_AIR * T_TOP).sqrt(),
        };
    }

    let mut layer = 0;
    for i in (0..NUM_LAYERS).rev() {
        if h >= LAYER_H[i] {
            layer = i;
            break;
        }
    }

    let dh = h - LAYER_H[layer];
    let lapse = LAYER_LAPSE[layer];
    let tb = LAYER_T[layer];
    let pb = base[layer];

    let t = tb + lapse * dh;
    let p = if lapse.abs() < 1e-12 {
        pb * (-G0 * dh / (R_AIR * tb)).exp()
    } else {
        pb * (t / tb).powf(-G0 / (lapse * R_AIR))
    };
    let rho = p / (R_AIR * t);

    Atmosphere {
        temperature: t,
        pressure: p,
        density: rho,
        speed_of_sound: (GAMMA_AIR * R_AIR * t).sqrt(),
    }
}
