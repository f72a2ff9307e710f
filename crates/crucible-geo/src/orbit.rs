//! Two-body orbital mechanics: classical elements, Kepler's equation, and
//! analytic propagation.
//!
//! Propagation is state → elements → advance mean anomaly → state, so no
//! numerical drift accumulates over long runs. Degenerate states (rectilinear,
//! hyperbolic, non-finite) fall back to linear propagation rather than
//! poisoning the rest of the tick with NaN.

use glam::DVec3;
use std::f64::consts::TAU;

use crucible_core::constants::MU_EARTH;

/// Classical orbital elements. Angles in radians.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_periapsis: f64,
    pub true_anomaly: f64,
    pub mean_anomaly: f64,
}

impl OrbitalElements {
    /// Mean motion (rad/s).
    pub fn mean_motion(&self) -> f64 {
        (MU_EARTH / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Orbital period (s).
    pub fn period(&self) -> f64 {
        TAU / self.mean_motion()
    }
}

/// Solve Kepler's equation M = E − e·sin E for the eccentric anomaly by
/// Newton-Raphson.
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc_anomaly = mean_anomaly;
    for _ in 0..50 {
        let f = ecc_anomaly - e * ecc_anomaly.sin() - mean_anomaly;
        let fp = 1.0 - e * ecc_anomaly.cos();
        let delta = f / fp;
        ecc_anomaly -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc_anomaly
}

pub fn true_to_eccentric_anomaly(nu: f64, e: f64) -> f64 {
    2.0 * ((1.0 - e).sqrt() * (nu / 2.0).sin()).atan2((1.0 + e).sqrt() * (nu / 2.0).cos())
}

pub fn eccentric_to_true_anomaly(ecc_anomaly: f64, e: f64) -> f64 {
    2.0 * ((1.0 + e).sqrt() * (ecc_anomaly / 2.0).sin())
        .atan2((1.0 - e).sqrt() * (ecc_anomaly / 2.0).cos())
}

pub fn true_to_mean_anomaly(nu: f64, e: f64) -> f64 {
    let ecc_anomaly = true_to_eccentric_anomaly(nu, e);
    (ecc_anomaly - e * ecc_anomaly.sin()).rem_euclid(TAU)
}

pub fn mean_to_true_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    eccentric_to_true_anomaly(solve_kepler(mean_anomaly, e), e)
}

/// Convert classical elements to an ECI state vector (uses `true_anomaly`).
pub fn elements_to_state(elem: &OrbitalElements) -> (DVec3, DVec3) {
    let a = elem.semi_major_axis;
    let e = elem.eccentricity;
    let nu = elem.true_anomaly;

    // Perifocal position and velocity.
    let p = a * (1.0 - e * e);
    let r = p / (1.0 + e * nu.cos());
    let x_pf = r * nu.cos();
    let y_pf = r * nu.sin();

    let h = (MU_EARTH * p).sqrt();
    let vx_pf = -MU_EARTH / h * nu.sin();
    let vy_pf = MU_EARTH / h * (e + nu.cos());

    // Perifocal → ECI rotation: R3(−Ω) · R1(−i) · R3(−ω).
    let (sin_raan, cos_raan) = elem.raan.sin_cos();
    let (sin_i, cos_i) = elem.inclination.sin_cos();
    let (sin_w, cos_w) = elem.arg_periapsis.sin_cos();

    let r11 = cos_raan * cos_w - sin_raan * sin_w * cos_i;
    let r12 = -cos_raan * sin_w - sin_raan * cos_w * cos_i;
    let r21 = sin_raan * cos_w + cos_raan * sin_w * cos_i;
    let r22 = -sin_raan * sin_w + cos_raan * cos_w * cos_i;
    let r31 = sin_w * sin_i;
    let r32 = cos_w * sin_i;

    let pos = DVec3::new(
        r11 * x_pf + r12 * y_pf,
        r21 * x_pf + r22 * y_pf,
        r31 * x_pf + r32 * y_pf,
    );
    let vel = DVec3::new(
        r11 * vx_pf + r12 * vy_pf,
        r21 * vx_pf + r22 * vy_pf,
        r31 * vx_pf + r32 * vy_pf,
    );
    (pos, vel)
}

/// Convert an ECI state vector to classical elements.
pub fn state_to_elements(pos: DVec3, vel: DVec3) -> OrbitalElements {
    let r_mag = pos.length();
    let v_mag = vel.length();

    let h = pos.cross(vel);
    let h_mag = h.length();

    // Node vector n = k × h.
    let n = DVec3::new(-h.y, h.x, 0.0);
    let n_mag = n.length();

    let rv_dot = pos.dot(vel);
    let e_vec = ((v_mag * v_mag - MU_EARTH / r_mag) * pos - rv_dot * vel) / MU_EARTH;
    let e = e_vec.length();

    let energy = v_mag * v_mag / 2.0 - MU_EARTH / r_mag;
    let a = if (e - 1.0).abs() > 1e-10 {
        -MU_EARTH / (2.0 * energy)
    } else {
        f64::INFINITY
    };

    let inc = (h.z / h_mag).acos();

    let raan = if n_mag > 1e-10 {
        let mut raan = (n.x / n_mag).acos();
        if n.y < 0.0 {
            raan = TAU - raan;
        }
        raan
    } else {
        0.0
    };

    let arg_pe = if n_mag > 1e-10 && e > 1e-10 {
        let mut w = (n.dot(e_vec) / (n_mag * e)).clamp(-1.0, 1.0).acos();
        if e_vec.z < 0.0 {
            w = TAU - w;
        }
        w
    } else if e > 1e-10 {
        e_vec.y.atan2(e_vec.x).rem_euclid(TAU)
    } else {
        0.0
    };

    let nu = if e > 1e-10 {
        let mut nu = (e_vec.dot(pos) / (e * r_mag)).clamp(-1.0, 1.0).acos();
        if rv_dot < 0.0 {
            nu = TAU - nu;
        }
        nu
    } else if n_mag > 1e-10 {
        let mut nu = (n.dot(pos) / (n_mag * r_mag)).clamp(-1.0, 1.0).acos();
        if pos.z < 0.0 {
            nu = TAU - nu;
        }
        nu
    } else {
        pos.y.atan2(pos.x).rem_euclid(TAU)
    };

    OrbitalElements {
        semi_major_axis: a,
        eccentricity: e,
        inclination: inc,
        raan,
        arg_periapsis: arg_pe,
        true_anomaly: nu,
        mean_anomaly: true_to_mean_anomaly(nu, e),
    }
}

/// Propagate an ECI state forward by `dt` seconds analytically.
/// Returns the input state advanced linearly when the orbit is degenerate.
pub fn propagate_two_body(pos: DVec3, vel: DVec3, dt: f64) -> (DVec3, DVec3) {
    let r_mag = pos.length();
    let v_mag = vel.length();

    if r_mag < 1_000.0 || v_mag < 0.1 {
        return (pos, vel);
    }

    // Near-zero angular momentum: rectilinear, propagate linearly.
    if pos.cross(vel).length() < 1e3 {
        return (pos + vel * dt, vel);
    }

    let energy = 0.5 * v_mag * v_mag - MU_EARTH / r_mag;
    let sma = -MU_EARTH / (2.0 * energy);
    if !sma.is_finite() || sma <= 0.0 {
        // Hyperbolic or parabolic.
        return (pos + vel * dt, vel);
    }

    let mut elem = state_to_elements(pos, vel);
    if elem.eccentricity >= 1.0 {
        return (pos + vel * dt, vel);
    }

    let m_new = (elem.mean_anomaly + elem.mean_motion() * dt).rem_euclid(TAU);
    elem.true_anomaly = mean_to_true_anomaly(m_new, elem.eccentricity);
    elem.mean_anomaly = m_new;

    let (new_pos, new_vel) = elements_to_state(&elem);
    if new_pos.is_finite() && new_vel.is_finite() {
        (new_pos, new_vel)
    } else {
        (pos + vel * dt, vel)
    }
}
