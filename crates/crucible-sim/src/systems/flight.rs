//! Atmospheric physics system — 3-DOF point-mass flight.
//!
//! Equations of motion:
//!   dV/dt = (T·cos α − D) / m − g·sin γ
//!   dγ/dt = (L·cos φ + T·sin α − m·g·cos γ) / (m·V)
//!   dψ/dt = L·sin φ / (m·V·cos γ)
//!
//! Each tick is split into sub-steps of at most `MAX_FLIGHT_SUBSTEP` and
//! integrated semi-implicitly (speed first, then the angular rates at the
//! new speed) to bound truncation error. Position updates by great-circle
//! displacement along the heading.

use std::f64::consts::{PI, TAU};

use crucible_core::constants::*;
use crucible_core::entity::{FlightState, PhysicsState};
use crucible_core::types::Geodetic;
use crucible_core::World;
use crucible_geo::atmosphere::{atmosphere_at, RHO0};
use crucible_geo::geodesy::destination_point;

/// Propagate all live atmospheric entities by `dt` seconds.
pub fn run(world: &mut World, dt: f64) {
    for e in world.entities_mut() {
        if !e.alive {
            continue;
        }
        let PhysicsState::Atmospheric(flight) = &mut e.physics else {
            continue;
        };

        let substeps = (dt / MAX_FLIGHT_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f64;

        let mut geo = e.geodetic;
        for _ in 0..substeps {
            step(flight, &mut geo, h);
        }
        e.geodetic = geo;
    }
}

/// One integration sub-step.
fn step(f: &mut FlightState, geo: &mut Geodetic, dt: f64) {
    let ac = f.aircraft;
    let atmo = atmosphere_at(geo.alt);

    let q = 0.5 * atmo.density * f.speed * f.speed;

    let cl = (ac.cl_alpha * f.alpha).clamp(-ac.cl_max, ac.cl_max);
    let mut cd = ac.cd0 + cl * cl / (PI * ac.oswald * ac.aspect_ratio);

    let mach = if atmo.speed_of_sound > 1.0 {
        f.speed / atmo.speed_of_sound
    } else {
        0.0
    };
    if mach > WAVE_DRAG_MACH {
        let dm = mach - WAVE_DRAG_MACH;
        cd += 0.1 * dm * dm;
    }

    let lift = q * ac.wing_area * cl;
    let drag = q * ac.wing_area * cd;

    let thrust = if f.engine_on {
        let base = if f.throttle > 0.95 {
            ac.thrust_ab
        } else {
            ac.thrust_mil
        };
        f.throttle * base * (atmo.density / RHO0).powf(0.7)
    } else {
        0.0
    };

    // Speed first; the angular rates then use the updated speed.
    let dv = (thrust * f.alpha.cos() - drag) / ac.mass - G0 * f.gamma.sin();
    f.speed = (f.speed + dv * dt).max(MIN_FLIGHT_SPEED);

    let mut d_gamma = 0.0;
    if f.speed > 1.0 {
        d_gamma = (lift * f.roll.cos() + thrust * f.alpha.sin() - ac.mass * G0 * f.gamma.cos())
            / (ac.mass * f.speed);
    }
    let mut d_heading = 0.0;
    if f.speed > 1.0 && f.gamma.cos().abs() > 0.01 {
        d_heading = lift * f.roll.sin() / (ac.mass * f.speed * f.gamma.cos());
    }

    f.gamma = (f.gamma + d_gamma * dt).clamp(-GAMMA_LIMIT, GAMMA_LIMIT);
    f.heading = (f.heading + d_heading * dt).rem_euclid(TAU);
    f.mach = mach;

    let d_alt = f.speed * f.gamma.sin() * dt;
    let ground = f.speed * f.gamma.cos() * dt;

    *geo = destination_point(geo, f.heading, ground);
    geo.alt = (geo.alt + d_alt).max(0.0);
}
