//! Orbital physics system — analytic two-body propagation.
//!
//! Propagation is state → elements → advance mean anomaly → state, so no
//! numerical drift accumulates. Degenerate states fall back to linear
//! propagation inside the propagator; nothing here can emit NaN into the
//! store. The derived geodetic position is resynced after every step so
//! sensors and weapons see a consistent picture.

use crucible_core::entity::PhysicsState;
use crucible_core::World;
use crucible_geo::frames::eci_to_ecef;
use crucible_geo::geodesy::ecef_to_geodetic;
use crucible_geo::orbit::propagate_two_body;

/// Propagate all live orbital entities by `dt` seconds.
pub fn run(world: &mut World, dt: f64, sim_time: f64) {
    for e in world.entities_mut() {
        if !e.alive {
            continue;
        }
        if let PhysicsState::Orbital(orb) = &mut e.physics {
            let (pos, vel) = propagate_two_body(orb.pos_eci, orb.vel_eci, dt);
            orb.pos_eci = pos;
            orb.vel_eci = vel;
            e.geodetic = ecef_to_geodetic(eci_to_ecef(pos, sim_time));
        }
    }
}
