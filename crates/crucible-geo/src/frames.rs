//! Reference frame conversions.
//!
//! ECI → ECEF uses a plain GMST rotation with GMST = 0 at sim time zero,
//! adequate for engagement-length simulations where precession and nutation
//! are negligible.

use glam::DVec3;

use crucible_core::constants::OMEGA_EARTH;
use crucible_core::entity::{Entity, PhysicsState};

use crate::geodesy::geodetic_to_ecef;

/// Rotate an ECI position into ECEF at `sim_time` seconds.
pub fn eci_to_ecef(eci: DVec3, sim_time: f64) -> DVec3 {
    let gmst = OMEGA_EARTH * sim_time;
    let (s, c) = gmst.sin_cos();
    DVec3::new(c * eci.x + s * eci.y, -s * eci.x + c * eci.y, eci.z)
}

/// ECEF position of any entity, resolved by physics kind. Orbital entities
/// rotate their ECI state; everything else converts its geodetic position.
pub fn entity_ecef(entity: &Entity, sim_time: f64) -> DVec3 {
    match &entity.physics {
        PhysicsState::Orbital(orb) => eci_to_ecef(orb.pos_eci, sim_time),
        PhysicsState::Atmospheric(_) | PhysicsState::Static | PhysicsState::None => {
            geodetic_to_ecef(&entity.geodetic)
        }
    }
}
