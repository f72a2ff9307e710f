//! Intercept AI — pure pursuit of a designated target.
//!
//! Steers bearing toward the target's live geodetic position at full
//! throttle, matching altitude for airborne targets and holding a floor
//! over ground targets. Inside the engage range it raises the `engaged`
//! flag, which the air-to-air weapon system consumes as targeting intent.
//! When the target dies the controller reverts to its fallback patrol
//! route, or idles if none was authored. Orbital targets cannot be pursued
//! with atmospheric steering.

use crucible_core::constants::INTERCEPT_MIN_ALT;
use crucible_core::entity::{AiState, PatrolAi, PhysicsState};
use crucible_core::enums::{AiKind, PhysicsKind};
use crucible_core::types::Geodetic;
use crucible_core::World;
use crucible_geo::geodesy::{great_circle_bearing, haversine_distance};

use super::waypoint::steer_toward;

/// Update all live intercept entities.
pub fn run(world: &mut World, dt: f64) {
    for i in 0..world.len() {
        {
            let e = &world.entities()[i];
            if !e.alive || e.ai.kind() != AiKind::Intercept {
                continue;
            }
        }
        update_entity(world, i, dt);
    }
}

/// Snapshot of the target taken before the pursuer is mutated.
struct TargetPicture {
    geodetic: Geodetic,
    kind: PhysicsKind,
}

fn update_entity(world: &mut World, idx: usize, dt: f64) {
    let target_id = match &world.entities()[idx].ai {
        AiState::Intercept(ai) => ai.target_id.clone(),
        _ => return,
    };
    let Some(target_id) = target_id else {
        return; // idle
    };

    let picture = world.get(&target_id).and_then(|t| {
        t.alive.then_some(TargetPicture {
            geodetic: t.geodetic,
            kind: t.physics.kind(),
        })
    });

    let e = &mut world.entities_mut()[idx];
    let Some(target) = picture else {
        // Target destroyed or removed: revert to the fallback route, or idle.
        let AiState::Intercept(ai) = &mut e.ai else {
            return;
        };
        ai.engaged = false;
        ai.target_id = None;
        if !ai.patrol_fallback.is_empty() {
            let waypoints = std::mem::take(&mut ai.patrol_fallback);
            e.ai = AiState::WaypointPatrol(PatrolAi {
                waypoints,
                index: 0,
                loop_route: true,
            });
        }
        return;
    };

    if target.kind == PhysicsKind::Orbital {
        if let AiState::Intercept(ai) = &mut e.ai {
            ai.engaged = false;
        }
        return;
    }

    let geo = e.geodetic;
    let bearing = great_circle_bearing(&geo, &target.geodetic);
    let ground = haversine_distance(&geo, &target.geodetic);
    let dalt = target.geodetic.alt - geo.alt;
    let slant = (ground * ground + dalt * dalt).sqrt();

    let desired_alt = if target.kind == PhysicsKind::Atmospheric {
        target.geodetic.alt
    } else {
        target.geodetic.alt.max(INTERCEPT_MIN_ALT)
    };

    let AiState::Intercept(ai) = &mut e.ai else {
        return;
    };
    ai.engaged = ai.engage_range > 0.0 && slant < ai.engage_range;

    let PhysicsState::Atmospheric(flight) = &mut e.physics else {
        return;
    };
    flight.throttle = 1.0;
    let speed = flight.speed;
    steer_toward(flight, &geo, bearing, desired_alt, speed, dt);
}
