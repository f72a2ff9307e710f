//! Kinetic kill vehicle — single-shot sacrificial orbital weapon.
//!
//! The orbital combat AI designates a target by writing its id into the
//! weapon sub-state. While designated, a LAUNCH is logged once per target;
//! within kill range a single Pk roll resolves the engagement. A hit
//! destroys both the target and the attacker (the vehicle is the warhead);
//! a miss clears the designation and starts a fixed cooldown before
//! re-engagement is permitted.

use crucible_core::entity::{Entity, PhysicsState, WeaponState};
use crucible_core::enums::{EngagementOutcome, WeaponKind};
use crucible_core::rng::SimRng;
use crucible_core::World;

/// Update all live kinetic-kill entities.
pub fn run(world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    for i in 0..world.len() {
        {
            let e = &world.entities()[i];
            if !e.alive || e.weapon.kind() != WeaponKind::KineticKill {
                continue;
            }
        }
        let mut e = world.detach(i);
        update_entity(&mut e, world, dt, now, rng);
        world.restore(i, e);
    }
}

fn update_entity(e: &mut Entity, world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    let my_pos = match &e.physics {
        PhysicsState::Orbital(orb) => orb.pos_eci,
        _ => return,
    };

    // Cooldown after a miss gates everything.
    {
        let WeaponState::KineticKill(kk) = &mut e.weapon else {
            return;
        };
        if kk.cooldown_timer > 0.0 {
            kk.cooldown_timer = (kk.cooldown_timer - dt).max(0.0);
            return;
        }
    }

    let (target_id, pk, kill_range) = {
        let WeaponState::KineticKill(kk) = &e.weapon else {
            return;
        };
        let Some(target_id) = kk.target_id.clone() else {
            return;
        };
        (target_id, kk.pk, kk.kill_range)
    };

    // Re-fetch the target; a dead or missing target clears the designation
    // without penalty.
    let target_state = world.get(&target_id).and_then(|t| {
        if !t.alive {
            return None;
        }
        match &t.physics {
            PhysicsState::Orbital(orb) => Some((orb.pos_eci, t.name.clone())),
            _ => None,
        }
    });
    let Some((target_pos, target_name)) = target_state else {
        if let WeaponState::KineticKill(kk) = &mut e.weapon {
            kk.target_id = None;
        }
        return;
    };

    // First tick against a new target: log the launch.
    let launch_needed = {
        let WeaponState::KineticKill(kk) = &mut e.weapon else {
            return;
        };
        if kk.last_launch_target.as_deref() != Some(target_id.as_str()) {
            kk.last_launch_target = Some(target_id.clone());
            true
        } else {
            false
        }
    };
    if launch_needed {
        e.log_event(now, EngagementOutcome::Launch, &target_id, &target_name);
    }

    if my_pos.distance(target_pos) > kill_range {
        return;
    }

    if rng.bernoulli(pk) {
        // Mutual destruction: the vehicle is expended either way it lands.
        if let Some(target) = world.get_mut(&target_id) {
            target.kill(now);
            let (attacker_id, attacker_name) = (e.id.clone(), e.name.clone());
            target.log_event(now, EngagementOutcome::KilledBy, &attacker_id, &attacker_name);
        }
        e.kill(now);
        e.log_event(now, EngagementOutcome::Kill, &target_id, &target_name);
    } else {
        e.log_event(now, EngagementOutcome::Miss, &target_id, &target_name);
        let WeaponState::KineticKill(kk) = &mut e.weapon else {
            return;
        };
        kk.cooldown_timer = kk.cooldown;
        kk.target_id = None;
    }
}
