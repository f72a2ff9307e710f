//! Orbital combat AI — role-based pursuit and defense around high-value
//! assets.
//!
//! Each entity runs a periodic scan of in-range opposing entities and
//! selects a target by role: defenders guard their assigned HVA, attackers
//! hunt enemy HVAs, escorts screen against enemy defenders and sweeps,
//! sweeps hunt enemy attackers and escorts. Within kill range the target id
//! is written into the kinetic-kill weapon sub-state; otherwise the entity
//! thrusts along the line of sight to close. HVAs are passive.

use glam::DVec3;

use crucible_core::entity::{AiState, Entity, PhysicsState, WeaponState};
use crucible_core::enums::{AiKind, CombatRole};
use crucible_core::World;

/// One scan contact.
struct Contact {
    id: String,
    pos: DVec3,
    distance: f64,
    role: Option<CombatRole>,
}

/// Update all live orbital-combat entities.
pub fn run(world: &mut World, dt: f64) {
    for i in 0..world.len() {
        {
            let e = &world.entities()[i];
            if !e.alive || e.ai.kind() != AiKind::OrbitalCombat {
                continue;
            }
            if e.role == Some(CombatRole::Hva) {
                continue;
            }
        }
        let mut e = world.detach(i);
        update_entity(&mut e, world, dt);
        world.restore(i, e);
    }
}

fn update_entity(e: &mut Entity, world: &World, dt: f64) {
    let my_pos = match &e.physics {
        PhysicsState::Orbital(orb) => orb.pos_eci,
        _ => return,
    };

    // Periodic scan + target selection at scan boundaries.
    let scan_due = {
        let AiState::OrbitalCombat(ai) = &mut e.ai else {
            return;
        };
        ai.scan_timer += dt;
        if ai.scan_timer >= ai.scan_interval {
            ai.scan_timer = 0.0;
            true
        } else {
            false
        }
    };

    if scan_due {
        let contacts = scan_for_contacts(e, world, my_pos);
        select_target(e, world, &contacts);
    }

    // Act on the current target every tick.
    let (current, kill_range, max_accel) = {
        let AiState::OrbitalCombat(ai) = &mut e.ai else {
            return;
        };
        (ai.current_target.clone(), ai.kill_range, ai.max_accel)
    };

    if let Some(target_id) = current {
        let target_pos = world.get(&target_id).and_then(|t| {
            if !t.alive {
                return None;
            }
            match &t.physics {
                PhysicsState::Orbital(orb) => Some(orb.pos_eci),
                _ => None,
            }
        });

        if let Some(target_pos) = target_pos {
            if my_pos.distance(target_pos) < kill_range {
                set_weapon_target(e, Some(target_id));
            } else {
                set_weapon_target(e, None);
                apply_thrust(e, dt, target_pos, max_accel);
            }
            return;
        }

        // Target became invalid.
        if let AiState::OrbitalCombat(ai) = &mut e.ai {
            ai.current_target = None;
        }
    }

    set_weapon_target(e, None);

    // Escorts with nothing to shoot drift toward the nearest friendly
    // attacker to stay useful.
    if e.role == Some(CombatRole::Escort) {
        drift_toward_friendly_attacker(e, world, my_pos, dt);
    }
}

/// Scan for live opposing entities within sensor range, nearest first.
fn scan_for_contacts(e: &Entity, world: &World, my_pos: DVec3) -> Vec<Contact> {
    let AiState::OrbitalCombat(ai) = &e.ai else {
        return Vec::new();
    };
    let range_sq = ai.sensor_range * ai.sensor_range;

    let mut contacts: Vec<Contact> = Vec::new();
    for other in world.entities() {
        if other.id == e.id || !other.alive {
            continue;
        }
        if !e.team.is_hostile_to(other.team) {
            continue;
        }
        let PhysicsState::Orbital(orb) = &other.physics else {
            continue;
        };
        let dist_sq = my_pos.distance_squared(orb.pos_eci);
        if dist_sq <= range_sq {
            contacts.push(Contact {
                id: other.id.clone(),
                pos: orb.pos_eci,
                distance: dist_sq.sqrt(),
                role: other.role,
            });
        }
    }

    contacts.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    contacts
}

/// Pick `current_target` from the scan contacts according to role.
fn select_target(e: &mut Entity, world: &World, contacts: &[Contact]) {
    let role = e.role;
    let AiState::OrbitalCombat(ai) = &mut e.ai else {
        return;
    };

    match role {
        Some(CombatRole::Defender) => {
            // Engage offensive intruders inside the defense radius of the HVA.
            let hva_pos = ai
                .assigned_hva
                .as_deref()
                .and_then(|id| world.get(id))
                .filter(|hva| hva.alive)
                .and_then(|hva| match &hva.physics {
                    PhysicsState::Orbital(orb) => Some(orb.pos_eci),
                    _ => None,
                });
            let Some(hva_pos) = hva_pos else {
                ai.current_target = None;
                return;
            };
            let radius_sq = ai.defense_radius * ai.defense_radius;
            ai.current_target = contacts
                .iter()
                .filter(|c| {
                    matches!(
                        c.role,
                        Some(CombatRole::Attacker | CombatRole::Sweep | CombatRole::Escort)
                    )
                })
                .find(|c| hva_pos.distance_squared(c.pos) <= radius_sq)
                .map(|c| c.id.clone());
        }
        Some(CombatRole::Attacker) => {
            ai.current_target = contacts
                .iter()
                .find(|c| c.role == Some(CombatRole::Hva))
                .map(|c| c.id.clone());
        }
        Some(CombatRole::Escort) => {
            ai.current_target = contacts
                .iter()
                .find(|c| matches!(c.role, Some(CombatRole::Defender | CombatRole::Sweep)))
                .map(|c| c.id.clone());
        }
        Some(CombatRole::Sweep) => {
            ai.current_target = contacts
                .iter()
                .find(|c| matches!(c.role, Some(CombatRole::Attacker | CombatRole::Escort)))
                .map(|c| c.id.clone());
        }
        _ => {}
    }
}

/// Write targeting intent into the kinetic-kill weapon sub-state.
fn set_weapon_target(e: &mut Entity, target: Option<String>) {
    if let WeaponState::KineticKill(kk) = &mut e.weapon {
        kk.target_id = target;
    }
}

/// Burn toward `target_pos` at `accel` for this tick.
fn apply_thrust(e: &mut Entity, dt: f64, target_pos: DVec3, accel: f64) {
    let PhysicsState::Orbital(orb) = &mut e.physics else {
        return;
    };
    let delta = target_pos - orb.pos_eci;
    let dist = delta.length();
    if dist < 1.0 {
        return;
    }
    orb.vel_eci += delta / dist * (accel * dt);
}

fn drift_toward_friendly_attacker(e: &mut Entity, world: &World, my_pos: DVec3, dt: f64) {
    let max_accel = match &e.ai {
        AiState::OrbitalCombat(ai) => ai.max_accel,
        _ => return,
    };

    let mut nearest: Option<(DVec3, f64)> = None;
    for other in world.entities() {
        if other.id == e.id || !other.alive || other.team != e.team {
            continue;
        }
        if other.role != Some(CombatRole::Attacker) {
            continue;
        }
        let PhysicsState::Orbital(orb) = &other.physics else {
            continue;
        };
        let dist = my_pos.distance(orb.pos_eci);
        match nearest {
            Some((_, best)) if best <= dist => {}
            _ => nearest = Some((orb.pos_eci, dist)),
        }
    }

    if let Some((pos, _)) = nearest {
        apply_thrust(e, dt, pos, max_accel * 0.3);
    }
}
