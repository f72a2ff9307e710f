//! Air-to-air missile system — LOCK → FIRE → GUIDE → ASSESS kill chain with
//! per-class inventory.
//!
//! The weapon class is chosen at lock time by range: the shortest-max-range
//! class that still covers the target, subject to remaining rounds. The lock
//! dwell depends on the class's seeker (active radar locks faster than IR).
//! Firing is instantaneous at lock completion: inventory is decremented, a
//! LAUNCH is logged, and the GUIDE phase runs for the time-of-flight before
//! a single Pk roll resolves the shot. Targets come from the entity's own
//! radar tracks and from the intercept AI's engaged target.

use crucible_core::constants::A2A_ASSESS_SECS;
use crucible_core::entity::{A2aEngagement, AiState, Entity, WeaponState};
use crucible_core::enums::{A2aPhase, EngagementOutcome, Roe, WeaponKind};
use crucible_core::rng::SimRng;
use crucible_core::World;
use crucible_geo::geodesy::slant_range;

/// Update all live air-to-air entities.
pub fn run(world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    for i in 0..world.len() {
        {
            let e = &world.entities()[i];
            if !e.alive || e.weapon.kind() != WeaponKind::A2aMissile {
                continue;
            }
        }
        let mut e = world.detach(i);
        update_shooter(&mut e, world, dt, now, rng);
        world.restore(i, e);
    }
}

fn update_shooter(e: &mut Entity, world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    let roe = world.effective_roe(e);
    if roe == Roe::WeaponsHold {
        return;
    }

    let own_geo = e.geodetic;

    let mut engagements = {
        let WeaponState::AirToAir(a2a) = &mut e.weapon else {
            return;
        };
        std::mem::take(&mut a2a.engagements)
    };

    let mut retained: Vec<A2aEngagement> = Vec::with_capacity(engagements.len());
    for mut eng in engagements.drain(..) {
        eng.timer -= dt;
        if eng.timer > 0.0 {
            retained.push(eng);
            continue;
        }

        match eng.phase {
            A2aPhase::Lock => {
                // Lock complete. Fire if the target and the round are
                // still good.
                let target = world.get(&eng.target_id).filter(|t| t.alive);
                let Some(target) = target else {
                    continue; // lost the target during lock
                };
                let target_geo = target.geodetic;
                let target_name = target.name.clone();

                let tof = {
                    let WeaponState::AirToAir(a2a) = &mut e.weapon else {
                        return;
                    };
                    let Some(class) = a2a.classes.get_mut(eng.class) else {
                        continue;
                    };
                    if class.rounds == 0 {
                        continue; // rail emptied by another engagement
                    }
                    class.rounds -= 1;
                    slant_range(&own_geo, &target_geo) / class.speed
                };
                e.log_event(now, EngagementOutcome::Launch, &eng.target_id, &target_name);
                eng.phase = A2aPhase::Guide;
                eng.timer = tof;
                retained.push(eng);
            }

            A2aPhase::Guide => {
                // Missile arrival: one Pk roll.
                let pk = {
                    let WeaponState::AirToAir(a2a) = &e.weapon else {
                        return;
                    };
                    a2a.classes.get(eng.class).map(|c| c.pk).unwrap_or(0.0)
                };
                let hit = rng.bernoulli(pk);

                let target_name = world
                    .get(&eng.target_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| eng.target_id.clone());
                let target_alive = world.get(&eng.target_id).map(|t| t.alive).unwrap_or(false);

                if hit && target_alive {
                    let (own_id, own_name) = (e.id.clone(), e.name.clone());
                    if let Some(target) = world.get_mut(&eng.target_id) {
                        target.kill(now);
                        target.log_event(now, EngagementOutcome::KilledBy, &own_id, &own_name);
                    }
                    e.log_event(now, EngagementOutcome::Kill, &eng.target_id, &target_name);
                } else {
                    e.log_event(now, EngagementOutcome::Miss, &eng.target_id, &target_name);
                }

                eng.phase = A2aPhase::Assess;
                eng.timer = A2A_ASSESS_SECS;
                retained.push(eng);
            }

            A2aPhase::Assess => {
                // Back to search.
            }
        }
    }

    // Acquire new targets, ammunition permitting.
    let has_ammo = {
        let WeaponState::AirToAir(a2a) = &e.weapon else {
            return;
        };
        a2a.has_ammo()
    };
    if has_ammo {
        let mut candidate_ids: Vec<String> = Vec::new();
        if let Some(sensor) = &e.sensor {
            for track in &sensor.tracks {
                candidate_ids.push(track.target_id.clone());
            }
        }
        if let AiState::Intercept(ai) = &e.ai {
            if ai.engaged {
                if let Some(target) = &ai.target_id {
                    candidate_ids.push(target.clone());
                }
            }
        }

        for target_id in candidate_ids {
            let already = retained.iter().any(|g| g.target_id == target_id);
            if already {
                continue;
            }
            let Some(target) = world.get(&target_id) else {
                continue;
            };
            if !target.alive {
                continue;
            }
            let range = slant_range(&own_geo, &target.geodetic);

            let WeaponState::AirToAir(a2a) = &e.weapon else {
                return;
            };
            let Some(class_idx) = a2a.select_class(range) else {
                continue; // nothing covers this range
            };
            let lock_time = a2a.classes[class_idx].lock_time();

            retained.push(A2aEngagement {
                target_id,
                phase: A2aPhase::Lock,
                timer: lock_time,
                class: class_idx,
            });
        }
    }

    let WeaponState::AirToAir(a2a) = &mut e.weapon else {
        return;
    };
    a2a.engagements = retained;
}
