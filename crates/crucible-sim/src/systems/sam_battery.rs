//! SAM battery — surface-to-air salvo kill chain (F2T2EA).
//!
//! Phase machine per engagement: DETECT → TRACK → ENGAGE → ASSESS, with the
//! ENGAGE duration sized by time-of-flight (range ÷ missile speed). A salvo
//! of `min(salvo_size, missiles_ready)` missiles fires at the TRACK→ENGAGE
//! transition; the target survives only if every missile misses its
//! independent Pk roll. A reload timer gates the next salvo after firing.
//! Targets come from same-team radar tracks (including the battery's own
//! radar); ground/static targets are never engaged.

use crucible_core::constants::*;
use crucible_core::entity::{Entity, SamEngagement, WeaponState};
use crucible_core::enums::{EngagementOutcome, PhysicsKind, Roe, SamPhase, WeaponKind};
use crucible_core::rng::SimRng;
use crucible_core::types::Team;
use crucible_core::World;
use crucible_geo::geodesy::slant_range;

/// Resolve a salvo: the target is killed if any of `missiles` independent
/// Pk rolls succeeds, i.e. P(kill) = 1 − (1 − pk)^missiles. Every roll is
/// made so the RNG stream does not depend on early exits.
pub fn salvo_any_hit(rng: &mut SimRng, pk: f64, missiles: u32) -> bool {
    let mut any = false;
    for _ in 0..missiles {
        if rng.bernoulli(pk) {
            any = true;
        }
    }
    any
}

/// Update all live SAM batteries.
pub fn run(world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    for i in 0..world.len() {
        {
            let e = &world.entities()[i];
            if !e.alive || e.weapon.kind() != WeaponKind::SamBattery {
                continue;
            }
        }
        let mut e = world.detach(i);
        update_battery(&mut e, world, dt, now, rng);
        world.restore(i, e);
    }
}

/// Is `target_id` currently held by the battery's own radar or any live
/// same-team radar? Required for weapons-tight release.
fn tracked_by_team(e: &Entity, world: &World, team: Team, target_id: &str) -> bool {
    if let Some(sensor) = &e.sensor {
        if sensor.holds(target_id) {
            return true;
        }
    }
    world.entities().iter().any(|r| {
        r.alive
            && r.team == team
            && r.sensor.as_ref().is_some_and(|s| s.holds(target_id))
    })
}

fn update_battery(e: &mut Entity, world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    let roe = world.effective_roe(e);
    if roe == Roe::WeaponsHold {
        return;
    }

    let own_geo = e.geodetic;
    let team = e.team;

    // Pull the chain state out so the battery and its targets can be
    // mutated side by side.
    let (mut engagements, mut missiles_ready, mut reload_timer, params) = {
        let WeaponState::SamBattery(sam) = &mut e.weapon else {
            return;
        };
        sam.reload_timer = (sam.reload_timer - dt).max(0.0);
        (
            std::mem::take(&mut sam.engagements),
            sam.missiles_ready,
            sam.reload_timer,
            (
                sam.min_range,
                sam.max_range,
                sam.max_altitude,
                sam.missile_speed,
                sam.salvo_size,
                sam.pk_per_missile,
                sam.reload_time,
            ),
        )
    };
    let (min_range, max_range, max_altitude, missile_speed, salvo_size, pk, reload_time) = params;

    let mut retained: Vec<SamEngagement> = Vec::with_capacity(engagements.len());
    for mut eng in engagements.drain(..) {
        eng.timer -= dt;
        if eng.timer > 0.0 {
            retained.push(eng);
            continue;
        }

        match eng.phase {
            SamPhase::Detect => {
                eng.phase = SamPhase::Track;
                eng.timer = SAM_TRACK_SECS;
                retained.push(eng);
            }

            SamPhase::Track => {
                // Firing solution complete. Validate and release the salvo.
                let target = world.get(&eng.target_id).filter(|t| t.alive);
                let Some(target) = target else {
                    continue; // target gone, abort without penalty
                };
                if missiles_ready == 0 {
                    continue; // winchester
                }
                if reload_timer > 0.0 {
                    // Launchers still cycling; hold the solution.
                    retained.push(eng);
                    continue;
                }
                if roe == Roe::WeaponsTight && !tracked_by_team(e, world, team, &eng.target_id) {
                    // Tight: no live track, hold fire.
                    retained.push(eng);
                    continue;
                }

                let range = slant_range(&own_geo, &target.geodetic);
                let tof = range / missile_speed;
                let to_fire = salvo_size.min(missiles_ready);
                let target_name = target.name.clone();

                e.log_event(now, EngagementOutcome::Engage, &eng.target_id, &target_name);
                for _ in 0..to_fire {
                    e.log_event(now, EngagementOutcome::Launch, &eng.target_id, &target_name);
                }
                missiles_ready -= to_fire;
                reload_timer = reload_time;

                eng.missiles_fired = to_fire;
                eng.phase = SamPhase::Engage;
                eng.timer = tof;
                retained.push(eng);
            }

            SamPhase::Engage => {
                // Salvo arrival: resolve all Pk rolls.
                let any_hit = salvo_any_hit(rng, pk, eng.missiles_fired);

                let target_name = world
                    .get(&eng.target_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| eng.target_id.clone());
                let target_alive = world.get(&eng.target_id).map(|t| t.alive).unwrap_or(false);

                if any_hit && target_alive {
                    let (own_id, own_name) = (e.id.clone(), e.name.clone());
                    if let Some(target) = world.get_mut(&eng.target_id) {
                        target.kill(now);
                        target.log_event(now, EngagementOutcome::KilledBy, &own_id, &own_name);
                    }
                    e.log_event(now, EngagementOutcome::Kill, &eng.target_id, &target_name);
                } else {
                    e.log_event(now, EngagementOutcome::Miss, &eng.target_id, &target_name);
                }

                eng.phase = SamPhase::Assess;
                eng.timer = SAM_ASSESS_SECS;
                retained.push(eng);
            }

            SamPhase::Assess => {
                // Assessment complete; the chain returns to search.
            }
        }
    }

    // Acquire new targets from same-team radar tracks.
    let mut candidates: Vec<(String, String)> = Vec::new();
    let mut consider = |track_target: &str, world: &World| {
        if retained.iter().any(|g| g.target_id == track_target) {
            return;
        }
        if candidates.iter().any(|(id, _)| id == track_target) {
            return;
        }
        let Some(target) = world.get(track_target) else {
            return;
        };
        if !target.alive {
            return;
        }
        // Airborne targets only: no static sites, nothing in the ground
        // clutter band, nothing above the engagement ceiling.
        if target.physics.kind() == PhysicsKind::Static {
            return;
        }
        if target.geodetic.alt < GROUND_ALT_THRESHOLD || target.geodetic.alt > max_altitude {
            return;
        }
        let range = slant_range(&own_geo, &target.geodetic);
        if range < min_range || range > max_range {
            return;
        }
        candidates.push((track_target.to_owned(), target.name.clone()));
    };

    if let Some(sensor) = &e.sensor {
        for track in &sensor.tracks {
            consider(&track.target_id, world);
        }
    }
    for radar in world.entities() {
        if !radar.alive || radar.team != team {
            continue;
        }
        let Some(sensor) = &radar.sensor else {
            continue;
        };
        for track in &sensor.tracks {
            consider(&track.target_id, world);
        }
    }

    for (target_id, target_name) in candidates {
        e.log_event(now, EngagementOutcome::Detect, &target_id, &target_name);
        retained.push(SamEngagement {
            target_id,
            phase: SamPhase::Detect,
            timer: SAM_DETECT_SECS,
            missiles_fired: 0,
        });
    }

    // Store the chain state back on the battery.
    let WeaponState::SamBattery(sam) = &mut e.weapon else {
        return;
    };
    sam.engagements = retained;
    sam.missiles_ready = missiles_ready;
    sam.reload_timer = reload_timer;
}
