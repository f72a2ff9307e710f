//! World validation and preparation, run once before the first tick.
//!
//! Validation catches configuration errors (unresolvable references,
//! out-of-range parameters), which are fatal to the run. Preparation applies
//! scenario-level fixups: entities flagged as externally piloted but run
//! headlessly get a small patrol loop so they still produce motion.

use crucible_core::config::RunConfig;
use crucible_core::constants::*;
use crucible_core::entity::{AiState, Entity, PatrolAi, PhysicsState, Waypoint, WeaponState};
use crucible_core::error::ConfigError;
use crucible_core::events::{Action, Trigger};
use crucible_core::World;
use crucible_geo::geodesy::destination_point;

/// Validate the run configuration and every entity/event reference.
pub fn validate(world: &World, config: &RunConfig) -> Result<(), ConfigError> {
    if !(config.dt.is_finite() && config.dt > 0.0) {
        return Err(ConfigError::InvalidRunConfig("dt must be positive"));
    }
    if !(config.max_sim_time.is_finite() && config.max_sim_time > 0.0) {
        return Err(ConfigError::InvalidRunConfig("max_sim_time must be positive"));
    }
    if !(config.sample_interval.is_finite() && config.sample_interval > 0.0) {
        return Err(ConfigError::InvalidRunConfig("sample_interval must be positive"));
    }
    if config.num_runs == 0 {
        return Err(ConfigError::InvalidRunConfig("num_runs must be at least 1"));
    }

    for e in world.entities() {
        validate_entity(world, e)?;
    }
    for ev in &world.events {
        validate_event_refs(world, ev.id.as_str(), &ev.trigger, &ev.action)?;
    }
    Ok(())
}

fn validate_entity(world: &World, e: &Entity) -> Result<(), ConfigError> {
    let check_ref = |referent: &str, context: &'static str| -> Result<(), ConfigError> {
        if world.get(referent).is_none() {
            return Err(ConfigError::UnknownReference {
                entity: e.id.clone(),
                referent: referent.to_owned(),
                context,
            });
        }
        Ok(())
    };
    let check_range = |what: &'static str, value: f64, lo: f64, hi: f64| -> Result<(), ConfigError> {
        if !value.is_finite() || value < lo || value > hi {
            return Err(ConfigError::ParameterOutOfRange {
                entity: e.id.clone(),
                what,
                value,
            });
        }
        Ok(())
    };

    match &e.ai {
        AiState::Intercept(ai) => {
            if let Some(target) = &ai.target_id {
                check_ref(target, "intercept target")?;
            }
            check_range("intercept engage_range", ai.engage_range, 0.0, f64::MAX)?;
        }
        AiState::OrbitalCombat(ai) => {
            if let Some(hva) = &ai.assigned_hva {
                check_ref(hva, "assigned HVA")?;
            }
            check_range("sensor_range", ai.sensor_range, 0.0, f64::MAX)?;
            check_range("kill_range", ai.kill_range, 0.0, f64::MAX)?;
            check_range("scan_interval", ai.scan_interval, 1e-6, f64::MAX)?;
        }
        AiState::WaypointPatrol(_) | AiState::None => {}
    }

    match &e.weapon {
        WeaponState::KineticKill(kk) => {
            check_range("kinetic kill pk", kk.pk, 0.0, 1.0)?;
            check_range("kinetic kill_range", kk.kill_range, 0.0, f64::MAX)?;
        }
        WeaponState::SamBattery(sam) => {
            check_range("SAM pk_per_missile", sam.pk_per_missile, 0.0, 1.0)?;
            check_range("SAM missile_speed", sam.missile_speed, 1e-6, f64::MAX)?;
            check_range("SAM max_altitude", sam.max_altitude, 0.0, f64::MAX)?;
            check_range("SAM reload_time", sam.reload_time, 0.0, f64::MAX)?;
            if sam.salvo_size == 0 {
                return Err(ConfigError::ParameterOutOfRange {
                    entity: e.id.clone(),
                    what: "SAM salvo_size",
                    value: 0.0,
                });
            }
            if !(sam.min_range < sam.max_range) {
                return Err(ConfigError::ParameterOutOfRange {
                    entity: e.id.clone(),
                    what: "SAM min_range (must be below max_range)",
                    value: sam.min_range,
                });
            }
        }
        WeaponState::AirToAir(a2a) => {
            for class in &a2a.classes {
                check_range("A2A class pk", class.pk, 0.0, 1.0)?;
                check_range("A2A class speed", class.speed, 1e-6, f64::MAX)?;
                if !(class.min_range < class.max_range) {
                    return Err(ConfigError::ParameterOutOfRange {
                        entity: e.id.clone(),
                        what: "A2A class min_range (must be below max_range)",
                        value: class.min_range,
                    });
                }
            }
        }
        WeaponState::None => {}
    }

    if let Some(sensor) = &e.sensor {
        check_range("radar max_range", sensor.max_range, 1e-6, f64::MAX)?;
        check_range("radar sweep_interval", sensor.sweep_interval, 1e-6, f64::MAX)?;
        check_range("radar detect_probability", sensor.detect_probability, 0.0, 1.0)?;
        check_range("radar track_timeout", sensor.track_timeout, 1e-6, f64::MAX)?;
    }

    Ok(())
}

fn validate_event_refs(
    world: &World,
    event_id: &str,
    trigger: &Trigger,
    action: &Action,
) -> Result<(), ConfigError> {
    let check = |referent: &str, context: &'static str| -> Result<(), ConfigError> {
        if world.get(referent).is_none() {
            return Err(ConfigError::UnknownReference {
                entity: event_id.to_owned(),
                referent: referent.to_owned(),
                context,
            });
        }
        Ok(())
    };

    match trigger {
        Trigger::Elapsed { .. } => {}
        Trigger::Proximity {
            entity_a, entity_b, ..
        } => {
            check(entity_a, "proximity trigger")?;
            check(entity_b, "proximity trigger")?;
        }
        Trigger::Detection { sensor, target } => {
            check(sensor, "detection trigger sensor")?;
            check(target, "detection trigger target")?;
        }
    }

    match action {
        Action::Message { .. } | Action::SetGlobalRoe { .. } => {}
        Action::SetRoe { entity_id, .. } => check(entity_id, "set-ROE action")?,
        Action::Destroy { entity_id } => check(entity_id, "destroy action")?,
    }

    Ok(())
}

/// Apply pre-run fixups. Externally-piloted aircraft with no AI get a
/// 50 km × 20 km racetrack from their initial heading so they orbit
/// instead of flying off the map.
pub fn prepare(world: &mut World) {
    for e in world.entities_mut() {
        if !e.externally_piloted {
            continue;
        }
        if e.ai.kind() != crucible_core::enums::AiKind::None {
            continue;
        }
        let PhysicsState::Atmospheric(flight) = &e.physics else {
            continue;
        };

        let heading = flight.heading;
        let speed = flight.speed;
        let start = e.geodetic;
        let right = heading + std::f64::consts::FRAC_PI_2;

        let p1 = destination_point(&start, heading, AUTO_PATROL_LEG_FWD);
        let p2 = destination_point(&p1, right, AUTO_PATROL_LEG_SIDE);
        let p3 = destination_point(&start, right, AUTO_PATROL_LEG_SIDE);

        let wp = |g: &crucible_core::types::Geodetic| Waypoint {
            lat: g.lat,
            lon: g.lon,
            alt: start.alt,
            speed,
        };

        e.ai = AiState::WaypointPatrol(PatrolAi {
            waypoints: vec![wp(&p1), wp(&p2), wp(&p3), wp(&start)],
            index: 0,
            loop_route: true,
        });
    }
}
