//! Scenario event system.
//!
//! Walks the authored `{trigger, action}` list once per tick. A trigger
//! fires at most once unless the event is marked repeatable. Message
//! actions go to the structured log; state actions mutate the named entity
//! or the global ROE override.

use tracing::info;

use crucible_core::enums::PhysicsKind;
use crucible_core::events::{Action, Trigger};
use crucible_core::World;
use crucible_geo::frames::entity_ecef;
use crucible_geo::geodesy::haversine_distance;

/// Evaluate all scenario events for this tick.
pub fn run(world: &mut World, now: f64) {
    let mut to_fire: Vec<usize> = Vec::new();
    for (i, event) in world.events.iter().enumerate() {
        if event.fired && !event.repeatable {
            continue;
        }
        if check_trigger(&event.trigger, world, now) {
            to_fire.push(i);
        }
    }

    for i in to_fire {
        let action = world.events[i].action.clone();
        let name = world.events[i].name.clone();
        world.events[i].fired = true;
        execute_action(&action, world, now, &name);
    }
}

fn check_trigger(trigger: &Trigger, world: &World, now: f64) -> bool {
    match trigger {
        Trigger::Elapsed { at } => now >= *at,

        Trigger::Proximity {
            entity_a,
            entity_b,
            range,
        } => {
            let (Some(a), Some(b)) = (world.get(entity_a), world.get(entity_b)) else {
                return false;
            };
            if !a.alive || !b.alive {
                return false;
            }

            let geodetic = |kind: PhysicsKind| {
                matches!(kind, PhysicsKind::Atmospheric | PhysicsKind::Static | PhysicsKind::None)
            };
            let distance = if geodetic(a.physics.kind()) && geodetic(b.physics.kind()) {
                haversine_distance(&a.geodetic, &b.geodetic)
            } else {
                entity_ecef(a, now).distance(entity_ecef(b, now))
            };
            distance <= *range
        }

        Trigger::Detection { sensor, target } => world
            .get(sensor)
            .and_then(|s| s.sensor.as_ref())
            .is_some_and(|s| s.holds(target)),
    }
}

fn execute_action(action: &Action, world: &mut World, now: f64, event_name: &str) {
    match action {
        Action::Message { text } => {
            info!(event = event_name, time = now, "{text}");
        }
        Action::SetRoe { entity_id, roe } => {
            if let Some(e) = world.get_mut(entity_id) {
                e.roe = *roe;
            }
        }
        Action::SetGlobalRoe { roe } => {
            world.roe_override = Some(*roe);
        }
        Action::Destroy { entity_id } => {
            if let Some(e) = world.get_mut(entity_id) {
                e.kill(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crucible_core::entity::{Entity, RadarSensor, SensorTrack};
    use crucible_core::enums::Roe;
    use crucible_core::events::ScenarioEvent;
    use crucible_core::types::{Geodetic, Team};

    fn site(id: &str, lat: f64) -> Entity {
        let mut e = Entity::new(id, id, "ground", Team::Blue);
        e.geodetic = Geodetic::from_degrees(lat, 10.0, 0.0);
        e.physics = crucible_core::entity::PhysicsState::Static;
        e
    }

    #[test]
    fn test_elapsed_trigger_fires_once() {
        let mut world = World::new();
        world.add_entity(site("g-1", 40.0)).unwrap();
        world.events.push(ScenarioEvent::new(
            "ev-1",
            "free the guns",
            Trigger::Elapsed { at: 30.0 },
            Action::SetGlobalRoe {
                roe: Roe::WeaponsFree,
            },
        ));

        run(&mut world, 10.0);
        assert!(world.roe_override.is_none());
        assert!(!world.events[0].fired);

        run(&mut world, 30.0);
        assert_eq!(world.roe_override, Some(Roe::WeaponsFree));
        assert!(world.events[0].fired);

        // Fired once; flipping the override back proves no re-fire.
        world.roe_override = None;
        run(&mut world, 31.0);
        assert!(world.roe_override.is_none());
    }

    #[test]
    fn test_repeatable_event_refires() {
        let mut world = World::new();
        world.add_entity(site("g-1", 40.0)).unwrap();
        world.events.push(
            ScenarioEvent::new(
                "ev-1",
                "hold the guns",
                Trigger::Elapsed { at: 30.0 },
                Action::SetGlobalRoe {
                    roe: Roe::WeaponsHold,
                },
            )
            .repeatable(),
        );

        run(&mut world, 30.0);
        assert_eq!(world.roe_override, Some(Roe::WeaponsHold));

        world.roe_override = None;
        run(&mut world, 31.0);
        assert_eq!(world.roe_override, Some(Roe::WeaponsHold), "repeatable event re-fires");
    }

    #[test]
    fn test_proximity_trigger_geodetic() {
        let mut world = World::new();
        world.add_entity(site("g-1", 40.0)).unwrap();
        world.add_entity(site("g-2", 40.4)).unwrap(); // ~44 km apart
        world.events.push(ScenarioEvent::new(
            "ev-1",
            "close pass",
            Trigger::Proximity {
                entity_a: "g-1".to_owned(),
                entity_b: "g-2".to_owned(),
                range: 50_000.0,
            },
            Action::Destroy {
                entity_id: "g-2".to_owned(),
            },
        ));

        run(&mut world, 1.0);
        assert!(!world.get("g-2").unwrap().alive);
        assert_eq!(world.get("g-2").unwrap().time_of_death, Some(1.0));
    }

    #[test]
    fn test_proximity_requires_both_alive() {
        let mut world = World::new();
        world.add_entity(site("g-1", 40.0)).unwrap();
        world.add_entity(site("g-2", 40.01)).unwrap();
        world.get_mut("g-2").unwrap().kill(0.5);
        world.events.push(ScenarioEvent::new(
            "ev-1",
            "close pass",
            Trigger::Proximity {
                entity_a: "g-1".to_owned(),
                entity_b: "g-2".to_owned(),
                range: 50_000.0,
            },
            Action::Destroy {
                entity_id: "g-1".to_owned(),
            },
        ));

        run(&mut world, 1.0);
        assert!(world.get("g-1").unwrap().alive);
        assert!(!world.events[0].fired);
    }

    #[test]
    fn test_detection_trigger_sets_roe() {
        let mut world = World::new();
        let mut radar = site("r-1", 40.0);
        radar.sensor = Some(RadarSensor::new(300_000.0, 0.9));
        world.add_entity(radar).unwrap();
        let mut sam = site("s-1", 40.05);
        sam.roe = Roe::WeaponsHold;
        world.add_entity(sam).unwrap();
        let mut bogey = site("b-1", 40.5);
        bogey.team = Team::Red;
        world.add_entity(bogey).unwrap();

        world.events.push(ScenarioEvent::new(
            "ev-1",
            "contact frees battery",
            Trigger::Detection {
                sensor: "r-1".to_owned(),
                target: "b-1".to_owned(),
            },
            Action::SetRoe {
                entity_id: "s-1".to_owned(),
                roe: Roe::WeaponsFree,
            },
        ));

        // No track yet: nothing happens.
        run(&mut world, 1.0);
        assert_eq!(world.get("s-1").unwrap().roe, Roe::WeaponsHold);

        // Hand the radar a track and re-evaluate.
        world
            .get_mut("r-1")
            .unwrap()
            .sensor
            .as_mut()
            .unwrap()
            .tracks
            .push(SensorTrack {
                target_id: "b-1".to_owned(),
                range: 55_000.0,
                bearing: 0.0,
                last_detected: 1.0,
            });
        run(&mut world, 2.0);
        assert_eq!(world.get("s-1").unwrap().roe, Roe::WeaponsFree);
    }
}
