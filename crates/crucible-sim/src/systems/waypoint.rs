//! Waypoint patrol AI — fly a great-circle route with optional looping.
//!
//! Steering: bank proportional to heading error, alpha for altitude hold,
//! throttle ramp for speed hold. A waypoint is captured within 2 km and the
//! route advances, looping or holding at the last waypoint per configuration.

use crucible_core::constants::*;
use crucible_core::entity::{AiState, FlightState, PatrolAi, PhysicsState};
use crucible_core::types::Geodetic;
use crucible_core::World;
use crucible_geo::geodesy::{angle_diff, great_circle_bearing, haversine_distance};

/// Steer all live patrol entities toward their active waypoint.
pub fn run(world: &mut World, dt: f64) {
    for e in world.entities_mut() {
        if !e.alive {
            continue;
        }
        let geo = e.geodetic;
        let AiState::WaypointPatrol(patrol) = &mut e.ai else {
            continue;
        };
        if patrol.waypoints.is_empty() {
            continue;
        }
        let PhysicsState::Atmospheric(flight) = &mut e.physics else {
            continue;
        };
        fly_leg(patrol, flight, &geo, dt);
    }
}

fn fly_leg(patrol: &mut PatrolAi, flight: &mut FlightState, geo: &Geodetic, dt: f64) {
    let wp = patrol.waypoints[patrol.index];
    let wp_geo = Geodetic::new(wp.lat, wp.lon, wp.alt);

    let bearing = great_circle_bearing(geo, &wp_geo);
    let distance = haversine_distance(geo, &wp_geo);

    let desired_speed = if wp.speed > 0.0 { wp.speed } else { flight.speed };
    steer_toward(flight, geo, bearing, wp.alt, desired_speed, dt);

    if distance < WAYPOINT_CAPTURE_RADIUS {
        patrol.index += 1;
        if patrol.index >= patrol.waypoints.len() {
            patrol.index = if patrol.loop_route {
                0
            } else {
                patrol.waypoints.len() - 1
            };
        }
    }
}

/// Shared steering law: bank toward the desired heading, trim alpha for the
/// desired altitude, ramp throttle for the desired speed. Also used by the
/// intercept controller.
pub(crate) fn steer_toward(
    flight: &mut FlightState,
    geo: &Geodetic,
    desired_heading: f64,
    desired_alt: f64,
    desired_speed: f64,
    dt: f64,
) {
    let heading_error = angle_diff(desired_heading, flight.heading);
    let roll_cmd = (heading_error * BANK_GAIN).clamp(-MAX_BANK, MAX_BANK);
    let roll_rate = (dt * 3.0).min(1.0);
    flight.roll += (roll_cmd - flight.roll) * roll_rate;

    let alt_error = desired_alt - geo.alt;
    flight.alpha = (alt_error * ALPHA_ALT_GAIN).clamp(-ALPHA_LIMIT, ALPHA_LIMIT);

    if flight.speed < desired_speed * 0.95 {
        flight.throttle += 0.1 * dt;
    } else if flight.speed > desired_speed * 1.05 {
        flight.throttle -= 0.1 * dt;
    }
    flight.throttle = flight.throttle.clamp(0.3, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crucible_core::entity::{Entity, Waypoint};
    use crucible_core::tables;
    use crucible_core::types::Team;

    fn patrol_aircraft(id: &str, waypoints: Vec<Waypoint>, loop_route: bool) -> Entity {
        let mut e = Entity::new(id, id, "aircraft", Team::Blue);
        e.geodetic = Geodetic::from_degrees(40.0, 10.0, 8_000.0);
        e.physics =
            PhysicsState::Atmospheric(FlightState::new(*tables::aircraft_config("f16"), 250.0, 0.0));
        e.ai = AiState::WaypointPatrol(PatrolAi {
            waypoints,
            index: 0,
            loop_route,
        });
        e
    }

    #[test]
    fn test_waypoint_capture_advances_index() {
        // First waypoint right on top of the start point; second far away.
        let wps = vec![
            Waypoint::from_degrees(40.0, 10.0, 8_000.0, 250.0),
            Waypoint::from_degrees(41.0, 10.0, 8_000.0, 250.0),
        ];
        let mut world = World::new();
        world.add_entity(patrol_aircraft("a-1", wps, true)).unwrap();

        run(&mut world, 0.1);

        let AiState::WaypointPatrol(p) = &world.get("a-1").unwrap().ai else {
            panic!("ai state lost");
        };
        assert_eq!(p.index, 1);
    }

    #[test]
    fn test_hold_at_last_waypoint_without_loop() {
        let wps = vec![Waypoint::from_degrees(40.0, 10.0, 8_000.0, 250.0)];
        let mut world = World::new();
        world.add_entity(patrol_aircraft("a-1", wps, false)).unwrap();

        for _ in 0..5 {
            run(&mut world, 0.1);
        }

        let AiState::WaypointPatrol(p) = &world.get("a-1").unwrap().ai else {
            panic!("ai state lost");
        };
        assert_eq!(p.index, 0, "non-looping route holds at the last waypoint");
    }

    #[test]
    fn test_steering_banks_toward_waypoint() {
        // Waypoint due east while heading north: expect a right bank.
        let wps = vec![Waypoint::from_degrees(40.0, 12.0, 8_000.0, 250.0)];
        let mut world = World::new();
        world.add_entity(patrol_aircraft("a-1", wps, true)).unwrap();

        for _ in 0..20 {
            run(&mut world, 0.1);
        }

        let PhysicsState::Atmospheric(f) = &world.get("a-1").unwrap().physics else {
            panic!("flight state lost");
        };
        assert!(f.roll > 0.1, "expected right bank, roll {}", f.roll);
    }
}
