//! Radar sensor system — periodic sweep detection.
//!
//! Each sensing entity accumulates a sweep timer; at every completed sweep
//! period it evaluates all live opposing-team entities against range and
//! elevation gates, skips ground-to-ground pairs, and rolls a detection
//! check whose probability falls off with range. Successful detections
//! upsert a track with a timestamp; tracks undetected for longer than the
//! stale timeout are dropped.

use crucible_core::constants::GROUND_ALT_THRESHOLD;
use crucible_core::entity::{Entity, SensorTrack};
use crucible_core::rng::SimRng;
use crucible_core::World;
use crucible_geo::frames::entity_ecef;
use crucible_geo::geodesy::{elevation_angle, great_circle_bearing};

/// Detection probability at `range` for a radar with base probability
/// `base` and maximum range `max_range`. Quartic falloff: near-certain up
/// close, vanishing at the range gate.
pub fn detection_probability(base: f64, range: f64, max_range: f64) -> f64 {
    if max_range <= 0.0 {
        return 0.0;
    }
    let x = (range / max_range).clamp(0.0, 1.0);
    (base * (1.0 - x * x * x * x)).clamp(0.0, 1.0)
}

/// Run all radar sweeps for this tick.
pub fn run(world: &mut World, dt: f64, now: f64, rng: &mut SimRng) {
    for i in 0..world.len() {
        {
            let e = &world.entities()[i];
            if !e.alive || e.sensor.is_none() {
                continue;
            }
        }
        let mut e = world.detach(i);
        update_sensor(&mut e, world, dt, now, rng);
        world.restore(i, e);
    }
}

fn update_sensor(e: &mut Entity, world: &World, dt: f64, now: f64, rng: &mut SimRng) {
    let own_ecef = entity_ecef(e, now);
    let own_geo = e.geodetic;
    let own_team = e.team;

    let Some(sensor) = e.sensor.as_mut() else {
        return;
    };

    sensor.sweep_timer += dt;
    if sensor.sweep_timer >= sensor.sweep_interval {
        sensor.sweep_timer = 0.0;

        for target in world.entities() {
            if !target.alive {
                continue;
            }
            if !own_team.is_hostile_to(target.team) {
                continue;
            }
            // Ground-to-ground pairs are skipped: surface radars don't chase
            // surface clutter.
            if own_geo.alt < GROUND_ALT_THRESHOLD && target.geodetic.alt < GROUND_ALT_THRESHOLD {
                continue;
            }

            let range = own_ecef.distance(entity_ecef(target, now));
            if range > sensor.max_range {
                continue;
            }

            let elev = elevation_angle(&own_geo, &target.geodetic);
            if elev < sensor.min_elevation || elev > sensor.max_elevation {
                continue;
            }

            let pd = detection_probability(sensor.detect_probability, range, sensor.max_range);
            if !rng.bernoulli(pd) {
                continue;
            }

            let bearing = great_circle_bearing(&own_geo, &target.geodetic);
            match sensor.tracks.iter_mut().find(|t| t.target_id == target.id) {
                Some(track) => {
                    track.range = range;
                    track.bearing = bearing;
                    track.last_detected = now;
                }
                None => sensor.tracks.push(SensorTrack {
                    target_id: target.id.clone(),
                    range,
                    bearing,
                    last_detected: now,
                }),
            }
        }
    }

    // Stale tracks age out even between sweeps.
    let timeout = sensor.track_timeout;
    sensor.tracks.retain(|t| now - t.last_detected <= timeout);
}
