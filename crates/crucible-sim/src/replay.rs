//! Replay artifact writer.
//!
//! Collects ECEF trajectory samples at a fixed interval during a single
//! deterministic run, together with a discrete event list and death times,
//! and produces the `replay_v1` document consumed by external playback.

use serde::{Deserialize, Serialize};

use crucible_core::config::RunConfig;
use crucible_core::enums::EngagementOutcome;
use crucible_core::types::Team;
use crucible_core::World;
use crucible_geo::frames::entity_ecef;

/// Configuration echo in the replay artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayConfigEcho {
    pub seed: u64,
    pub duration: f64,
    pub sample_interval: f64,
}

/// Sample timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayTimeline {
    pub end_time: f64,
    pub sample_times: Vec<f64>,
}

/// Per-entity replay record: identity plus a dense position array aligned
/// to the sample timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEntity {
    pub id: String,
    pub name: String,
    pub team: Team,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Option<String>,
    pub death_time: Option<f64>,
    /// Maximum weapon range, for visualization rings.
    pub weapon_range: Option<f64>,
    /// Radar range, for visualization rings.
    pub sensor_range: Option<f64>,
    /// ECEF positions, one per sample time.
    pub positions: Vec<[f64; 3]>,
}

/// One discrete replay event with endpoint positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEvent {
    pub time: f64,
    #[serde(rename = "type")]
    pub kind: EngagementOutcome,
    pub source_id: String,
    pub target_id: String,
    pub source_position: [f64; 3],
    pub target_position: [f64; 3],
}

/// Headline numbers for the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub blue_alive: u32,
    pub blue_total: u32,
    pub red_alive: u32,
    pub red_total: u32,
    pub total_kills: u32,
    pub total_launches: u32,
}

/// The complete replay artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayDocument {
    pub format: String,
    pub config: ReplayConfigEcho,
    pub timeline: ReplayTimeline,
    pub entities: Vec<ReplayEntity>,
    pub events: Vec<ReplayEvent>,
    pub summary: ReplaySummary,
}

/// Accumulates samples and events during a replay run.
pub struct ReplayWriter {
    sample_interval: f64,
    next_sample_time: f64,
    sample_times: Vec<f64>,
    /// Per-entity trajectories, indexed by container order.
    positions: Vec<Vec<[f64; 3]>>,
    death_times: Vec<Option<f64>>,
    events: Vec<ReplayEvent>,
}

impl ReplayWriter {
    pub fn new(world: &World, sample_interval: f64) -> Self {
        let n = world.len();
        Self {
            sample_interval,
            next_sample_time: 0.0,
            sample_times: Vec::new(),
            positions: vec![Vec::new(); n],
            death_times: vec![None; n],
            events: Vec::new(),
        }
    }

    /// Sample all entity positions if the sample interval has elapsed.
    /// Dead entities repeat their last known position. Returns whether a
    /// sample was taken.
    pub fn sample(&mut self, world: &World) -> bool {
        if world.sim_time < self.next_sample_time {
            return false;
        }
        let t = world.sim_time;
        self.sample_times.push(t);

        for (i, e) in world.entities().iter().enumerate() {
            let pos = if e.alive {
                let ecef = entity_ecef(e, t);
                [ecef.x, ecef.y, ecef.z]
            } else {
                self.positions[i].last().copied().unwrap_or([0.0, 0.0, 0.0])
            };
            self.positions[i].push(pos);
        }

        self.next_sample_time = t + self.sample_interval;
        true
    }

    pub fn record_death(&mut self, entity_index: usize, time: f64) {
        if let Some(slot) = self.death_times.get_mut(entity_index) {
            *slot = Some(time);
        }
    }

    pub fn record_event(&mut self, event: ReplayEvent) {
        self.events.push(event);
    }

    /// Assemble the artifact. Events are emitted in time order.
    pub fn finish(mut self, config: &RunConfig, world: &World) -> ReplayDocument {
        self.events.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut summary = ReplaySummary {
            blue_alive: 0,
            blue_total: 0,
            red_alive: 0,
            red_total: 0,
            total_kills: 0,
            total_launches: 0,
        };
        for (i, e) in world.entities().iter().enumerate() {
            if !e.is_combatant() {
                continue;
            }
            let alive = self.death_times[i].is_none();
            match e.team {
                Team::Blue => {
                    summary.blue_total += 1;
                    if alive {
                        summary.blue_alive += 1;
                    }
                }
                Team::Red => {
                    summary.red_total += 1;
                    if alive {
                        summary.red_alive += 1;
                    }
                }
                Team::Neutral => {}
            }
        }
        for event in &self.events {
            match event.kind {
                EngagementOutcome::Kill => summary.total_kills += 1,
                EngagementOutcome::Launch => summary.total_launches += 1,
                _ => {}
            }
        }

        let entities = world
            .entities()
            .iter()
            .enumerate()
            .map(|(i, e)| ReplayEntity {
                id: e.id.clone(),
                name: e.name.clone(),
                team: e.team,
                kind: e.kind.clone(),
                role: e.role.map(|r| r.as_str().to_owned()),
                death_time: self.death_times[i],
                weapon_range: e.weapon.max_range(),
                sensor_range: e.sensor.as_ref().map(|s| s.max_range),
                positions: std::mem::take(&mut self.positions[i]),
            })
            .collect();

        ReplayDocument {
            format: "replay_v1".to_owned(),
            config: ReplayConfigEcho {
                seed: config.seed,
                duration: config.max_sim_time,
                sample_interval: config.sample_interval,
            },
            timeline: ReplayTimeline {
                end_time: self.sample_times.last().copied().unwrap_or(0.0),
                sample_times: self.sample_times,
            },
            entities,
            events: self.events,
            summary,
        }
    }
}
