//! Batch Monte Carlo driver and replay driver.
//!
//! Batch mode runs N independent simulations, each with a fresh world
//! cloned from the read-only scenario template and a run-local RNG stream
//! derived from the base seed, so per-run mutation can never leak between
//! runs. Replay mode drives one deterministic run while sampling
//! trajectories for external playback. All file output belongs to the
//! caller; nothing here blocks inside the simulation loop.

use tracing::debug;

use crucible_core::config::RunConfig;
use crucible_core::enums::EngagementOutcome;
use crucible_core::error::ConfigError;
use crucible_core::rng::{run_seed, SimRng};
use crucible_core::World;
use crucible_geo::frames::entity_ecef;

use crate::engine::SimEngine;
use crate::replay::{ReplayDocument, ReplayEvent, ReplayWriter};
use crate::results::{self, BatchConfigEcho, BatchReport, RunRecord};

/// Runs the orchestrator N times and aggregates, or once for replay.
pub struct BatchRunner {
    config: RunConfig,
}

impl BatchRunner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the full batch against a scenario template.
    pub fn run(&self, template: &World) -> Result<BatchReport, ConfigError> {
        let mut runs: Vec<RunRecord> = Vec::with_capacity(self.config.num_runs as usize);

        for run_index in 0..self.config.num_runs {
            let seed = run_seed(self.config.seed, run_index);
            let rng = SimRng::new(seed);
            let mut engine = SimEngine::new(template.clone(), &self.config, rng)?;
            let final_time = engine.run_to_completion(self.config.max_sim_time);

            let record = results::collect_run(engine.world(), run_index, seed, final_time);
            debug!(
                run = run_index,
                seed,
                final_time,
                engagements = record.engagement_log.len(),
                "run complete"
            );
            runs.push(record);
        }

        let aggregate = results::aggregate(&runs);
        Ok(BatchReport {
            config: BatchConfigEcho {
                num_runs: self.config.num_runs,
                base_seed: self.config.seed,
                max_sim_time: self.config.max_sim_time,
            },
            runs,
            aggregate,
        })
    }

    /// Run once with trajectory sampling and produce the replay artifact.
    pub fn run_replay(&self, template: &World) -> Result<ReplayDocument, ConfigError> {
        let rng = SimRng::new(self.config.seed);
        let mut engine = SimEngine::new(template.clone(), &self.config, rng)?;

        let entity_count = engine.world().len();
        let mut writer = ReplayWriter::new(engine.world(), self.config.sample_interval);
        let mut was_alive: Vec<bool> = engine.world().entities().iter().map(|e| e.alive).collect();
        let mut log_cursor: Vec<usize> =
            engine.world().entities().iter().map(|e| e.log.len()).collect();

        // Initial sample at t = 0.
        writer.sample(engine.world());

        let total_ticks = (self.config.max_sim_time / self.config.dt).ceil() as u64;
        for _ in 0..total_ticks {
            engine.tick();
            writer.sample(engine.world());

            let world = engine.world();
            let now = world.sim_time;
            for i in 0..entity_count {
                let e = &world.entities()[i];

                if was_alive[i] && !e.alive {
                    was_alive[i] = false;
                    writer.record_death(i, e.time_of_death.unwrap_or(now));
                }

                // Only records appended since the last tick.
                for rec in &e.log[log_cursor[i]..] {
                    if rec.outcome == EngagementOutcome::KilledBy {
                        continue;
                    }
                    let source = entity_ecef(e, now);
                    let target = world
                        .get(&rec.counterpart_id)
                        .map(|t| entity_ecef(t, now))
                        .unwrap_or_default();
                    writer.record_event(ReplayEvent {
                        time: rec.time,
                        kind: rec.outcome,
                        source_id: e.id.clone(),
                        target_id: rec.counterpart_id.clone(),
                        source_position: [source.x, source.y, source.z],
                        target_position: [target.x, target.y, target.z],
                    });
                }
                log_cursor[i] = e.log.len();
            }

            if engine.combat_resolved() {
                writer.sample(engine.world());
                break;
            }
        }

        Ok(writer.finish(&self.config, engine.world()))
    }
}
