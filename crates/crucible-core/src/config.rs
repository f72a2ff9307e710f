//! Run configuration consumed by the orchestrator and batch driver.

use serde::{Deserialize, Serialize};

/// Configuration for a batch or replay run. Same seed = same outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base RNG seed; batch runs derive per-run seeds from it.
    pub seed: u64,
    /// Number of Monte Carlo iterations (batch mode).
    pub num_runs: u32,
    /// Simulation time limit per run (seconds).
    pub max_sim_time: f64,
    /// Tick size (seconds).
    pub dt: f64,
    /// Seconds between trajectory samples (replay mode).
    pub sample_interval: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_runs: 100,
            max_sim_time: 600.0,
            dt: 0.1,
            sample_interval: 2.0,
        }
    }
}
