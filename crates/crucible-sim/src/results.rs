//! Batch result records and cross-run aggregation.
//!
//! Every serialized map is a `BTreeMap` so a fixed seed produces a
//! byte-identical artifact, which is the determinism property the whole
//! batch pipeline is regression-tested against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crucible_core::enums::EngagementOutcome;
use crucible_core::types::Team;
use crucible_core::World;

/// One engagement event, flattened from an entity's log with the source's
/// identity attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementEvent {
    pub time: f64,
    pub source_id: String,
    pub source_name: String,
    pub source_team: Team,
    pub target_id: String,
    pub target_name: String,
    pub result: EngagementOutcome,
    pub weapon_type: String,
}

/// End-of-run status of one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySurvival {
    pub name: String,
    pub team: Team,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Option<String>,
    pub alive: bool,
    pub time_of_death: Option<f64>,
}

/// One Monte Carlo iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub run_index: u32,
    pub seed: u64,
    pub sim_time_final: f64,
    pub engagement_log: Vec<EngagementEvent>,
    pub entity_survival: BTreeMap<String, EntitySurvival>,
}

/// Echo of the batch configuration in the result artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfigEcho {
    pub num_runs: u32,
    pub base_seed: u64,
    pub max_sim_time: f64,
}

/// Survival statistics for one team across all runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalStats {
    /// Combatants fielded per run.
    pub entities: u32,
    /// Mean fraction of the team alive at end of run.
    pub mean_survival_rate: f64,
    /// Population variance of the survival rate across runs.
    pub survival_variance: f64,
}

/// Engagement histogram for one combat role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleHistogram {
    pub launches: u64,
    pub kills: u64,
    pub misses: u64,
    /// Entities of this role destroyed.
    pub losses: u64,
}

/// Cross-run aggregate statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub team_survival: BTreeMap<String, SurvivalStats>,
    pub weapon_launches: BTreeMap<String, u64>,
    pub role_engagements: BTreeMap<String, RoleHistogram>,
    pub total_kills: u64,
}

/// The complete batch artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub config: BatchConfigEcho,
    pub runs: Vec<RunRecord>,
    pub aggregate: AggregateReport,
}

/// Flatten one finished world into a run record. Victim-side records
/// (KILLED_BY) stay on the entity logs and out of the flattened event list.
pub fn collect_run(world: &World, run_index: u32, seed: u64, sim_time_final: f64) -> RunRecord {
    let mut engagement_log: Vec<EngagementEvent> = Vec::new();
    let mut entity_survival: BTreeMap<String, EntitySurvival> = BTreeMap::new();

    for e in world.entities() {
        for rec in &e.log {
            if rec.outcome == EngagementOutcome::KilledBy {
                continue;
            }
            engagement_log.push(EngagementEvent {
                time: rec.time,
                source_id: e.id.clone(),
                source_name: e.name.clone(),
                source_team: e.team,
                target_id: rec.counterpart_id.clone(),
                target_name: rec.counterpart_name.clone(),
                result: rec.outcome,
                weapon_type: e.weapon.kind().label().to_owned(),
            });
        }

        entity_survival.insert(
            e.id.clone(),
            EntitySurvival {
                name: e.name.clone(),
                team: e.team,
                kind: e.kind.clone(),
                role: e.role.map(|r| r.as_str().to_owned()),
                alive: e.alive,
                time_of_death: e.time_of_death,
            },
        );
    }

    engagement_log.sort_by(|a, b| a.time.total_cmp(&b.time));

    RunRecord {
        run_index,
        seed,
        sim_time_final,
        engagement_log,
        entity_survival,
    }
}

/// Fold per-run records into the aggregate block.
pub fn aggregate(runs: &[RunRecord]) -> AggregateReport {
    let mut team_rates: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut team_sizes: BTreeMap<String, u32> = BTreeMap::new();
    let mut weapon_launches: BTreeMap<String, u64> = BTreeMap::new();
    let mut role_engagements: BTreeMap<String, RoleHistogram> = BTreeMap::new();
    let mut total_kills = 0u64;

    for run in runs {
        let mut alive: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
        for surv in run.entity_survival.values() {
            let slot = alive.entry(surv.team.as_str()).or_default();
            slot.1 += 1;
            if surv.alive {
                slot.0 += 1;
            }
            if !surv.alive {
                let role = surv.role.as_deref().unwrap_or("none").to_owned();
                role_engagements.entry(role).or_default().losses += 1;
            }
        }
        for (team, (alive_count, total)) in alive {
            if total == 0 {
                continue;
            }
            team_rates
                .entry(team.to_owned())
                .or_default()
                .push(alive_count as f64 / total as f64);
            team_sizes.insert(team.to_owned(), total);
        }

        for event in &run.engagement_log {
            let role = run
                .entity_survival
                .get(&event.source_id)
                .and_then(|s| s.role.clone())
                .unwrap_or_else(|| "none".to_owned());
            let hist = role_engagements.entry(role).or_default();
            match event.result {
                EngagementOutcome::Launch => {
                    hist.launches += 1;
                    *weapon_launches.entry(event.weapon_type.clone()).or_default() += 1;
                }
                EngagementOutcome::Kill => {
                    hist.kills += 1;
                    total_kills += 1;
                }
                EngagementOutcome::Miss => hist.misses += 1,
                _ => {}
            }
        }
    }

    let team_survival = team_rates
        .into_iter()
        .map(|(team, rates)| {
            let n = rates.len() as f64;
            let mean = rates.iter().sum::<f64>() / n;
            let variance = rates.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;
            (
                team.clone(),
                SurvivalStats {
                    entities: team_sizes.get(&team).copied().unwrap_or(0),
                    mean_survival_rate: mean,
                    survival_variance: variance,
                },
            )
        })
        .collect();

    AggregateReport {
        team_survival,
        weapon_launches,
        role_engagements,
        total_kills,
    }
}
