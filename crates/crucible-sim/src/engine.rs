//! Single-run orchestrator.
//!
//! `SimEngine` owns the world, the run-local RNG, and the clock. Each tick
//! executes the fixed phase order AI → Physics → Sensors → Weapons → Events;
//! the ordering is a design decision, not an accident: AI acts on the
//! previous tick's sensor picture before physics moves anyone, sensors
//! re-detect after the move, and weapons resolve against freshly updated
//! tracks, with events able to react to anything earlier in the same tick.

use std::collections::HashSet;

use crucible_core::config::RunConfig;
use crucible_core::enums::{AiKind, CombatRole, PhysicsKind};
use crucible_core::error::ConfigError;
use crucible_core::rng::SimRng;
use crucible_core::types::{SimTime, Team};
use crucible_core::World;

use crate::setup;
use crate::systems;

/// The simulation engine for one run. Strictly single-threaded and
/// sequential; batch runs own one engine each.
#[derive(Debug)]
pub struct SimEngine {
    world: World,
    rng: SimRng,
    time: SimTime,
}

impl SimEngine {
    /// Validate and prepare the world, then build an engine positioned at
    /// t = 0. Configuration errors are fatal: partial setup cannot be
    /// safely simulated.
    pub fn new(mut world: World, config: &RunConfig, rng: SimRng) -> Result<Self, ConfigError> {
        setup::validate(&world, config)?;
        setup::prepare(&mut world);
        world.sim_time = 0.0;
        Ok(Self {
            world,
            rng,
            time: SimTime::new(config.dt),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        self.time.advance();
        let dt = self.time.dt;
        let now = self.time.elapsed_secs;
        self.world.sim_time = now;

        // 1. AI
        systems::orbital_combat::run(&mut self.world, dt);
        systems::waypoint::run(&mut self.world, dt);
        systems::intercept::run(&mut self.world, dt);

        // 2. Physics
        systems::kepler::run(&mut self.world, dt, now);
        systems::flight::run(&mut self.world, dt);

        // 3. Sensors
        systems::radar::run(&mut self.world, dt, now, &mut self.rng);

        // 4. Weapons
        systems::kinetic_kill::run(&mut self.world, dt, now, &mut self.rng);
        systems::sam_battery::run(&mut self.world, dt, now, &mut self.rng);
        systems::a2a_missile::run(&mut self.world, dt, now, &mut self.rng);

        // 5. Events
        systems::events::run(&mut self.world, now);

        // Entities killed this tick must not linger in anyone's track list.
        self.purge_dead_tracks();
    }

    /// Tick until the time limit or until combat resolves. Returns the final
    /// sim time. No I/O happens inside this loop.
    pub fn run_to_completion(&mut self, max_sim_time: f64) -> f64 {
        let total_ticks = (max_sim_time / self.time.dt).ceil() as u64;
        for _ in 0..total_ticks {
            self.tick();
            if self.combat_resolved() {
                break;
            }
        }
        self.time.elapsed_secs
    }

    /// Early-stop predicate: a side that fielded HVAs or orbital combat
    /// units and lost them all (orbital), or fielded combat aircraft and
    /// lost them all (atmospheric), resolves the run. A side that never
    /// fielded a category does not count against it, so one-sided
    /// scenarios (a SAM belt versus a raid) run to their own conclusion.
    pub fn combat_resolved(&self) -> bool {
        // (fielded, alive) per team for each category.
        let mut hva = Tally::default();
        let mut orbital = Tally::default();
        let mut air = Tally::default();

        for e in self.world.entities() {
            if e.ai.kind() == AiKind::OrbitalCombat && e.role.is_some() {
                if e.role == Some(CombatRole::Hva) {
                    hva.count(e.team, e.alive);
                } else {
                    orbital.count(e.team, e.alive);
                }
            }
            if e.physics.kind() == PhysicsKind::Atmospheric && e.is_combatant() {
                air.count(e.team, e.alive);
            }
        }

        hva.one_side_wiped_out() || orbital.one_side_wiped_out() || air.one_side_wiped_out()
    }

    /// Drop sensor tracks that reference entities no longer alive, so a kill
    /// in the weapons phase is invisible to sensors within the same tick.
    fn purge_dead_tracks(&mut self) {
        let dead: HashSet<String> = self
            .world
            .entities()
            .iter()
            .filter(|e| !e.alive)
            .map(|e| e.id.clone())
            .collect();
        if dead.is_empty() {
            return;
        }
        for e in self.world.entities_mut() {
            if let Some(sensor) = e.sensor.as_mut() {
                sensor.tracks.retain(|t| !dead.contains(&t.target_id));
            }
        }
    }
}

/// Fielded/alive counts per team for one combat category.
#[derive(Debug, Default)]
struct Tally {
    blue_fielded: u32,
    blue_alive: u32,
    red_fielded: u32,
    red_alive: u32,
}

impl Tally {
    fn count(&mut self, team: Team, alive: bool) {
        match team {
            Team::Blue => {
                self.blue_fielded += 1;
                if alive {
                    self.blue_alive += 1;
                }
            }
            Team::Red => {
                self.red_fielded += 1;
                if alive {
                    self.red_alive += 1;
                }
            }
            Team::Neutral => {}
        }
    }

    fn one_side_wiped_out(&self) -> bool {
        (self.blue_fielded > 0 && self.blue_alive == 0)
            || (self.red_fielded > 0 && self.red_alive == 0)
    }
}
