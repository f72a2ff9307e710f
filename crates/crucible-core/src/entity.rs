//! The flat entity record.
//!
//! All per-concern state (physics, AI, sensor, weapon) lives on one struct,
//! as kind-tagged sum types dispatched by systems. Entities carry plain data;
//! behavior lives in the sim crate's systems.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::tables::AircraftConfig;
use crate::types::{Geodetic, Team};

/// One record in an entity's engagement log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub time: f64,
    pub outcome: EngagementOutcome,
    pub counterpart_id: String,
    pub counterpart_name: String,
}

// --- Physics ---

/// ECI state for orbital entities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitalState {
    /// Position in the ECI frame (meters).
    pub pos_eci: DVec3,
    /// Velocity in the ECI frame (m/s).
    pub vel_eci: DVec3,
}

/// 3-DOF flight state for atmospheric entities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightState {
    /// True airspeed (m/s).
    pub speed: f64,
    /// Heading (radians, true north, clockwise).
    pub heading: f64,
    /// Flight-path angle (radians).
    pub gamma: f64,
    /// Bank angle (radians).
    pub roll: f64,
    /// Angle of attack (radians).
    pub alpha: f64,
    /// Throttle position in [0, 1].
    pub throttle: f64,
    pub engine_on: bool,
    /// Current Mach number (updated by the propagator).
    pub mach: f64,
    /// Performance parameters resolved from the aircraft-class table.
    pub aircraft: AircraftConfig,
}

impl FlightState {
    pub fn new(aircraft: AircraftConfig, speed: f64, heading: f64) -> Self {
        Self {
            speed,
            heading,
            gamma: 0.0,
            roll: 0.0,
            alpha: 0.0,
            throttle: 0.8,
            engine_on: true,
            mach: 0.0,
            aircraft,
        }
    }
}

/// Physics sub-state, tagged by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PhysicsState {
    #[default]
    None,
    Orbital(OrbitalState),
    Atmospheric(FlightState),
    Static,
}

impl PhysicsState {
    pub fn kind(&self) -> PhysicsKind {
        match self {
            PhysicsState::None => PhysicsKind::None,
            PhysicsState::Orbital(_) => PhysicsKind::Orbital,
            PhysicsState::Atmospheric(_) => PhysicsKind::Atmospheric,
            PhysicsState::Static => PhysicsKind::Static,
        }
    }
}

// --- AI ---

/// One waypoint on a patrol route. Lat/lon in radians, altitude in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    /// Desired speed at this leg (m/s; 0 = maintain current).
    pub speed: f64,
}

impl Waypoint {
    pub fn from_degrees(lat_deg: f64, lon_deg: f64, alt_m: f64, speed: f64) -> Self {
        Self {
            lat: lat_deg.to_radians(),
            lon: lon_deg.to_radians(),
            alt: alt_m,
            speed,
        }
    }
}

/// Waypoint patrol memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolAi {
    pub waypoints: Vec<Waypoint>,
    pub index: usize,
    /// Loop back to the first waypoint after the last, or hold at the last.
    pub loop_route: bool,
}

/// Pure-pursuit intercept memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptAi {
    /// Designated target; `None` = idle.
    pub target_id: Option<String>,
    /// Slant range at which the weapon system is signaled (meters).
    pub engage_range: f64,
    /// True while within engage range of a live target.
    pub engaged: bool,
    /// Route to revert to if the target dies; empty = idle.
    pub patrol_fallback: Vec<Waypoint>,
}

/// Orbital combat memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalCombatAi {
    /// Detection range for the periodic scan (meters).
    pub sensor_range: f64,
    /// Defenders engage intruders within this radius of their HVA (meters).
    pub defense_radius: f64,
    /// Available thrust acceleration (m/s²).
    pub max_accel: f64,
    /// Range at which the kinetic kill weapon is signaled (meters).
    pub kill_range: f64,
    /// Seconds between target scans.
    pub scan_interval: f64,
    pub scan_timer: f64,
    /// HVA this entity protects (defenders only).
    pub assigned_hva: Option<String>,
    /// Currently selected target.
    pub current_target: Option<String>,
}

impl OrbitalCombatAi {
    pub fn new(sensor_range: f64, kill_range: f64, max_accel: f64) -> Self {
        Self {
            sensor_range,
            defense_radius: 500_000.0,
            max_accel,
            kill_range,
            scan_interval: 1.0,
            scan_timer: 0.0,
            assigned_hva: None,
            current_target: None,
        }
    }
}

/// AI sub-state, tagged by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    None,
    OrbitalCombat(OrbitalCombatAi),
    WaypointPatrol(PatrolAi),
    Intercept(InterceptAi),
}

impl AiState {
    pub fn kind(&self) -> AiKind {
        match self {
            AiState::None => AiKind::None,
            AiState::OrbitalCombat(_) => AiKind::OrbitalCombat,
            AiState::WaypointPatrol(_) => AiKind::WaypointPatrol,
            AiState::Intercept(_) => AiKind::Intercept,
        }
    }
}

// --- Sensors ---

/// One target currently held by a radar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorTrack {
    pub target_id: String,
    /// Slant range at last detection (meters).
    pub range: f64,
    /// Bearing at last detection (radians from north).
    pub bearing: f64,
    /// Sim time of the last successful detection roll.
    pub last_detected: f64,
}

/// Periodic-sweep radar sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarSensor {
    /// Maximum detection range (meters).
    pub max_range: f64,
    /// Elevation gate (radians).
    pub min_elevation: f64,
    pub max_elevation: f64,
    /// Seconds per sweep.
    pub sweep_interval: f64,
    /// Accumulated time since the last sweep; always in [0, sweep_interval).
    pub sweep_timer: f64,
    /// Detection probability at zero range; falls off with range.
    pub detect_probability: f64,
    /// Tracks undetected for longer than this are dropped (seconds).
    pub track_timeout: f64,
    pub tracks: Vec<SensorTrack>,
}

impl RadarSensor {
    pub fn new(max_range: f64, detect_probability: f64) -> Self {
        Self {
            max_range,
            min_elevation: (-5.0_f64).to_radians(),
            max_elevation: 80.0_f64.to_radians(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            sweep_timer: 0.0,
            detect_probability,
            track_timeout: DEFAULT_TRACK_TIMEOUT,
            tracks: Vec::new(),
        }
    }

    /// Whether `target_id` is currently held as a track.
    pub fn holds(&self, target_id: &str) -> bool {
        self.tracks.iter().any(|t| t.target_id == target_id)
    }
}

// --- Weapons ---

/// Single-shot sacrificial kinetic kill vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KineticKill {
    pub pk: f64,
    /// Inertial range within which the Pk roll happens (meters).
    pub kill_range: f64,
    pub cooldown: f64,
    pub cooldown_timer: f64,
    /// Target designated by the AI controller this tick.
    pub target_id: Option<String>,
    /// Target of the last LAUNCH record, to log each engagement once.
    pub last_launch_target: Option<String>,
}

impl KineticKill {
    pub fn new(pk: f64, kill_range: f64) -> Self {
        Self {
            pk,
            kill_range,
            cooldown: KKV_COOLDOWN_SECS,
            cooldown_timer: 0.0,
            target_id: None,
            last_launch_target: None,
        }
    }
}

/// One in-progress SAM engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamEngagement {
    pub target_id: String,
    pub phase: SamPhase,
    /// Seconds remaining in the current phase.
    pub timer: f64,
    pub missiles_fired: u32,
}

/// Surface-to-air missile battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamBattery {
    pub min_range: f64,
    pub max_range: f64,
    /// Maximum target altitude (meters).
    pub max_altitude: f64,
    /// Missile average speed, used to size the ENGAGE phase (m/s).
    pub missile_speed: f64,
    pub missiles_ready: u32,
    pub salvo_size: u32,
    pub pk_per_missile: f64,
    /// Reload time after a salvo before the next can fire (seconds).
    pub reload_time: f64,
    pub reload_timer: f64,
    pub engagements: Vec<SamEngagement>,
}

impl SamBattery {
    pub fn new(max_range: f64, missiles_ready: u32, salvo_size: u32, pk: f64) -> Self {
        Self {
            min_range: 5_000.0,
            max_range,
            max_altitude: 25_000.0,
            missile_speed: 1_200.0,
            missiles_ready,
            salvo_size,
            pk_per_missile: pk,
            reload_time: SAM_RELOAD_SECS,
            reload_timer: 0.0,
            engagements: Vec::new(),
        }
    }

    pub fn is_engaging(&self, target_id: &str) -> bool {
        self.engagements.iter().any(|e| e.target_id == target_id)
    }
}

/// One air-to-air missile class with its own envelope and inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileClass {
    pub name: String,
    pub seeker: Seeker,
    pub min_range: f64,
    pub max_range: f64,
    pub pk: f64,
    /// Average flight speed, for time-of-flight (m/s).
    pub speed: f64,
    pub rounds: u32,
}

impl MissileClass {
    /// Seeker-dependent lock dwell (seconds).
    pub fn lock_time(&self) -> f64 {
        match self.seeker {
            Seeker::ActiveRadar => LOCK_SECS_ACTIVE_RADAR,
            Seeker::Infrared => LOCK_SECS_INFRARED,
        }
    }
}

/// One in-progress air-to-air engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2aEngagement {
    pub target_id: String,
    pub phase: A2aPhase,
    /// Seconds remaining in the current phase.
    pub timer: f64,
    /// Index into the owning `AirToAir::classes`.
    pub class: usize,
}

/// Air-to-air missile system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirToAir {
    pub classes: Vec<MissileClass>,
    pub engagements: Vec<A2aEngagement>,
}

impl AirToAir {
    pub fn new(classes: Vec<MissileClass>) -> Self {
        Self {
            classes,
            engagements: Vec::new(),
        }
    }

    pub fn is_engaging(&self, target_id: &str) -> bool {
        self.engagements.iter().any(|e| e.target_id == target_id)
    }

    /// Winchester check: any rounds left across all classes.
    pub fn has_ammo(&self) -> bool {
        self.classes.iter().any(|c| c.rounds > 0)
    }

    /// Select the best class for `range`: the shortest-max-range class that
    /// still covers the target, with rounds remaining.
    pub fn select_class(&self, range: f64) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, class) in self.classes.iter().enumerate() {
            if class.rounds == 0 {
                continue;
            }
            if range < class.min_range || range > class.max_range {
                continue;
            }
            match best {
                Some(b) if self.classes[b].max_range <= class.max_range => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

/// Weapon sub-state, tagged by kind. At most one kill chain per entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    None,
    KineticKill(KineticKill),
    SamBattery(SamBattery),
    AirToAir(AirToAir),
}

impl WeaponState {
    pub fn kind(&self) -> WeaponKind {
        match self {
            WeaponState::None => WeaponKind::None,
            WeaponState::KineticKill(_) => WeaponKind::KineticKill,
            WeaponState::SamBattery(_) => WeaponKind::SamBattery,
            WeaponState::AirToAir(_) => WeaponKind::A2aMissile,
        }
    }

    /// Maximum engagement range, for visualization rings.
    pub fn max_range(&self) -> Option<f64> {
        match self {
            WeaponState::None => None,
            WeaponState::KineticKill(kk) => Some(kk.kill_range),
            WeaponState::SamBattery(sam) => Some(sam.max_range),
            WeaponState::AirToAir(a2a) => a2a
                .classes
                .iter()
                .map(|c| c.max_range)
                .fold(None, |acc, r| Some(acc.map_or(r, |a: f64| a.max(r)))),
        }
    }
}

// --- The entity record ---

/// The unit of simulation: one flat record carrying identity, physics,
/// AI, sensor and weapon sub-state, and the engagement log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier; immutable once the entity is in the world.
    pub id: String,
    pub name: String,
    /// Scenario type label ("satellite", "aircraft", "sam", ...).
    pub kind: String,
    pub team: Team,
    pub role: Option<CombatRole>,

    /// Dead entities stay in the store for reporting but are skipped by
    /// every system.
    pub alive: bool,
    pub time_of_death: Option<f64>,

    /// Flagged in the source scenario as human-flown; run headlessly it is
    /// auto-assigned a small patrol loop during world preparation.
    pub externally_piloted: bool,

    /// Derived geodetic position, resynced after every physics step.
    pub geodetic: Geodetic,

    pub physics: PhysicsState,
    pub ai: AiState,
    pub sensor: Option<RadarSensor>,
    pub weapon: WeaponState,
    pub roe: Roe,

    /// Ordered per-entity engagement history.
    pub log: Vec<EngagementRecord>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>, team: Team) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            team,
            alive: true,
            ..Default::default()
        }
    }

    /// Mark the entity dead at `time`. Idempotent: a dead entity stays dead
    /// and keeps its original time of death.
    pub fn kill(&mut self, time: f64) {
        if self.alive {
            self.alive = false;
            self.time_of_death = Some(time);
        }
    }

    /// Append a record to the engagement log.
    pub fn log_event(
        &mut self,
        time: f64,
        outcome: EngagementOutcome,
        counterpart_id: &str,
        counterpart_name: &str,
    ) {
        self.log.push(EngagementRecord {
            time,
            outcome,
            counterpart_id: counterpart_id.to_owned(),
            counterpart_name: counterpart_name.to_owned(),
        });
    }

    /// Whether this entity takes part in combat (has an AI or a weapon).
    /// This is the population counted by early-stop checks and replay
    /// summaries.
    pub fn is_combatant(&self) -> bool {
        self.ai.kind() != AiKind::None || self.weapon.kind() != WeaponKind::None
    }
}
