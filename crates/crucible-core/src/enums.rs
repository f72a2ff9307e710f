//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Physics propagation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicsKind {
    #[default]
    None,
    /// Analytic two-body Kepler propagation in the ECI frame.
    Orbital,
    /// 3-DOF point-mass atmospheric flight on geodetic coordinates.
    Atmospheric,
    /// Fixed geodetic position (ground station, SAM site).
    Static,
}

/// AI controller kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiKind {
    #[default]
    None,
    /// Orbital pursuit/defense around high-value assets.
    OrbitalCombat,
    /// Great-circle waypoint route following.
    WaypointPatrol,
    /// Pure-pursuit intercept of a designated target.
    Intercept,
}

/// Weapon system kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    None,
    /// Single-shot sacrificial orbital kinetic kill vehicle.
    KineticKill,
    /// Surface-to-air missile battery with salvo kill chain.
    SamBattery,
    /// Air-to-air missile system with per-class inventory.
    A2aMissile,
}

impl WeaponKind {
    /// Short label used in result/replay artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            WeaponKind::None => "UNK",
            WeaponKind::KineticKill => "KKV",
            WeaponKind::SamBattery => "SAM",
            WeaponKind::A2aMissile => "A2A",
        }
    }
}

/// Orbital combat role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatRole {
    /// High-value asset: passive, protected by defenders, hunted by attackers.
    Hva,
    /// Stays near its assigned HVA and engages intruders.
    Defender,
    /// Closes on enemy HVAs.
    Attacker,
    /// Screens friendly attackers against enemy defenders.
    Escort,
    /// Hunts enemy attackers and escorts.
    Sweep,
}

impl CombatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatRole::Hva => "hva",
            CombatRole::Defender => "defender",
            CombatRole::Attacker => "attacker",
            CombatRole::Escort => "escort",
            CombatRole::Sweep => "sweep",
        }
    }
}

/// Rules of engagement gating autonomous weapon release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Roe {
    /// Fire on any valid firing solution.
    #[default]
    WeaponsFree,
    /// Fire only on targets currently held by a friendly sensor track.
    WeaponsTight,
    /// Do not fire.
    WeaponsHold,
}

/// SAM battery kill-chain phase (F2T2EA).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamPhase {
    /// Initial detection dwell on a new track.
    #[default]
    Detect,
    /// Computing a firing solution.
    Track,
    /// Salvo in flight; duration equals time-of-flight.
    Engage,
    /// Battle damage assessment before returning to search.
    Assess,
}

/// Air-to-air kill-chain phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum A2aPhase {
    /// Seeker lock dwell; duration depends on the selected class's seeker.
    #[default]
    Lock,
    /// Missile in flight; duration equals time-of-flight.
    Guide,
    /// Battle damage assessment before returning to search.
    Assess,
}

/// Missile seeker family, which sizes the lock dwell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeker {
    /// All-aspect active radar; fast lock.
    ActiveRadar,
    /// Infrared; longer lock.
    Infrared,
}

/// Outcome recorded in an entity's engagement log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementOutcome {
    /// A new target entered a kill chain (SAM DETECT phase start).
    Detect,
    /// One missile/round released at the target.
    Launch,
    /// A salvo committed against the target (SAM ENGAGE transition).
    Engage,
    /// Target destroyed by this entity.
    Kill,
    /// All rounds of the engagement missed.
    Miss,
    /// This entity was destroyed by the counterpart (victim-side record).
    KilledBy,
}
