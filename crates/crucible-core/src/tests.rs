//! Tests for the entity record, kind dispatch, and weapon sub-state helpers.

use crate::entity::*;
use crate::enums::*;
use crate::tables;
use crate::types::{Geodetic, Team};

#[test]
fn test_kill_is_idempotent() {
    let mut e = Entity::new("r-1", "Raider 1", "aircraft", Team::Red);
    assert!(e.alive);
    assert!(e.time_of_death.is_none());

    e.kill(12.5);
    assert!(!e.alive);
    assert_eq!(e.time_of_death, Some(12.5));

    // A second kill must not move the time of death.
    e.kill(99.0);
    assert_eq!(e.time_of_death, Some(12.5));
}

#[test]
fn test_kind_dispatch() {
    let mut e = Entity::new("s-1", "Sat 1", "satellite", Team::Blue);
    assert_eq!(e.physics.kind(), PhysicsKind::None);
    assert_eq!(e.ai.kind(), AiKind::None);
    assert_eq!(e.weapon.kind(), WeaponKind::None);

    e.physics = PhysicsState::Static;
    e.weapon = WeaponState::SamBattery(SamBattery::new(150_000.0, 8, 2, 0.7));
    assert_eq!(e.physics.kind(), PhysicsKind::Static);
    assert_eq!(e.weapon.kind(), WeaponKind::SamBattery);
    assert_eq!(e.weapon.kind().label(), "SAM");
}

#[test]
fn test_combatant_predicate() {
    let mut e = Entity::new("g-1", "Depot", "ground", Team::Red);
    assert!(!e.is_combatant());
    e.ai = AiState::WaypointPatrol(PatrolAi {
        waypoints: vec![],
        index: 0,
        loop_route: true,
    });
    assert!(e.is_combatant());
}

#[test]
fn test_a2a_class_selection_prefers_shortest_cover() {
    let a2a = AirToAir::new(vec![
        tables::missile_class("aim120", 4),
        tables::missile_class("aim9", 2),
    ]);

    // Short range: the short-range class covers, pick it over the AMRAAM.
    let idx = a2a.select_class(10_000.0).unwrap();
    assert_eq!(a2a.classes[idx].name, "aim9");

    // Beyond the short-range envelope: only the AMRAAM covers.
    let idx = a2a.select_class(50_000.0).unwrap();
    assert_eq!(a2a.classes[idx].name, "aim120");

    // Beyond everything: no shot.
    assert!(a2a.select_class(120_000.0).is_none());
}

#[test]
fn test_a2a_selection_respects_inventory_and_min_range() {
    let a2a = AirToAir::new(vec![
        tables::missile_class("aim120", 1),
        tables::missile_class("aim9", 0),
    ]);

    // Short-range class is empty, falls through to the medium shot.
    let idx = a2a.select_class(10_000.0).unwrap();
    assert_eq!(a2a.classes[idx].name, "aim120");

    // Inside the medium shot's minimum range with nothing else: no shot.
    assert!(a2a.select_class(500.0).is_none());
    assert!(a2a.has_ammo());
}

#[test]
fn test_weapon_ring_ranges() {
    let kk = WeaponState::KineticKill(KineticKill::new(0.7, 50_000.0));
    assert_eq!(kk.max_range(), Some(50_000.0));

    let a2a = WeaponState::AirToAir(AirToAir::new(tables::default_loadout_west()));
    assert_eq!(a2a.max_range(), Some(80_000.0));

    assert_eq!(WeaponState::None.max_range(), None);
}

#[test]
fn test_geodetic_degree_roundtrip() {
    let g = Geodetic::from_degrees(37.7, -122.4, 10_000.0);
    assert!((g.lat_degrees() - 37.7).abs() < 1e-12);
    assert!((g.lon_degrees() - (-122.4)).abs() < 1e-12);
    assert_eq!(g.alt, 10_000.0);
}

#[test]
fn test_team_hostility() {
    assert!(Team::Blue.is_hostile_to(Team::Red));
    assert!(Team::Red.is_hostile_to(Team::Blue));
    assert!(!Team::Blue.is_hostile_to(Team::Blue));
    assert!(!Team::Blue.is_hostile_to(Team::Neutral));
}

#[test]
fn test_engagement_outcome_artifact_names() {
    let json = serde_json::to_string(&EngagementOutcome::KilledBy).unwrap();
    assert_eq!(json, "\"KILLED_BY\"");
    let json = serde_json::to_string(&EngagementOutcome::Launch).unwrap();
    assert_eq!(json, "\"LAUNCH\"");
}
