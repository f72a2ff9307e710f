//! Per-tick systems, invoked by the engine in a fixed order:
//! AI → Physics → Sensors → Weapons → Events.

pub mod a2a_missile;
pub mod events;
pub mod flight;
pub mod intercept;
pub mod kepler;
pub mod kinetic_kill;
pub mod orbital_combat;
pub mod radar;
pub mod sam_battery;
pub mod waypoint;
