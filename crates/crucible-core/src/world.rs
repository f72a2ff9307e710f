//! World — the entity container.
//!
//! Holds all entities in a contiguous vector for cache-friendly iteration,
//! with O(1) lookup by id. Also owns the scenario event list and the global
//! ROE override. Entities are constructed once (by the external scenario
//! layer) and never added or removed at runtime; only liveness changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::enums::Roe;
use crate::error::ConfigError;
use crate::events::ScenarioEvent;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: Vec<Entity>,
    /// Id → index. Used for lookups only, never iterated.
    index: HashMap<String, usize>,
    pub events: Vec<ScenarioEvent>,
    /// When set, overrides every entity's own ROE.
    pub roe_override: Option<Roe>,
    /// Current simulation time (seconds), maintained by the engine.
    pub sim_time: f64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. Fails on a duplicate id; partial setup cannot be
    /// safely simulated.
    pub fn add_entity(&mut self, entity: Entity) -> Result<(), ConfigError> {
        if self.index.contains_key(&entity.id) {
            return Err(ConfigError::DuplicateId(entity.id));
        }
        self.index.insert(entity.id.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        let i = *self.index.get(id)?;
        Some(&mut self.entities[i])
    }

    /// Temporarily move the entity at `idx` out of the store so a system can
    /// mutate it alongside the rest of the world. The slot holds a dead
    /// placeholder (skipped by every query) until `restore` puts it back.
    pub fn detach(&mut self, idx: usize) -> Entity {
        std::mem::take(&mut self.entities[idx])
    }

    pub fn restore(&mut self, idx: usize, entity: Entity) {
        self.entities[idx] = entity;
    }

    /// The ROE in effect for `entity`: the global override if set, else the
    /// entity's own.
    pub fn effective_roe(&self, entity: &Entity) -> Roe {
        self.roe_override.unwrap_or(entity.roe)
    }
}
