//! Scenario-authored events: trigger → action pairs evaluated once per tick.

use serde::{Deserialize, Serialize};

use crate::enums::Roe;

/// Condition that fires a scenario event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires once sim time reaches `at` seconds.
    Elapsed { at: f64 },
    /// Fires when two named entities close within `range` meters.
    Proximity {
        entity_a: String,
        entity_b: String,
        range: f64,
    },
    /// Fires when `sensor` currently holds a track on `target`.
    Detection { sensor: String, target: String },
}

/// Effect executed when a trigger fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Emit a log message.
    Message { text: String },
    /// Change a named entity's rules of engagement.
    SetRoe { entity_id: String, roe: Roe },
    /// Change the global ROE override, gating every weapon in the scenario.
    SetGlobalRoe { roe: Roe },
    /// Destroy a named entity outright.
    Destroy { entity_id: String },
}

/// One authored trigger/action pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub id: String,
    pub name: String,
    pub trigger: Trigger,
    pub action: Action,
    /// Fire on every tick the trigger holds, instead of at most once.
    pub repeatable: bool,
    pub fired: bool,
}

impl ScenarioEvent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, trigger: Trigger, action: Action) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger,
            action,
            repeatable: false,
            fired: false,
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}
