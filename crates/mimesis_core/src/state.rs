//! The simulation state document.

use crate::{Entity, EntityHandle, lock_entity};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Durable status of a simulation.
///
/// Only `Paused` is ever written by a successful tick. `Running` on disk
/// means a previous process died mid-tick.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SimStatus {
    /// Between ticks
    #[default]
    Paused,
    /// A tick is in progress
    Running,
}

/// Which entity collection a phase works on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityScope {
    /// Character entities
    Characters,
    /// Location entities
    Locations,
    /// No entities; pure computation
    #[default]
    None,
}

/// Complete simulation state as loaded from and handed back to storage.
///
/// Unknown top-level keys are preserved in `extra`.
///
/// # Examples
///
/// ```
/// use mimesis_core::{SimStatus, SimulationState};
/// use serde_json::json;
///
/// let state: SimulationState = serde_json::from_value(json!({
///     "tick": 4,
///     "status": "paused",
///     "characters": [{"id": "bob"}],
///     "weather": "fog"
/// })).unwrap();
///
/// assert_eq!(state.tick, 4);
/// assert_eq!(state.status, SimStatus::Paused);
/// assert!(state.locations.is_empty());
/// assert_eq!(state.extra["weather"], json!("fog"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Number of completed ticks
    #[serde(default)]
    pub tick: u64,
    /// Durable status
    #[serde(default)]
    pub status: SimStatus,
    /// Character entities
    #[serde(default)]
    pub characters: Vec<Entity>,
    /// Location entities
    #[serde(default)]
    pub locations: Vec<Entity>,
    /// Any other top-level keys
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl SimulationState {
    /// True when the state may start a tick.
    pub fn is_paused(&self) -> bool {
        self.status == SimStatus::Paused
    }

    /// Entities in `scope`. Empty for [`EntityScope::None`].
    pub fn entities(&self, scope: EntityScope) -> &[Entity] {
        match scope {
            EntityScope::Characters => &self.characters,
            EntityScope::Locations => &self.locations,
            EntityScope::None => &[],
        }
    }

    /// Copy provider metadata from shared handles back onto the entities in
    /// `scope`, matching by ID. Returns how many entities were updated.
    ///
    /// Only the `_provider` section is written; every other field keeps the
    /// durable value.
    pub fn merge_meta(&mut self, scope: EntityScope, handles: &[EntityHandle]) -> usize {
        let mut by_id = HashMap::new();
        for handle in handles {
            let entity = lock_entity(handle);
            if let Some(id) = entity.id() {
                by_id.insert(id.to_string(), entity.meta().clone());
            }
        }

        let targets = match scope {
            EntityScope::Characters => &mut self.characters,
            EntityScope::Locations => &mut self.locations,
            EntityScope::None => return 0,
        };

        let mut merged = 0;
        for entity in targets.iter_mut() {
            let Some(meta) = entity.id().and_then(|id| by_id.remove(id)) else {
                continue;
            };
            *entity.meta_mut() = meta;
            merged += 1;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share_entities;
    use serde_json::json;

    #[test]
    fn test_status_text() {
        assert_eq!(SimStatus::Paused.to_string(), "paused");
        assert_eq!("running".parse::<SimStatus>().unwrap(), SimStatus::Running);
        assert_eq!("locations".parse::<EntityScope>().unwrap(), EntityScope::Locations);
    }

    #[test]
    fn test_merge_meta_by_id() {
        let mut state = SimulationState {
            characters: vec![
                Entity::new("bob").with_field("hp", json!(3)),
                Entity::new("ann"),
                Entity::default().with_field("name", json!("nameless")),
            ],
            ..Default::default()
        };
        let handles = share_entities(&state.characters);
        {
            let mut bob = lock_entity(&handles[0]);
            bob.meta_mut()
                .chains
                .insert("intention".to_string(), vec!["r9".to_string()]);
            // Non-meta edits on the handle are not merged back.
            *bob = bob.clone().with_field("hp", json!(0));
        }

        let merged = state.merge_meta(EntityScope::Characters, &handles);
        assert_eq!(merged, 2);
        assert_eq!(state.characters[0].chain("intention"), ["r9".to_string()]);
        assert_eq!(state.characters[0].field("hp"), Some(&json!(3)));
        assert!(state.characters[2].meta().is_empty());
        assert_eq!(state.merge_meta(EntityScope::None, &handles), 0);
    }
}
