//! Simulation entities and their provider metadata.

use crate::UsageCounters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Provider-scoped metadata stored on every entity under `_provider`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderMeta {
    /// Continuation tokens per purpose, oldest first
    pub chains: BTreeMap<String, Vec<String>>,
    /// Cumulative usage attributed to this entity
    pub usage: UsageCounters,
}

impl ProviderMeta {
    /// True when no chain or usage has been recorded.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.usage.is_empty()
    }
}

/// An opaque simulation record (a character or a location).
///
/// Everything except the `_provider` section is kept verbatim, so the storage
/// schema stays owned by whoever writes the state document.
///
/// # Examples
///
/// ```
/// use mimesis_core::Entity;
/// use serde_json::json;
///
/// let entity: Entity = serde_json::from_value(json!({
///     "id": "bob",
///     "mood": "restless",
///     "_provider": { "chains": { "intention": ["resp_1"] } }
/// })).unwrap();
///
/// assert_eq!(entity.id(), Some("bob"));
/// assert_eq!(entity.chain("intention"), ["resp_1".to_string()]);
/// assert_eq!(entity.field("mood"), Some(&json!("restless")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_provider", default, skip_serializing_if = "ProviderMeta::is_empty")]
    meta: ProviderMeta,
    #[serde(flatten)]
    fields: Map<String, JsonValue>,
}

impl Entity {
    /// Create an entity carrying only an `id` field.
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), JsonValue::String(id.into()));
        Self {
            meta: ProviderMeta::default(),
            fields,
        }
    }

    /// Add or replace an opaque field.
    pub fn with_field(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Stable identifier, if the record carries a non-empty string `id`.
    pub fn id(&self) -> Option<&str> {
        self.fields
            .get("id")
            .and_then(JsonValue::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Look up an opaque field.
    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// All opaque fields.
    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// Provider metadata.
    pub fn meta(&self) -> &ProviderMeta {
        &self.meta
    }

    /// Mutable provider metadata.
    pub fn meta_mut(&mut self) -> &mut ProviderMeta {
        &mut self.meta
    }

    /// Tokens in the chain for `purpose`, oldest first. Empty when absent.
    pub fn chain(&self, purpose: &str) -> &[String] {
        self.meta
            .chains
            .get(purpose)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Shared, mutable reference to an entity.
///
/// Registries and the tick runner hold clones of the same handle, so chain
/// commits are visible everywhere at once. Locks are never held across an
/// `.await`.
pub type EntityHandle = Arc<Mutex<Entity>>;

/// Lock an entity handle, recovering the data if a previous holder panicked.
pub fn lock_entity(handle: &EntityHandle) -> MutexGuard<'_, Entity> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wrap copies of `entities` in shared handles.
pub fn share_entities(entities: &[Entity]) -> Vec<EntityHandle> {
    entities
        .iter()
        .cloned()
        .map(|entity| Arc::new(Mutex::new(entity)))
        .collect()
}
