//! Per-entity continuation chains.

use mimesis_core::{ChainKey, EntityHandle, Usage, lock_entity};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Index of entities by ID, giving access to their chains.
///
/// Entities are held through shared handles: a commit is visible to every
/// other holder of the same handle immediately. Entities without an ID are
/// left out and cannot take part in chaining.
///
/// # Examples
///
/// ```
/// use mimesis_client::ChainRegistry;
/// use mimesis_core::{ChainKey, Entity, share_entities};
///
/// let handles = share_entities(&[Entity::new("elvira")]);
/// let registry = ChainRegistry::new(&handles);
/// let key: ChainKey = "memory:elvira".parse().unwrap();
///
/// assert_eq!(registry.get_previous(&key), None);
/// for token in ["r1", "r2"] {
///     assert!(registry.confirm(&key, token, 2).is_empty());
/// }
/// assert_eq!(registry.confirm(&key, "r3", 2), vec!["r1".to_string()]);
/// assert_eq!(registry.chain(&key), ["r2", "r3"]);
/// assert_eq!(registry.get_previous(&key).as_deref(), Some("r3"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    index: HashMap<String, EntityHandle>,
}

impl ChainRegistry {
    /// Index `entities` by ID. The first entity wins when IDs repeat.
    pub fn new(entities: &[EntityHandle]) -> Self {
        let mut index = HashMap::with_capacity(entities.len());
        let mut skipped = 0usize;

        for handle in entities {
            let Some(id) = lock_entity(handle).id().map(str::to_string) else {
                skipped += 1;
                continue;
            };
            if index.contains_key(&id) {
                warn!(entity_id = %id, "Duplicate entity ID, keeping the first");
                continue;
            }
            index.insert(id, Arc::clone(handle));
        }

        debug!(indexed = index.len(), skipped, "Built chain registry");
        Self { index }
    }

    /// A registry with no entities; every request through it is stateless.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no entity is indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether an entity with this ID is indexed.
    pub fn contains(&self, entity_id: &str) -> bool {
        self.index.contains_key(entity_id)
    }

    /// Most recent token of the chain, if any.
    pub fn get_previous(&self, key: &ChainKey) -> Option<String> {
        let handle = self.index.get(key.entity_id())?;
        lock_entity(handle).chain(key.purpose()).last().cloned()
    }

    /// Tokens of the chain, oldest first.
    pub fn chain(&self, key: &ChainKey) -> Vec<String> {
        self.index
            .get(key.entity_id())
            .map(|handle| lock_entity(handle).chain(key.purpose()).to_vec())
            .unwrap_or_default()
    }

    /// Append `token` to the chain, evicting from the front so the chain
    /// never exceeds `depth`.
    ///
    /// Returns the evicted tokens, oldest first: usually none or one, more
    /// only when the chain was already longer than `depth`. Depth 0 and
    /// unindexed entities are no-ops.
    pub fn confirm(&self, key: &ChainKey, token: impl Into<String>, depth: usize) -> Vec<String> {
        if depth == 0 {
            return Vec::new();
        }
        let Some(handle) = self.index.get(key.entity_id()) else {
            return Vec::new();
        };

        let mut entity = lock_entity(handle);
        let chain = entity
            .meta_mut()
            .chains
            .entry(key.purpose().to_string())
            .or_default();

        let excess = (chain.len() + 1).saturating_sub(depth).min(chain.len());
        let evicted: Vec<String> = chain.drain(..excess).collect();
        chain.push(token.into());

        debug!(
            chain = %key,
            length = chain.len(),
            evicted = evicted.len(),
            "Confirmed continuation"
        );
        evicted
    }

    /// Add one completed request's usage to an entity's counters.
    ///
    /// Returns false when the entity is not indexed.
    pub fn record_usage(&self, entity_id: &str, usage: &Usage) -> bool {
        match self.index.get(entity_id) {
            Some(handle) => {
                lock_entity(handle).meta_mut().usage.record(usage);
                true
            }
            None => false,
        }
    }
}
