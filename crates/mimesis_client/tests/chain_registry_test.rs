//! Chain registry behaviour.

use mimesis_client::ChainRegistry;
use mimesis_core::{ChainKey, Entity, Usage, lock_entity, share_entities};
use serde_json::json;

fn key(raw: &str) -> ChainKey {
    raw.parse().unwrap()
}

#[test]
fn test_sliding_window_for_every_depth() {
    for depth in 1..=5usize {
        let handles = share_entities(&[Entity::new("bob")]);
        let registry = ChainRegistry::new(&handles);
        let key = key("intention:bob");

        let mut evicted = Vec::new();
        for i in 0..=depth {
            evicted.extend(registry.confirm(&key, format!("t{i}"), depth));
        }

        let chain = registry.chain(&key);
        assert_eq!(chain.len(), depth);
        assert_eq!(evicted, vec!["t0".to_string()]);
        assert_eq!(chain.last().map(String::as_str), Some(format!("t{depth}").as_str()));
    }
}

#[test]
fn test_memory_elvira_scenario() {
    let handles = share_entities(&[Entity::new("elvira")]);
    let registry = ChainRegistry::new(&handles);
    let key = key("memory:elvira");

    assert!(registry.confirm(&key, "r1", 2).is_empty());
    assert!(registry.confirm(&key, "r2", 2).is_empty());
    assert_eq!(registry.confirm(&key, "r3", 2), vec!["r1".to_string()]);

    let entity = lock_entity(&handles[0]);
    assert_eq!(entity.chain("memory"), ["r2".to_string(), "r3".to_string()]);
}

#[test]
fn test_get_previous_without_confirm() {
    let handles = share_entities(&[Entity::new("bob")]);
    let registry = ChainRegistry::new(&handles);

    assert_eq!(registry.get_previous(&key("intention:bob")), None);
    assert_eq!(registry.get_previous(&key("intention:nobody")), None);
}

#[test]
fn test_depth_zero_never_mutates() {
    let handles = share_entities(&[Entity::new("bob")]);
    let before = lock_entity(&handles[0]).clone();
    let registry = ChainRegistry::new(&handles);

    for token in ["a", "b", "c"] {
        assert!(registry.confirm(&key("intention:bob"), token, 0).is_empty());
    }

    assert_eq!(*lock_entity(&handles[0]), before);
    assert!(lock_entity(&handles[0]).meta().chains.is_empty());
}

#[test]
fn test_unindexed_entities_are_skipped() {
    let anonymous = Entity::default().with_field("name", json!("drifter"));
    let handles = share_entities(&[anonymous, Entity::new("bob")]);
    let registry = ChainRegistry::new(&handles);

    assert_eq!(registry.len(), 1);
    assert!(registry.confirm(&key("intention:drifter"), "x", 3).is_empty());
    assert!(!registry.record_usage("drifter", &Usage::new(1, 1, 0, 0)));
    assert!(lock_entity(&handles[0]).meta().is_empty());
}

#[test]
fn test_shrunk_depth_trims_to_new_depth() {
    let mut entity = Entity::new("bob");
    entity.meta_mut().chains.insert(
        "intention".to_string(),
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
    );
    let handles = share_entities(&[entity]);
    let registry = ChainRegistry::new(&handles);

    let evicted = registry.confirm(&key("intention:bob"), "e", 2);

    assert_eq!(evicted, ["a", "b", "c"]);
    assert_eq!(registry.chain(&key("intention:bob")), ["d", "e"]);
}

#[test]
fn test_purposes_are_independent() {
    let handles = share_entities(&[Entity::new("bob")]);
    let registry = ChainRegistry::new(&handles);

    registry.confirm(&key("intention:bob"), "i1", 3);
    registry.confirm(&key("memory:bob"), "m1", 3);

    assert_eq!(registry.get_previous(&key("intention:bob")).as_deref(), Some("i1"));
    assert_eq!(registry.get_previous(&key("memory:bob")).as_deref(), Some("m1"));
}

#[test]
fn test_duplicate_ids_keep_first() {
    let first = Entity::new("bob").with_field("n", json!(1));
    let second = Entity::new("bob").with_field("n", json!(2));
    let handles = share_entities(&[first, second]);
    let registry = ChainRegistry::new(&handles);

    registry.confirm(&key("intention:bob"), "t", 1);

    assert_eq!(lock_entity(&handles[0]).chain("intention"), ["t".to_string()]);
    assert!(lock_entity(&handles[1]).chain("intention").is_empty());
}

#[test]
fn test_usage_accumulates_on_entity() {
    let handles = share_entities(&[Entity::new("bob")]);
    let registry = ChainRegistry::new(&handles);

    assert!(registry.record_usage("bob", &Usage::new(10, 5, 1, 2)));
    assert!(registry.record_usage("bob", &Usage::new(1, 1, 0, 0)));

    let usage = lock_entity(&handles[0]).meta().usage;
    assert_eq!(*usage.total_tokens(), 17);
    assert_eq!(*usage.requests(), 2);
}
