use crate::helpers::*;
use pressdb::backend::InMemoryBackend;
use pressdb::constants::MAX_DEPTH;
use pressdb::{DocumentStore, Error};
use pressdb::data::{Mapping, NestedValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_open_initializes_empty_document() {
    let (store, backend) = setup_store().await;

    // Opening an empty medium writes an empty document right away
    assert_eq!(stored_json(&backend), json!({}));
    assert!(store.snapshot().await.expect("snapshot").is_empty());
}

#[tokio::test]
async fn test_open_keeps_existing_document() {
    let (store, _backend) = setup_store_with(r#"{"settings": {"theme": "dark"}}"#).await;

    let theme = store.get("settings.theme").await.expect("get");
    assert_eq!(theme, Some(NestedValue::from("dark")));
}

#[tokio::test]
async fn test_set_then_get_round_trip() {
    let (store, _backend) = setup_store().await;

    let cases: Vec<(&str, NestedValue)> = vec![
        ("title", NestedValue::from("Hello")),
        ("settings.count", NestedValue::from(42)),
        ("settings.ratio", NestedValue::from(0.75)),
        ("settings.enabled", NestedValue::from(false)),
        ("settings.cleared", NestedValue::Null),
    ];

    for (key, value) in cases {
        let stored = store.set(key, value.clone()).await.expect("set");
        assert_eq!(stored, value, "set should return the stored value");
        assert_eq!(store.get(key).await.expect("get"), Some(value));
    }
}

#[tokio::test]
async fn test_set_creates_intermediate_mappings() {
    let (store, backend) = setup_store().await;

    store.set("a.b.c", 1).await.expect("set");

    let b = store.get("a.b").await.expect("get a.b").expect("a.b exists");
    let b = b.as_map().expect("a.b is a mapping");
    assert_eq!(b.get("c").and_then(NestedValue::as_i64), Some(1));

    let a = store.get("a").await.expect("get a").expect("a exists");
    assert!(a.as_map().expect("a is a mapping").contains_key("b"));

    assert_eq!(stored_json(&backend), json!({"a": {"b": {"c": 1}}}));
}

#[tokio::test]
async fn test_set_preserves_siblings() {
    let (store, _backend) =
        setup_store_with(r#"{"settings": {"wordpress": {"username": "admin"}, "theme": "dark"}}"#)
            .await;

    store
        .set("settings.wordpress.siteUrl", "https://example.com")
        .await
        .expect("set");

    let snapshot = serde_json::to_value(store.snapshot().await.expect("snapshot")).expect("json");
    assert_eq!(
        snapshot,
        json!({
            "settings": {
                "theme": "dark",
                "wordpress": {"siteUrl": "https://example.com", "username": "admin"}
            }
        })
    );
}

#[tokio::test]
async fn test_set_can_replace_container_at_final_segment() {
    let (store, _backend) = setup_store_with(r#"{"a": {"b": 1}}"#).await;

    // Only traversal through a scalar is an error; the final segment is simply overwritten
    store.set("a", "flat").await.expect("set");
    assert_eq!(store.get("a").await.expect("get"), Some(NestedValue::from("flat")));
}

#[tokio::test]
async fn test_set_through_scalar_is_type_mismatch() {
    let (store, backend) = setup_store_with(r#"{"a": 1}"#).await;
    let before = backend.raw();

    assert_type_mismatch(store.set("a.b", 2).await);

    // Nothing was persisted and the value is untouched
    assert_eq!(backend.raw(), before);
    assert_eq!(store.get("a").await.expect("get"), Some(NestedValue::from(1)));
}

#[tokio::test]
async fn test_deep_mismatch_leaves_no_partial_intermediates() {
    let (store, backend) = setup_store_with(r#"{"x": {"y": "leaf"}}"#).await;

    assert_type_mismatch(store.set("x.y.z", true).await);
    assert_type_mismatch(store.push("x.y.z", 1).await);

    assert_eq!(stored_json(&backend), json!({"x": {"y": "leaf"}}));
}

#[tokio::test]
async fn test_set_through_sequence_is_type_mismatch() {
    let (store, _backend) = setup_store_with(r#"{"list": [1, 2]}"#).await;
    assert_type_mismatch(store.set("list.0", 5).await);
}

#[tokio::test]
async fn test_push_creates_and_appends() {
    let (store, _backend) = setup_store().await;

    let first = store.push("list", 1).await.expect("push 1");
    assert_eq!(first, vec![NestedValue::from(1)]);

    let second = store.push("list", 2).await.expect("push 2");
    assert_eq!(second, vec![NestedValue::from(1), NestedValue::from(2)]);

    assert_eq!(
        store.get("list").await.expect("get"),
        Some(NestedValue::from(vec![NestedValue::from(1), NestedValue::from(2)]))
    );
}

#[tokio::test]
async fn test_push_nested_path_creates_mappings() {
    let (store, backend) = setup_store().await;

    let mut post = Mapping::new();
    post.set("title", "Draft").set("status", "draft");
    store.push("content.history", post).await.expect("push");

    assert_eq!(
        stored_json(&backend),
        json!({"content": {"history": [{"status": "draft", "title": "Draft"}]}})
    );
}

#[tokio::test]
async fn test_push_onto_scalar_is_type_mismatch() {
    let (store, backend) = setup_store_with(r#"{"name": "site"}"#).await;
    let before = backend.raw();

    assert_type_mismatch(store.push("name", "x").await);
    assert_eq!(backend.raw(), before);
}

#[tokio::test]
async fn test_get_absent_paths() {
    let (store, _backend) = setup_store().await;

    assert_eq!(store.get("nonexistent.path").await.expect("get"), None);
    assert_eq!(store.get("nonexistent").await.expect("get"), None);

    store.set("a", 1).await.expect("set");
    // Reading through a scalar resolves to nothing rather than failing
    assert_eq!(store.get("a.b.c").await.expect("get"), None);
}

#[tokio::test]
async fn test_get_indexes_sequences() {
    let (store, _backend) = setup_store_with(r#"{"keywords": ["seo", "ads"]}"#).await;

    assert_eq!(
        store.get("keywords.1").await.expect("get"),
        Some(NestedValue::from("ads"))
    );
    assert_eq!(store.get("keywords.2").await.expect("get"), None);
    assert_eq!(store.get("keywords.-1").await.expect("get"), None);
    // Only canonical decimal indices address an element
    assert_eq!(store.get("keywords.+1").await.expect("get"), None);
    assert_eq!(store.get("keywords.01").await.expect("get"), None);
    assert_eq!(
        store.get("keywords.0").await.expect("get"),
        Some(NestedValue::from("seo"))
    );
}

#[tokio::test]
async fn test_malformed_paths_are_rejected_before_reload() {
    let backend = Arc::new(ProbeBackend::new(1));
    let store = DocumentStore::open(backend.clone()).await.expect("open");
    let reads = backend.reads();

    for key in ["", "a..b", ".a", "a."] {
        assert_malformed_path(store.get(key).await);
        assert_malformed_path(store.set(key, 1).await);
        assert_malformed_path(store.push(key, 1).await);
    }

    assert_eq!(backend.reads(), reads, "malformed paths must not touch the medium");
}

#[tokio::test]
async fn test_one_reload_and_persist_per_mutation() {
    let backend = Arc::new(ProbeBackend::new(1));
    let store = DocumentStore::open(backend.clone()).await.expect("open");
    let (reads, writes) = (backend.reads(), backend.writes());

    store.set("a.b", 1).await.expect("set");
    assert_eq!((backend.reads(), backend.writes()), (reads + 1, writes + 1));

    store.push("list", 1).await.expect("push");
    assert_eq!((backend.reads(), backend.writes()), (reads + 2, writes + 2));

    store.get("a.b").await.expect("get");
    assert_eq!((backend.reads(), backend.writes()), (reads + 3, writes + 2));
}

#[tokio::test]
async fn test_every_operation_sees_external_changes() {
    let (store, backend) = setup_store().await;
    store.set("a", 1).await.expect("set");

    // Another writer replaces the medium between operations
    backend.set_raw(r#"{"a": 2, "b": [true]}"#);

    assert_eq!(store.get("a").await.expect("get"), Some(NestedValue::from(2)));
    let items = store.push("b", false).await.expect("push");
    assert_eq!(items, vec![NestedValue::from(true), NestedValue::from(false)]);
}

#[tokio::test]
async fn test_vanished_medium_is_an_error() {
    let (store, backend) = setup_store().await;
    store.set("a", 1).await.expect("set");

    backend.clear();

    // No silent fallback to an empty document once the session has loaded one
    assert_medium_unavailable(store.get("a").await);
    assert_medium_unavailable(store.set("a", 2).await);
    assert!(backend.raw().is_none());
}

#[tokio::test]
async fn test_corrupt_medium_is_an_error() {
    init_tracing();
    let backend = Arc::new(InMemoryBackend::with_raw("{ this is not json"));
    assert_medium_unavailable(DocumentStore::open(backend.clone()).await.map(|_| ()));

    let (store, backend) = setup_store().await;
    backend.set_raw("[1, 2, 3]");
    assert_medium_unavailable(store.list_keywords().await);
}

#[tokio::test]
async fn test_clones_share_the_session() {
    let (store, _backend) = setup_store().await;
    let other = store.clone();

    store.set("shared", "yes").await.expect("set");
    assert_eq!(
        other.get("shared").await.expect("get"),
        Some(NestedValue::from("yes"))
    );
}

#[tokio::test]
async fn test_overlapping_writes_are_last_write_wins() {
    init_tracing();
    let backend = Arc::new(ProbeBackend::new(2));
    let store = DocumentStore::open(backend.clone()).await.expect("open");
    backend.arm();

    // Both operations reload the same empty document before either persists
    let (a, b) = tokio::join!(store.set("a", 1), store.set("b", 2));
    a.expect("set a");
    b.expect("set b");

    let stored: serde_json::Value =
        serde_json::from_str(&backend.raw().expect("content")).expect("json");
    let object = stored.as_object().expect("object");
    assert_eq!(object.len(), 1, "one of the overlapping writes is lost");
    assert!(object.contains_key("a") ^ object.contains_key("b"));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Preferences {
    theme: String,
    font_size: u32,
}

#[tokio::test]
async fn test_typed_get_and_set() {
    let (store, _backend) = setup_store().await;
    let prefs = Preferences {
        theme: "light".to_string(),
        font_size: 14,
    };

    store.set_as("settings.preferences", &prefs).await.expect("set_as");

    let loaded: Option<Preferences> = store.get_as("settings.preferences").await.expect("get_as");
    assert_eq!(loaded, Some(prefs));

    let missing: Option<Preferences> = store.get_as("settings.other").await.expect("get_as");
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_typed_get_shape_mismatch() {
    let (store, _backend) = setup_store_with(r#"{"settings": {"preferences": "compact"}}"#).await;
    assert_type_mismatch(store.get_as::<Preferences>("settings.preferences").await);
}

fn dotted_path(segments: usize) -> String {
    (0..segments)
        .map(|i| format!("k{i}"))
        .collect::<Vec<_>>()
        .join(".")
}

fn nested_arrays(depth: usize) -> NestedValue {
    let mut value = NestedValue::from("leaf");
    for _ in 0..depth {
        value = NestedValue::from(vec![value]);
    }
    value
}

fn assert_too_deep<T: std::fmt::Debug>(result: Result<T, Error>) {
    match result {
        Err(Error::TooDeep { depth, limit, .. }) => assert!(depth > limit),
        other => panic!("Expected TooDeep error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deep_path_is_rejected_without_persisting() {
    let (store, backend) = setup_store_with(r#"{"keywords": ["seo"]}"#).await;
    let before = backend.raw();

    let key = dotted_path(200);
    assert_too_deep(store.set(&key, 1).await);
    assert_too_deep(store.push(&key, 1).await);
    assert_eq!(backend.raw(), before);

    // The document stays readable
    assert_eq!(store.get(&key).await.expect("get deep"), None);
    assert_eq!(store.list_keywords().await.expect("list"), vec!["seo"]);
}

#[tokio::test]
async fn test_path_at_depth_limit_round_trips() {
    let (store, _backend) = setup_store().await;

    let key = dotted_path(MAX_DEPTH);
    store.set(&key, 1).await.expect("set at limit");
    assert_eq!(store.get(&key).await.expect("get"), Some(NestedValue::from(1)));
    assert_eq!(store.get("anything").await.expect("get"), None);

    assert_too_deep(store.set(&dotted_path(MAX_DEPTH + 1), 1).await);
}

#[tokio::test]
async fn test_deeply_nested_pushed_value_is_rejected() {
    let (store, backend) = setup_store().await;
    let before = backend.raw();

    assert_too_deep(store.push("history", nested_arrays(200)).await);
    assert_too_deep(store.set("history", nested_arrays(200)).await);
    assert_eq!(backend.raw(), before);

    // root -> history -> value: the value may use what remains of the limit
    let fits = nested_arrays(MAX_DEPTH - 2);
    let items = store.push("history", fits.clone()).await.expect("push at limit");
    assert_eq!(items, vec![fits.clone()]);
    assert_eq!(store.get("history.0").await.expect("get"), Some(fits));

    assert_too_deep(store.push("history", nested_arrays(MAX_DEPTH - 1)).await);
}
