//! Record store contract tests over the in-memory backend

use futures::StreamExt;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use ward::adapters::memory::MemoryStore;
use ward::adapters::store::{ChangeKind, RecordStore};
use ward::domain::{StoreError, WardError};

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

#[tokio::test]
async fn test_create_stamps_bookkeeping_fields() {
    let store = store();
    let key = store
        .create_record("patients", json!({"name": "Jane Roe"}))
        .await
        .unwrap();

    let record = store.get_record("patients", &key).await.unwrap();
    assert_eq!(record["name"], "Jane Roe");
    assert_eq!(record["id"], key.as_str());
    assert!(record["createdAt"].is_i64());
    assert_eq!(record["createdAt"], record["updatedAt"]);
}

#[tokio::test]
async fn test_snapshot_iterates_in_creation_order() {
    let store = store();
    let mut keys = Vec::new();
    for i in 0..10 {
        let key = store
            .create_record("items", json!({"n": i}))
            .await
            .unwrap();
        keys.push(key);
    }

    let snapshot = store.get_collection("items").await.unwrap();
    let snapshot_keys: Vec<_> = snapshot.keys().cloned().collect();
    assert_eq!(snapshot_keys, keys);

    let values: Vec<i64> = snapshot
        .values()
        .map(|v| v["n"].as_i64().unwrap())
        .collect();
    assert_eq!(values, (0..10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_unknown_collection_is_empty() {
    let store = store();
    assert!(store.get_collection("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_merges_shallowly_and_refreshes_updated_at() {
    let store = store();
    let key = store
        .create_record("patients", json!({"name": "Jane Roe", "age": 30}))
        .await
        .unwrap();

    let before = store.get_record("patients", &key).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let mut updates = Map::new();
    updates.insert("age".to_string(), Value::from(31));
    store.update_record("patients", &key, updates).await.unwrap();

    let after = store.get_record("patients", &key).await.unwrap();
    assert_eq!(after["age"], 31);
    assert_eq!(after["name"], "Jane Roe");
    assert!(after["updatedAt"].as_i64() > before["updatedAt"].as_i64());
    assert_eq!(after["createdAt"], before["createdAt"]);
}

#[tokio::test]
async fn test_update_missing_record_fails() {
    let store = store();
    let key = ward::domain::RecordKey::new("no-such-key").unwrap();
    let err = store
        .update_record("patients", &key, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WardError::Store(StoreError::RecordNotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = store();
    let key = store
        .create_record("patients", json!({"name": "Jane Roe"}))
        .await
        .unwrap();

    store.delete_record("patients", &key).await.unwrap();
    store.delete_record("patients", &key).await.unwrap();

    let err = store.get_record("patients", &key).await.unwrap_err();
    assert!(matches!(
        err,
        WardError::Store(StoreError::RecordNotFound { .. })
    ));
}

#[tokio::test]
async fn test_non_object_body_rejected() {
    let store = store();
    let err = store
        .create_record("patients", json!(["not", "an", "object"]))
        .await
        .unwrap_err();
    assert!(matches!(err, WardError::Store(StoreError::InvalidData(_))));
}

#[tokio::test]
async fn test_subscription_sees_lifecycle_events() {
    let store = store();
    let mut sub = store.subscribe("patients");

    let key = store
        .create_record("patients", json!({"name": "Jane Roe"}))
        .await
        .unwrap();

    let mut updates = Map::new();
    updates.insert("age".to_string(), Value::from(31));
    store.update_record("patients", &key, updates).await.unwrap();
    store.delete_record("patients", &key).await.unwrap();

    let created = sub.next_event().await.unwrap();
    assert_eq!(created.kind, ChangeKind::Created);
    assert_eq!(created.key, key);

    let updated = sub.next_event().await.unwrap();
    assert_eq!(updated.kind, ChangeKind::Updated);

    let deleted = sub.next_event().await.unwrap();
    assert_eq!(deleted.kind, ChangeKind::Deleted);
}

#[tokio::test]
async fn test_subscription_filters_other_collections() {
    let store = store();
    let mut sub = store.subscribe("patients");

    store
        .create_record("staff", json!({"name": "Tess"}))
        .await
        .unwrap();
    let key = store
        .create_record("patients", json!({"name": "Jane"}))
        .await
        .unwrap();

    let event = sub.next_event().await.unwrap();
    assert_eq!(event.collection, "patients");
    assert_eq!(event.key, key);
}

#[tokio::test]
async fn test_subscription_as_stream() {
    let store = store();
    let sub = store.subscribe("items");

    for i in 0..3 {
        store.create_record("items", json!({"n": i})).await.unwrap();
    }

    let events: Vec<_> = sub.into_stream().take(3).collect().await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.kind == ChangeKind::Created));
}
