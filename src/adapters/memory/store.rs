//! In-memory record store
//!
//! The default development and test backend. Collections live in a single
//! RwLock-guarded map; change events fan out over a broadcast channel.

use crate::adapters::store::traits::{
    now_millis, stamp_new_record, ChangeKind, CollectionEvent, RecordStore, RecordSubscription,
};
use crate::domain::errors::StoreError;
use crate::domain::ids::RecordKey;
use crate::domain::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{broadcast, RwLock};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// In-process record store
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<RecordKey, Value>>>,
    events: broadcast::Sender<CollectionEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn emit(&self, collection: &str, key: &RecordKey, kind: ChangeKind) {
        // No receivers is fine; send only fails when nobody listens.
        let _ = self.events.send(CollectionEvent {
            collection: collection.to_string(),
            key: key.clone(),
            kind,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn create_record(&self, collection: &str, data: Value) -> Result<RecordKey> {
        let key = RecordKey::generate();
        let stamped = stamp_new_record(data, &key)?;

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), Value::Object(stamped));
        drop(collections);

        self.emit(collection, &key, ChangeKind::Created);
        tracing::debug!(collection, key = %key, "Record created");
        Ok(key)
    }

    async fn get_collection(&self, collection: &str) -> Result<BTreeMap<RecordKey, Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get_record(&self, collection: &str, key: &RecordKey) -> Result<Value> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned()
            .ok_or_else(|| {
                StoreError::RecordNotFound {
                    collection: collection.to_string(),
                    key: key.as_str().to_string(),
                }
                .into()
            })
    }

    async fn update_record(
        &self,
        collection: &str,
        key: &RecordKey,
        updates: Map<String, Value>,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(key))
            .ok_or_else(|| StoreError::RecordNotFound {
                collection: collection.to_string(),
                key: key.as_str().to_string(),
            })?;

        let body = record.as_object_mut().ok_or_else(|| {
            StoreError::InvalidData(format!("Stored record {collection}/{key} is not an object"))
        })?;

        for (field, value) in updates {
            body.insert(field, value);
        }
        body.insert("updatedAt".to_string(), Value::from(now_millis()));
        drop(collections);

        self.emit(collection, key, ChangeKind::Updated);
        tracing::debug!(collection, key = %key, "Record updated");
        Ok(())
    }

    async fn delete_record(&self, collection: &str, key: &RecordKey) -> Result<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|records| records.remove(key))
            .is_some();
        drop(collections);

        if removed {
            self.emit(collection, key, ChangeKind::Deleted);
            tracing::debug!(collection, key = %key, "Record deleted");
        }
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> RecordSubscription {
        RecordSubscription::new(self.events.subscribe(), collection.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_get_record() {
        let store = MemoryStore::new();
        let key = store
            .create_record("patients", json!({"name": "Jane Roe"}))
            .await
            .unwrap();

        let record = store.get_record("patients", &key).await.unwrap();
        assert_eq!(record["name"], "Jane Roe");
        assert_eq!(record["id"], key.as_str());
        assert!(record["createdAt"].is_i64());
    }

    #[tokio::test]
    async fn test_get_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let key = RecordKey::generate();
        let err = store.get_record("patients", &key).await.unwrap_err();
        assert!(err.to_string().contains("Record not found"));
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let snapshot = store.get_collection("ghosts").await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_collection_iterates_in_creation_order() {
        let store = MemoryStore::new();
        let mut keys = Vec::new();
        for i in 0..5 {
            keys.push(
                store
                    .create_record("labTests", json!({"seq": i}))
                    .await
                    .unwrap(),
            );
        }

        let snapshot = store.get_collection("labTests").await.unwrap();
        let snapshot_keys: Vec<_> = snapshot.keys().cloned().collect();
        assert_eq!(snapshot_keys, keys);
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_timestamp() {
        let store = MemoryStore::new();
        let key = store
            .create_record("bloodBank", json!({"type": "O+", "units": 45}))
            .await
            .unwrap();

        let mut updates = Map::new();
        updates.insert("units".to_string(), json!(40));
        store.update_record("bloodBank", &key, updates).await.unwrap();

        let record = store.get_record("bloodBank", &key).await.unwrap();
        assert_eq!(record["units"], 40);
        assert_eq!(record["type"], "O+");
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let store = MemoryStore::new();
        let key = RecordKey::generate();
        let result = store.update_record("patients", &key, Map::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let key = store
            .create_record("staff", json!({"name": "Dr. Gray"}))
            .await
            .unwrap();

        store.delete_record("staff", &key).await.unwrap();
        store.delete_record("staff", &key).await.unwrap();

        let snapshot = store.get_collection("staff").await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_subscription_receives_filtered_events() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe("appointments");

        store
            .create_record("patients", json!({"name": "other collection"}))
            .await
            .unwrap();
        let key = store
            .create_record("appointments", json!({"patient": "Jane"}))
            .await
            .unwrap();

        let event = sub.next_event().await.unwrap();
        assert_eq!(event.collection, "appointments");
        assert_eq!(event.key, key);
        assert_eq!(event.kind, ChangeKind::Created);
    }
}
