//! Record store abstraction
//!
//! The trait every store backend implements, plus the change-event types the
//! subscription interface produces. Instead of managed real-time listeners,
//! change delivery is an explicit event stream whose subscription ends when
//! the handle is dropped.

use crate::domain::errors::{StoreError, WardError};
use crate::domain::ids::RecordKey;
use crate::domain::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

/// What happened to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A change notification for one record in one collection
#[derive(Debug, Clone)]
pub struct CollectionEvent {
    pub collection: String,
    pub key: RecordKey,
    pub kind: ChangeKind,
}

/// A live subscription to one collection's change events
///
/// Dropping the subscription unsubscribes. Events from other collections on
/// the same store are filtered out.
pub struct RecordSubscription {
    receiver: broadcast::Receiver<CollectionEvent>,
    collection: String,
}

impl RecordSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<CollectionEvent>, collection: String) -> Self {
        Self {
            receiver,
            collection,
        }
    }

    /// Waits for the next event on the subscribed collection
    ///
    /// Returns `None` once the store side has shut down. A slow consumer
    /// that lags the channel skips the overwritten events and keeps going.
    pub async fn next_event(&mut self) -> Option<CollectionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        collection = %self.collection,
                        skipped,
                        "Subscription lagged, events dropped"
                    );
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Converts the subscription into a `futures` stream of events
    pub fn into_stream(self) -> impl futures::Stream<Item = CollectionEvent> {
        futures::stream::unfold(self, |mut sub| async move {
            sub.next_event().await.map(|event| (event, sub))
        })
    }
}

/// Record store trait
///
/// A collection is a flat mapping of opaque [`RecordKey`]s to JSON objects.
/// Stores stamp `id`, `createdAt`, and `updatedAt` (epoch milliseconds) on
/// create and refresh `updatedAt` on update. Collection snapshots iterate in
/// key order, which equals creation order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Downcast to Any for backend-specific operations
    fn as_any(&self) -> &dyn Any;

    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the backing schema exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created or accessed.
    async fn ensure_schema(&self) -> Result<()>;

    /// Create a record, returning its new key
    ///
    /// `data` must be a JSON object; the store stamps `id`, `createdAt`,
    /// and `updatedAt` before persisting.
    async fn create_record(&self, collection: &str, data: Value) -> Result<RecordKey>;

    /// Snapshot a collection in creation order
    ///
    /// An unknown collection yields an empty map.
    async fn get_collection(&self, collection: &str) -> Result<BTreeMap<RecordKey, Value>>;

    /// Fetch a single record
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RecordNotFound` if the record does not exist.
    async fn get_record(&self, collection: &str, key: &RecordKey) -> Result<Value>;

    /// Shallow-merge a partial update into an existing record
    ///
    /// Refreshes `updatedAt`. This never upserts; a missing record is an
    /// error.
    async fn update_record(
        &self,
        collection: &str,
        key: &RecordKey,
        updates: Map<String, Value>,
    ) -> Result<()>;

    /// Delete a record; deleting an absent record is a no-op
    async fn delete_record(&self, collection: &str, key: &RecordKey) -> Result<()>;

    /// Subscribe to change events for one collection
    fn subscribe(&self, collection: &str) -> RecordSubscription;
}

/// Epoch milliseconds, the timestamp format records carry
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Prepares a new record body: requires a JSON object and stamps the
/// `id`, `createdAt`, and `updatedAt` bookkeeping fields.
pub(crate) fn stamp_new_record(data: Value, key: &RecordKey) -> Result<Map<String, Value>> {
    let mut map = match data {
        Value::Object(map) => map,
        other => {
            return Err(WardError::Store(StoreError::InvalidData(format!(
                "Record body must be a JSON object, got {other}"
            ))))
        }
    };

    let now = now_millis();
    map.insert("id".to_string(), Value::String(key.as_str().to_string()));
    map.insert("createdAt".to_string(), Value::from(now));
    map.insert("updatedAt".to_string(), Value::from(now));
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stamp_new_record_adds_bookkeeping_fields() {
        let key = RecordKey::generate();
        let stamped = stamp_new_record(json!({"name": "Jane"}), &key).unwrap();
        assert_eq!(stamped["id"], key.as_str());
        assert!(stamped["createdAt"].is_i64());
        assert_eq!(stamped["createdAt"], stamped["updatedAt"]);
        assert_eq!(stamped["name"], "Jane");
    }

    #[test]
    fn test_stamp_new_record_rejects_non_object() {
        let key = RecordKey::generate();
        let result = stamp_new_record(json!([1, 2, 3]), &key);
        assert!(result.is_err());
    }
}
