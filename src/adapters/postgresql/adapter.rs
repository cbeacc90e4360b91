//! PostgreSQL record store adapter
//!
//! Implements [`RecordStore`] over a single `records` table keyed by
//! `(collection, key)` with a JSONB body. Keys are time-prefixed, so
//! `ORDER BY key` reproduces creation order.
//!
//! Change events cover writes made through this process only; external
//! writers are not observed.

use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::store::traits::{
    now_millis, stamp_new_record, ChangeKind, CollectionEvent, RecordStore, RecordSubscription,
};
use crate::domain::errors::StoreError;
use crate::domain::ids::RecordKey;
use crate::domain::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// PostgreSQL-backed record store
pub struct PostgresStore {
    client: PostgresClient,
    events: broadcast::Sender<CollectionEvent>,
}

impl PostgresStore {
    pub fn new(client: PostgresClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { client, events }
    }

    fn emit(&self, collection: &str, key: &RecordKey, kind: ChangeKind) {
        let _ = self.events.send(CollectionEvent {
            collection: collection.to_string(),
            key: key.clone(),
            kind,
        });
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn create_record(&self, collection: &str, data: Value) -> Result<RecordKey> {
        let key = RecordKey::generate();
        let stamped = stamp_new_record(data, &key)?;

        self.client
            .execute(
                "INSERT INTO records (collection, key, data) VALUES ($1, $2, $3)",
                &[&collection, &key.as_str(), &Value::Object(stamped)],
            )
            .await?;

        self.emit(collection, &key, ChangeKind::Created);
        tracing::debug!(collection, key = %key, "Record created");
        Ok(key)
    }

    async fn get_collection(&self, collection: &str) -> Result<BTreeMap<RecordKey, Value>> {
        let rows = self
            .client
            .query(
                "SELECT key, data FROM records WHERE collection = $1 ORDER BY key",
                &[&collection],
            )
            .await?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let key: String = row.get(0);
            let data: Value = row.get(1);
            let key = RecordKey::new(key).map_err(StoreError::InvalidData)?;
            snapshot.insert(key, data);
        }
        Ok(snapshot)
    }

    async fn get_record(&self, collection: &str, key: &RecordKey) -> Result<Value> {
        let row = self
            .client
            .query_opt(
                "SELECT data FROM records WHERE collection = $1 AND key = $2",
                &[&collection, &key.as_str()],
            )
            .await?;

        match row {
            Some(row) => Ok(row.get(0)),
            None => Err(StoreError::RecordNotFound {
                collection: collection.to_string(),
                key: key.as_str().to_string(),
            }
            .into()),
        }
    }

    async fn update_record(
        &self,
        collection: &str,
        key: &RecordKey,
        mut updates: Map<String, Value>,
    ) -> Result<()> {
        // The merge happens server-side via jsonb concatenation; updatedAt
        // rides along in the same patch.
        updates.insert("updatedAt".to_string(), Value::from(now_millis()));

        let affected = self
            .client
            .execute(
                "UPDATE records SET data = data || $3, updated_at = now() \
                 WHERE collection = $1 AND key = $2",
                &[&collection, &key.as_str(), &Value::Object(updates)],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::RecordNotFound {
                collection: collection.to_string(),
                key: key.as_str().to_string(),
            }
            .into());
        }

        self.emit(collection, key, ChangeKind::Updated);
        tracing::debug!(collection, key = %key, "Record updated");
        Ok(())
    }

    async fn delete_record(&self, collection: &str, key: &RecordKey) -> Result<()> {
        let affected = self
            .client
            .execute(
                "DELETE FROM records WHERE collection = $1 AND key = $2",
                &[&collection, &key.as_str()],
            )
            .await?;

        if affected > 0 {
            self.emit(collection, key, ChangeKind::Deleted);
            tracing::debug!(collection, key = %key, "Record deleted");
        }
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> RecordSubscription {
        RecordSubscription::new(self.events.subscribe(), collection.to_string())
    }
}
