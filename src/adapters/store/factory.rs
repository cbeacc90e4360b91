//! Record store factory
//!
//! Creates the store backend named by the configuration.

use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::{PostgresClient, PostgresStore};
use crate::adapters::store::traits::RecordStore;
use crate::config::schema::{StoreTarget, WardConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create a record store based on the configuration
///
/// Examines `store_target` and constructs the matching backend.
///
/// # Errors
///
/// Returns an error if the backend cannot be created (e.g. the PostgreSQL
/// pool cannot be built).
pub async fn create_record_store(config: &WardConfig) -> Result<Arc<dyn RecordStore>> {
    match config.store_target {
        StoreTarget::Memory => {
            tracing::info!("Creating in-memory record store");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn RecordStore>)
        }
        StoreTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                crate::domain::WardError::Configuration(
                    "postgresql configuration is required when store_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL record store");
            let client = PostgresClient::new(pg_config.clone()).await?;
            let store = PostgresStore::new(client);

            Ok(Arc::new(store) as Arc<dyn RecordStore>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::WardConfig;

    #[tokio::test]
    async fn test_memory_target_builds_memory_store() {
        let config = WardConfig::memory_defaults();
        let store = create_record_store(&config).await.unwrap();
        assert!(store.as_any().downcast_ref::<MemoryStore>().is_some());
    }
}
