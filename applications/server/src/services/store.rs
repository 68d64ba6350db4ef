/// Store lifecycle: opened once at startup, closed at shutdown
use crate::{
    config::{StorageBackend, StorageSettings},
    error::{Result, ServerError},
    state::AppState,
};
use botkeeper_core::RecordStore;
use botkeeper_storage::{MemoryStore, MongoStore};
use std::sync::Arc;

/// Open the configured store and wrap it in application state
///
/// Never fails: when MongoDB cannot be reached the error is logged and the
/// service starts anyway, reporting the problem through `GET /` and 500s.
pub async fn open_store(settings: &StorageSettings) -> AppState {
    match settings.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            AppState::new(Arc::new(MemoryStore::new(settings.database_name.clone())))
        }
        StorageBackend::Mongodb => match open_mongo(settings).await {
            Ok(store) => {
                // A successful ping also creates the indexes; otherwise the
                // first upsert after recovery does
                match store.ping().await {
                    Ok(()) => tracing::info!("Connected to MongoDB successfully"),
                    Err(e) => tracing::error!("Failed to connect to MongoDB: {}", e),
                }
                AppState::new(Arc::new(store))
            }
            Err(e) => {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                AppState::disconnected(settings.database_name.clone())
            }
        },
    }
}

/// Build a MongoDB client for the configured database
pub async fn open_mongo(settings: &StorageSettings) -> Result<MongoStore> {
    botkeeper_storage::connect(&settings.mongodb_uri, &settings.database_name)
        .await
        .map_err(|e| ServerError::Store(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[tokio::test]
    async fn memory_backend_is_connected() {
        let mut settings = ServerConfig::default().storage;
        settings.backend = StorageBackend::Memory;
        settings.database_name = "bot_records".to_string();

        let state = open_store(&settings).await;
        assert!(state.is_connected());
        assert_eq!(state.database_name(), "bot_records");
    }

    #[tokio::test]
    async fn invalid_uri_starts_disconnected() {
        let mut settings = ServerConfig::default().storage;
        settings.mongodb_uri = "not-a-mongodb-uri".to_string();

        let state = open_store(&settings).await;
        assert!(!state.is_connected());
        assert_eq!(state.database_name(), "botkeeper");
        assert!(state.store().is_err());
    }

    #[tokio::test]
    async fn unreachable_server_keeps_store_without_indexes() {
        let mut settings = ServerConfig::default().storage;
        settings.mongodb_uri = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200".to_string();

        let state = open_store(&settings).await;
        assert!(state.is_connected());

        // Writes stay blocked until the unique index can be created
        let store = state.store().unwrap();
        assert!(store.ping().await.is_err());
        let result = store
            .upsert_user(
                botkeeper_core::NewUser::new(botkeeper_core::UserId::new("42")),
                chrono::Utc::now(),
            )
            .await;
        assert!(result.is_err());
    }
}
