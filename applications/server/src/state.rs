/// Shared application state
use crate::error::Result;
use botkeeper_core::{RecordError, RecordStore};
use std::sync::Arc;

/// Application state shared across all handlers
///
/// `store` is `None` when no store client could be created at startup; the
/// service still runs and reports the failure per request.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn RecordStore>>,
    database_name: String,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            database_name: store.database_name().to_string(),
            store: Some(store),
        }
    }

    /// State for a process whose store could not be opened
    pub fn disconnected(database_name: impl Into<String>) -> Self {
        Self {
            store: None,
            database_name: database_name.into(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// The store, or a store error when none is connected
    pub fn store(&self) -> Result<&dyn RecordStore> {
        self.store
            .as_deref()
            .ok_or_else(|| RecordError::unavailable("no store connection").into())
    }

    /// Release the store connection
    pub async fn close(&self) {
        if let Some(store) = &self.store {
            store.close().await;
        }
    }
}
