use crate::{interactions, users};
use async_trait::async_trait;
use botkeeper_core::{
    error::Result, storage::RecordStore, Interaction, NewInteraction, NewUser, User, UserFilter,
    UserId, UserUpsert,
};
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::{Client, Database};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// MongoDB store
///
/// Indexes are created on first use and retried until one attempt succeeds,
/// so a server that was down at startup still gets its unique `userId` index
/// before any user is written.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
    indexes: Arc<OnceCell<()>>,
}

impl MongoStore {
    pub fn new(client: Client, database: &str) -> Self {
        let db = client.database(database);
        Self {
            client,
            db,
            indexes: Arc::new(OnceCell::new()),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create both collections' indexes unless an earlier call already did
    pub async fn ensure_indexes(&self) -> crate::error::Result<()> {
        self.indexes
            .get_or_try_init(|| async {
                users::create_indexes(&self.db).await?;
                interactions::create_indexes(&self.db).await?;
                tracing::info!("Indexes ready on {}", self.db.name());
                Ok::<(), crate::StorageError>(())
            })
            .await?;
        Ok(())
    }

    pub fn indexes_ready(&self) -> bool {
        self.indexes.initialized()
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    fn database_name(&self) -> &str {
        self.db.name()
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(crate::StorageError::from)?;

        if let Err(e) = self.ensure_indexes().await {
            tracing::error!("Failed to create indexes: {}", e);
        }
        Ok(())
    }

    // Users
    async fn upsert_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<UserUpsert> {
        // Without the unique index two racing upserts can both insert
        self.ensure_indexes().await?;
        Ok(users::upsert(&self.db, user, now).await?)
    }

    async fn user_exists(&self, user_id: &UserId) -> Result<bool> {
        Ok(users::exists(&self.db, user_id).await?)
    }

    async fn touch_user(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<bool> {
        Ok(users::touch(&self.db, user_id, now).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(users::get_all(&self.db).await?)
    }

    async fn count_users(&self, filter: UserFilter) -> Result<u64> {
        Ok(users::count(&self.db, filter).await?)
    }

    async fn user_ids(&self) -> Result<Vec<UserId>> {
        Ok(users::get_ids(&self.db).await?)
    }

    // Interactions
    async fn insert_interaction(
        &self,
        interaction: NewInteraction,
        now: DateTime<Utc>,
    ) -> Result<String> {
        Ok(interactions::insert(&self.db, interaction, now).await?)
    }

    async fn recent_interactions(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Interaction>> {
        Ok(interactions::get_recent(&self.db, user_id, limit).await?)
    }

    async fn count_interactions(&self) -> Result<u64> {
        Ok(interactions::count(&self.db).await?)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn unreachable_store() -> MongoStore {
        crate::connect(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200",
            "botkeeper_test",
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn failed_index_creation_is_retried() {
        let store = unreachable_store().await;

        assert!(store.ensure_indexes().await.is_err());
        assert!(!store.indexes_ready());

        // A later attempt runs again instead of reusing the failure
        assert!(store.ensure_indexes().await.is_err());
        assert!(!store.indexes_ready());
    }

    #[tokio::test]
    async fn upsert_fails_when_indexes_cannot_be_created() {
        let store = unreachable_store().await;

        let result = store
            .upsert_user(NewUser::new(UserId::new("42")), Utc::now())
            .await;

        assert!(result.is_err());
        assert!(!store.indexes_ready());
    }
}
