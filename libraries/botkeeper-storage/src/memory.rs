use async_trait::async_trait;
use botkeeper_core::{
    error::Result, storage::RecordStore, Interaction, NewInteraction, NewUser, User, UserFilter,
    UserId, UserUpsert,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store with the same semantics as [`crate::MongoStore`]
///
/// Users keep insertion order, which stands in for the store-native order of
/// a real collection. Nothing is persisted.
pub struct MemoryStore {
    name: String,
    inner: RwLock<Collections>,
}

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    user_index: HashMap<UserId, usize>,
    interactions: Vec<Interaction>,
    next_id: u64,
}

impl Collections {
    /// Monotonic, 24 hex digits like an ObjectId
    fn generate_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", self.next_id)
    }
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: RwLock::new(Collections::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.name
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<UserUpsert> {
        let mut inner = self.inner.write().await;

        if let Some(&pos) = inner.user_index.get(&user.user_id) {
            inner.users[pos].last_active = now;
            return Ok(UserUpsert::touched());
        }

        let id = inner.generate_id();
        let pos = inner.users.len();
        inner.user_index.insert(user.user_id.clone(), pos);
        inner.users.push(user.into_user(now));

        Ok(UserUpsert::inserted(id))
    }

    async fn user_exists(&self, user_id: &UserId) -> Result<bool> {
        Ok(self.inner.read().await.user_index.contains_key(user_id))
    }

    async fn touch_user(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(&pos) = inner.user_index.get(user_id) else {
            return Ok(false);
        };

        let user = &mut inner.users[pos];
        // Same as MongoDB: writing an identical value is not a modification
        let modified = user.last_active != now;
        user.last_active = now;
        Ok(modified)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn count_users(&self, filter: UserFilter) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn user_ids(&self) -> Result<Vec<UserId>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().map(|u| u.user_id.clone()).collect())
    }

    async fn insert_interaction(
        &self,
        interaction: NewInteraction,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let mut inner = self.inner.write().await;
        let id = inner.generate_id();
        inner.interactions.push(interaction.into_interaction(now));
        Ok(id)
    }

    async fn recent_interactions(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Interaction>> {
        let inner = self.inner.read().await;

        // Walking backwards puts later inserts first among equal timestamps
        let mut found: Vec<Interaction> = inner
            .interactions
            .iter()
            .rev()
            .filter(|i| &i.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        found.truncate(limit);

        Ok(found)
    }

    async fn count_interactions(&self) -> Result<u64> {
        Ok(self.inner.read().await.interactions.len() as u64)
    }
}
