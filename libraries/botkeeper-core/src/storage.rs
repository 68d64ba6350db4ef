//! Storage trait for the `users` and `interactions` collections

use crate::error::Result;
use crate::types::{Interaction, NewInteraction, NewUser, User, UserFilter, UserId, UserUpsert};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Document store holding chat-bot users and their interactions
///
/// Implementations own their connection pooling and must be safe to share
/// across concurrently handled requests. Every method is a single,
/// independent store round-trip; callers never hold locks around them.
///
/// Timestamps are passed in by the caller so that one request uses one
/// notion of "now" across all of its writes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Name of the logical database this store reads and writes
    fn database_name(&self) -> &str;

    /// Lightweight liveness probe
    async fn ping(&self) -> Result<()>;

    // ========================================================================
    // Users
    // ========================================================================

    /// Create the user, or only bump `last_active` if `user_id` already exists
    ///
    /// Must never produce two documents for the same `user_id`, including
    /// when two calls race.
    async fn upsert_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<UserUpsert>;

    /// Whether a user with this id exists
    async fn user_exists(&self, user_id: &UserId) -> Result<bool>;

    /// Set `last_active = now`, returning whether a document was modified
    async fn touch_user(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<bool>;

    /// Every user, in store-native order
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Count users matching `filter`
    async fn count_users(&self, filter: UserFilter) -> Result<u64>;

    /// Every `user_id` value
    async fn user_ids(&self) -> Result<Vec<UserId>>;

    // ========================================================================
    // Interactions
    // ========================================================================

    /// Append one interaction stamped with `now`, returning its generated id
    async fn insert_interaction(
        &self,
        interaction: NewInteraction,
        now: DateTime<Utc>,
    ) -> Result<String>;

    /// At most `limit` interactions for `user_id`, newest first
    async fn recent_interactions(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Interaction>>;

    /// Total number of interactions
    async fn count_interactions(&self) -> Result<u64>;

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release the underlying connection; called once at shutdown
    async fn close(&self) {}
}
