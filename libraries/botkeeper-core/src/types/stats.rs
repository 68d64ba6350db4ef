/// Aggregate statistics
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection-wide counters
///
/// `recent_users_24h` and `active_users_24h` count from the start of the
/// current UTC calendar day, not over a rolling 24 hour window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: u64,
    pub total_interactions: u64,
    #[serde(rename = "recentUsers24h")]
    pub recent_users_24h: u64,
    #[serde(rename = "activeUsers24h")]
    pub active_users_24h: u64,
    pub timestamp: DateTime<Utc>,
}
