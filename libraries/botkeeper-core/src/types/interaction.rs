/// Interaction domain types
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of interactions returned for one user
pub const INTERACTION_HISTORY_LIMIT: usize = 50;

/// One logged user action; append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub user_id: UserId,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub command: Option<String>,
    pub channel_key: Option<String>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// Interaction as submitted, before it is stamped
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewInteraction {
    pub user_id: UserId,
    pub action: String,
    pub command: Option<String>,
    pub channel_key: Option<String>,
    pub details: Map<String, Value>,
}

impl NewInteraction {
    pub fn new(user_id: UserId, action: impl Into<String>) -> Self {
        Self {
            user_id,
            action: action.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: set command
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Builder pattern: set channel key
    #[must_use]
    pub fn with_channel_key(mut self, channel_key: impl Into<String>) -> Self {
        self.channel_key = Some(channel_key.into());
        self
    }

    /// Builder pattern: add one details entry
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Stamp the interaction with its creation time
    pub fn into_interaction(self, now: DateTime<Utc>) -> Interaction {
        Interaction {
            user_id: self.user_id,
            action: self.action,
            timestamp: now,
            command: self.command,
            channel_key: self.channel_key,
            details: self.details,
        }
    }
}
