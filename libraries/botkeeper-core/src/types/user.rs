/// User domain types
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat-bot end user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,

    /// Set once at creation
    pub joined_at: DateTime<Utc>,

    /// Bumped on every observed activity
    pub last_active: DateTime<Utc>,
}

/// Profile submitted on first contact
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl NewUser {
    /// Create a profile with only the id set
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Builder pattern: set first name
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Builder pattern: set last name
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Builder pattern: set username
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Builder pattern: set language code
    #[must_use]
    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    /// Materialize the stored user for an insert at `now`
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            language_code: self.language_code,
            joined_at: now,
            last_active: now,
        }
    }
}

/// Outcome of a create-or-touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpsert {
    /// True when a new document was inserted
    pub is_new: bool,

    /// Store identifier of the inserted document, if one was inserted
    pub inserted_id: Option<String>,
}

impl UserUpsert {
    pub fn inserted(id: impl Into<String>) -> Self {
        Self {
            is_new: true,
            inserted_id: Some(id.into()),
        }
    }

    pub fn touched() -> Self {
        Self {
            is_new: false,
            inserted_id: None,
        }
    }
}

/// Which users to count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    All,
    /// `joined_at >= since`
    JoinedSince(DateTime<Utc>),
    /// `last_active >= since`
    ActiveSince(DateTime<Utc>),
}

impl UserFilter {
    /// Evaluate the filter against a user
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::JoinedSince(since) => user.joined_at >= *since,
            Self::ActiveSince(since) => user.last_active >= *since,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_user_sets_both_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let user = NewUser::new(UserId::new("7"))
            .with_first_name("Ann")
            .with_language_code("en")
            .into_user(now);

        assert_eq!(user.joined_at, now);
        assert_eq!(user.last_active, now);
        assert_eq!(user.first_name.as_deref(), Some("Ann"));
        assert_eq!(user.last_name, None);
    }

    #[test]
    fn user_serializes_camel_case_with_nulls() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let user = NewUser::new(UserId::new("7")).into_user(now);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["userId"], "7");
        assert!(json["firstName"].is_null());
        assert_eq!(json["joinedAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut user = NewUser::new(UserId::new("1")).into_user(midnight);

        assert!(UserFilter::JoinedSince(midnight).matches(&user));
        assert!(UserFilter::ActiveSince(midnight).matches(&user));

        user.last_active = midnight - chrono::Duration::seconds(1);
        assert!(!UserFilter::ActiveSince(midnight).matches(&user));
        assert!(UserFilter::All.matches(&user));
    }
}
