/// Common test utilities and fixtures
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use botkeeper_core::{
    Interaction, NewInteraction, NewUser, RecordError, RecordStore, Result, User, UserFilter,
    UserId, UserUpsert,
};
use botkeeper_server::{create_router, AppState};
use botkeeper_storage::MemoryStore;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router backed by a fresh in-memory store
pub fn create_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new("botkeeper_test"));
    let app = create_router(AppState::new(store.clone()));
    (app, store)
}

/// Router whose store fails every call
pub fn create_failing_app() -> Router {
    create_router(AppState::new(Arc::new(FailingStore)))
}

/// Router with no store at all, as after a failed startup connection
pub fn create_disconnected_app() -> Router {
    create_router(AppState::disconnected("botkeeper_test"))
}

/// Send a request and decode the JSON response body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Store that reports a database error from every operation
pub struct FailingStore;

fn down<T>() -> Result<T> {
    Err(RecordError::database("connection refused"))
}

#[async_trait]
impl RecordStore for FailingStore {
    fn database_name(&self) -> &str {
        "botkeeper_test"
    }

    async fn ping(&self) -> Result<()> {
        down()
    }

    async fn upsert_user(&self, _user: NewUser, _now: DateTime<Utc>) -> Result<UserUpsert> {
        down()
    }

    async fn user_exists(&self, _user_id: &UserId) -> Result<bool> {
        down()
    }

    async fn touch_user(&self, _user_id: &UserId, _now: DateTime<Utc>) -> Result<bool> {
        down()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        down()
    }

    async fn count_users(&self, _filter: UserFilter) -> Result<u64> {
        down()
    }

    async fn user_ids(&self) -> Result<Vec<UserId>> {
        down()
    }

    async fn insert_interaction(
        &self,
        _interaction: NewInteraction,
        _now: DateTime<Utc>,
    ) -> Result<String> {
        down()
    }

    async fn recent_interactions(
        &self,
        _user_id: &UserId,
        _limit: usize,
    ) -> Result<Vec<Interaction>> {
        down()
    }

    async fn count_interactions(&self) -> Result<u64> {
        down()
    }
}
