/// Health check API route
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HealthResponse {
    fn unhealthy() -> Self {
        Self {
            status: "error".to_string(),
            message: "Database connection failed".to_string(),
            database: None,
            timestamp: None,
        }
    }
}

/// GET / - Health check endpoint, pings the store
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = match app_state.store() {
        Ok(store) => store,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse::unhealthy()),
            )
        }
    };

    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                message: "Botkeeper API is running".to_string(),
                database: Some(app_state.database_name().to_string()),
                timestamp: Some(Utc::now()),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check ping failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse::unhealthy()),
            )
        }
    }
}
