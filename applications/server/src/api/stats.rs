/// Statistics API route
use crate::{error::Result, services::stats::collect_stats, state::AppState};
use axum::{extract::State, Json};
use botkeeper_core::Stats;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Stats,
}

/// GET /stats - Collection-wide counters
pub async fn stats(State(app_state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = collect_stats(app_state.store()?, Utc::now()).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
