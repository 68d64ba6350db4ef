/// HTTP routing
use crate::{api, error::ServerError, state::AppState};
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(api::health::health))
        // Users
        .route("/users", post(api::users::create_user))
        .route("/users", get(api::users::list_users))
        .route("/users/count", get(api::users::count_users))
        .route("/users/broadcast-list", get(api::users::broadcast_list))
        .route("/users/:user_id/exists", get(api::users::user_exists))
        .route("/users/:user_id/activity", put(api::users::touch_user))
        // Interactions
        .route("/interactions", post(api::interactions::create_interaction))
        .route(
            "/interactions/:user_id",
            get(api::interactions::list_interactions),
        )
        // Stats
        .route("/stats", get(api::stats::stats))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn not_found() -> ServerError {
    ServerError::NotFound
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    ServerError::Internal(format!("handler panicked: {}", detail)).into_response()
}
