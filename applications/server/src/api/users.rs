/// User API routes
use crate::{
    api::{parse_body, user_id_from_json},
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use botkeeper_core::{NewUser, User, UserFilter, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser> {
        let user_id = user_id_from_json(self.user_id)?
            .ok_or_else(|| ServerError::validation("userId is required"))?;

        Ok(NewUser {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            language_code: self.language_code,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub message: String,
    pub user_id: UserId,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExistsResponse {
    pub exists: bool,
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub success: bool,
    pub modified: bool,
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub success: bool,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastListResponse {
    pub success: bool,
    pub user_ids: Vec<UserId>,
    pub count: usize,
}

/// POST /users - Create a user, or bump `lastActive` if it already exists
pub async fn create_user(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>)> {
    let user = parse_body(payload)?.validate()?;
    let user_id = user.user_id.clone();

    let outcome = app_state.store()?.upsert_user(user, Utc::now()).await?;

    if outcome.is_new {
        tracing::info!("New user {}", user_id);
        Ok((
            StatusCode::CREATED,
            Json(CreateUserResponse {
                success: true,
                message: "User added successfully".to_string(),
                user_id,
                is_new: true,
                inserted_id: outcome.inserted_id,
            }),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(CreateUserResponse {
                success: true,
                message: "User already exists, updated activity".to_string(),
                user_id,
                is_new: false,
                inserted_id: None,
            }),
        ))
    }
}

/// GET /users/:user_id/exists
pub async fn user_exists(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<UserExistsResponse>> {
    let user_id = UserId::new(user_id);
    let exists = app_state.store()?.user_exists(&user_id).await?;

    Ok(Json(UserExistsResponse { exists, user_id }))
}

/// PUT /users/:user_id/activity - Set `lastActive` to now
pub async fn touch_user(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<ActivityResponse>> {
    let user_id = UserId::new(user_id);
    let modified = app_state.store()?.touch_user(&user_id, Utc::now()).await?;

    Ok(Json(ActivityResponse {
        success: true,
        modified,
        user_id,
    }))
}

/// GET /users
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<UsersResponse>> {
    let users = app_state.store()?.list_users().await?;

    Ok(Json(UsersResponse {
        success: true,
        count: users.len(),
        users,
    }))
}

/// GET /users/count
pub async fn count_users(State(app_state): State<AppState>) -> Result<Json<CountResponse>> {
    let count = app_state.store()?.count_users(UserFilter::All).await?;

    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

/// GET /users/broadcast-list - Every user id, for fan-out messaging
pub async fn broadcast_list(
    State(app_state): State<AppState>,
) -> Result<Json<BroadcastListResponse>> {
    let user_ids = app_state.store()?.user_ids().await?;

    Ok(Json(BroadcastListResponse {
        success: true,
        count: user_ids.len(),
        user_ids,
    }))
}
