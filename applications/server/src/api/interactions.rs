/// Interaction API routes
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
use botkeeper_core::{Interaction, NewInteraction, UserId, INTERACTION_HISTORY_LIMIT};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    pub action: Option<String>,
    pub command: Option<String>,
    pub channel_key: Option<String>,
    pub details: Option<Map<String, Value>>,
}

impl CreateInteractionRequest {
    pub fn validate(self) -> Result<NewInteraction> {
        let user_id = user_id_from_json(self.user_id)?;

        let (user_id, action) = match (user_id, self.action) {
            (Some(user_id), Some(action)) => (user_id, action),
            (None, None) => {
                return Err(ServerError::validation("userId and action are required"))
            }
            (None, Some(_)) => return Err(ServerError::validation("userId is required")),
            (Some(_), None) => return Err(ServerError::validation("action is required")),
        };

        Ok(NewInteraction {
            user_id,
            action,
            command: self.command,
            channel_key: self.channel_key,
            details: self.details.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionResponse {
    pub success: bool,
    pub message: String,
    pub inserted_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionsResponse {
    pub success: bool,
    pub interactions: Vec<Interaction>,
    pub count: usize,
    pub user_id: UserId,
}

/// POST /interactions - Record one user action
pub async fn create_interaction(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<CreateInteractionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateInteractionResponse>)> {
    let interaction = parse_body(payload)?.validate()?;

    let inserted_id = app_state
        .store()?
        .insert_interaction(interaction, Utc::now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateInteractionResponse {
            success: true,
            message: "Interaction recorded".to_string(),
            inserted_id,
        }),
    ))
}

/// GET /interactions/:user_id - Latest interactions, newest first
pub async fn list_interactions(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<InteractionsResponse>> {
    let user_id = UserId::new(user_id);
    let interactions = app_state
        .store()?
        .recent_interactions(&user_id, INTERACTION_HISTORY_LIMIT)
        .await?;

    Ok(Json(InteractionsResponse {
        success: true,
        count: interactions.len(),
        interactions,
        user_id,
    }))
}
