/// API route modules
pub mod health;
pub mod interactions;
pub mod stats;
pub mod users;

use crate::error::{Result, ServerError};
use axum::{extract::rejection::JsonRejection, Json};
use botkeeper_core::UserId;
use serde_json::Value;

/// Unwrap a JSON body, turning any rejection into a 400
pub(crate) fn parse_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::validation(rejection.body_text()))
}

/// Accept `userId` as a string or an integer; chat platforms send both
pub(crate) fn user_id_from_json(raw: Option<Value>) -> Result<Option<UserId>> {
    match raw {
        None => Ok(None),
        Some(Value::String(id)) => Ok(Some(UserId::new(id))),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(Some(UserId::new(n.to_string())))
        }
        Some(_) => Err(ServerError::validation("userId must be a string or integer")),
    }
}
