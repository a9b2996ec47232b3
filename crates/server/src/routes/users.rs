//! User route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::CreatedResponse;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// `POST /users` - register a new user.
///
/// The "at least one of phone/email" rule lives in the domain service,
/// not here.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = state.users.register(&req.phone, &req.email).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.as_i32() }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_defaults_missing_fields() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email": "a@b.com"}"#).expect("valid body");
        assert_eq!(req.phone, "");
        assert_eq!(req.email, "a@b.com");
    }
}
