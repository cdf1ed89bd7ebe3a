use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Starts the reset flow. The acknowledgment never echoes the token; it
/// travels only through the email channel.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state.auth_service.forgot_password(&body.email).await?;

    Ok(ApiSuccess::message(StatusCode::OK, "Token sent to email"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    email: String,
}
