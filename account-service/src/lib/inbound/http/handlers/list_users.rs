use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

/// Admin-only listing of active users.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<UsersPayload>, ApiError> {
    let users = state.auth_service.list_users().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UsersPayload {
            users: users.iter().map(UserData::from).collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsersPayload {
    pub users: Vec<UserData>,
}
