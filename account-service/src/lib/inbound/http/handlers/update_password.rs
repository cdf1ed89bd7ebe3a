use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserPayload;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session::session_cookie;

/// Changes the authenticated user's password after re-verifying the current
/// one, then issues a fresh session token (every earlier token is now
/// stale).
pub async fn update_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<(CookieJar, ApiSuccess<UserPayload>), ApiError> {
    let new_password = Password::confirmed(body.password, body.password_confirm)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session = state
        .auth_service
        .update_password(&user.id, &body.password_current, new_password)
        .await?;

    let jar = jar.add(session_cookie(
        session.token.clone(),
        state.cookie_expiration_days,
    ));

    Ok((
        jar,
        ApiSuccess::with_token(StatusCode::OK, session.token, (&session.user).into()),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    password_current: String,
    password: String,
    password_confirm: String,
}
