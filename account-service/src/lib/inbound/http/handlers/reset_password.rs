use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserPayload;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session::session_cookie;

/// Completes the reset flow with the plaintext token from the reset URL.
/// A successful reset responds like a login: fresh token plus cookie.
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(token): Path<String>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<(CookieJar, ApiSuccess<UserPayload>), ApiError> {
    let password = Password::confirmed(body.password, body.password_confirm)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session = state.auth_service.reset_password(&token, password).await?;

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
pub struct ResetPasswordRequest {
    password: String,
    password_confirm: String,
}
