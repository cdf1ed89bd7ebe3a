use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserPayload;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session::session_cookie;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<UserPayload>), ApiError> {
    let session = state
        .auth_service
        .login(&body.email, &body.password)
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
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}
