use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserPayload;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::UserName;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session::session_cookie;
use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordRuleError;

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignUpRequest>,
) -> Result<(CookieJar, ApiSuccess<UserPayload>), ApiError> {
    let session = state.auth_service.sign_up(body.try_into_command()?).await?;

    let jar = jar.add(session_cookie(
        session.token.clone(),
        state.cookie_expiration_days,
    ));

    Ok((
        jar,
        ApiSuccess::with_token(StatusCode::CREATED, session.token, (&session.user).into()),
    ))
}

/// HTTP request body for signup (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    name: String,
    email: String,
    password: String,
    password_confirm: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] NameError),

    #[error("{0}")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Password(#[from] PasswordRuleError),
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, ParseSignUpRequestError> {
        let name = UserName::new(self.name)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::confirmed(self.password, self.password_confirm)?;
        Ok(SignUpCommand::new(name, email, password))
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
