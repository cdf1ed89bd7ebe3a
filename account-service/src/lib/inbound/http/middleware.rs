use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session::SESSION_COOKIE;
use crate::user::errors::AuthError;

/// Identity attached to the request by the authenticate stage.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication stage: extracts the candidate token (bearer header first,
/// session cookie second), verifies it, reloads the subject, and rejects
/// tokens issued before the last password change.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).or_else(|| cookie_token(req.headers()));

    let Some(token) = token else {
        return Err(AuthError::NotLoggedIn.into());
    };

    let user = state.auth_service.authenticate(&token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Authorization stage: allows the request only if the attached identity's
/// role is in the permitted set. Only reachable behind `authenticate`; see
/// the restricted-router builder.
pub async fn restrict_to(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>() else {
        // Construction via `restricted` makes this unreachable
        return Err(ApiError::InternalServerError(
            "restrict_to ran without an authenticated identity".to_string(),
        ));
    };

    if !allowed.contains(&user.role) {
        return Err(AuthError::Forbidden.into());
    }

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
