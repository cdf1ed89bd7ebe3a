use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::UserPayload;
use crate::inbound::http::middleware::CurrentUser;

/// Returns the identity attached by the authenticate stage.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiSuccess<UserPayload> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}
