use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiSuccess;
use crate::inbound::http::session::logout_cookie;

/// Replaces the client's session cookie with a near-immediately expiring
/// sentinel. No server-side state is touched.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiSuccess<()>) {
    (
        jar.add(logout_cookie()),
        ApiSuccess::empty(StatusCode::OK),
    )
}
