use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;

/// Name of the session cookie carrying the JWT.
pub const SESSION_COOKIE: &str = "jwt";

/// Sentinel written by logout in place of a real token.
const LOGOUT_SENTINEL: &str = "loggedout";

/// Build the session cookie delivered alongside every successful
/// authentication response: http-only, same-site, secure, path `/`.
pub fn session_cookie(token: String, expiration_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(true);
    cookie.set_path("/");
    cookie.set_expires(time::OffsetDateTime::now_utc() + time::Duration::days(expiration_days));
    cookie
}

/// Overwrite the client's session cookie with a near-immediately expiring
/// sentinel. The token itself stays valid until its embedded expiry; only
/// the client's copy is discarded.
pub fn logout_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, LOGOUT_SENTINEL);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_expires(time::OffsetDateTime::now_utc() + time::Duration::seconds(10));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), 90);

        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.expires().is_some());
    }

    #[test]
    fn test_logout_cookie_replaces_token() {
        let cookie = logout_cookie();

        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "loggedout");
        assert_eq!(cookie.http_only(), Some(true));
    }
}
