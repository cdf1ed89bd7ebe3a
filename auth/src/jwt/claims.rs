use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// The token proves a prior successful authentication for `sub`. Expiry is
/// encoded in the token itself; `iat` is compared against the subject's
/// password-change timestamp to reject stale tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for a subject with expiry a fixed duration from now.
    pub fn for_subject(subject: impl ToString, validity: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
        }
    }
}
