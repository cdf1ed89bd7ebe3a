use thiserror::Error;

/// Error type for session-token operations.
///
/// Verification failures carry no detail a client could use to tell a bad
/// signature from a malformed token; expiry is distinguished only so the
/// caller can log it.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token is expired")]
    TokenExpired,
}
