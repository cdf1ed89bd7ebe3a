use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for UserName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Please provide a valid email address")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Error for password policy violations, checked at the request boundary
/// before any plaintext reaches the hasher.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("Password must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Passwords are not the same")]
    ConfirmationMismatch,
}

/// Error for the password-reset notification channel
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Failed to send email: {0}")]
    Send(String),

    #[error("Invalid notifier configuration: {0}")]
    Config(String),

    #[error("Invalid recipient address: {0}")]
    Address(String),
}

/// Top-level error for all auth-gate operations.
///
/// Display strings are the client-facing messages; anything carrying
/// internal detail is logged and replaced with a generic body before it
/// leaves the service boundary.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (converted via #[from])
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("{0}")]
    PasswordRule(#[from] PasswordRuleError),

    // Credential errors. Unknown email and wrong password share one
    // variant so the client can never tell them apart.
    #[error("Please provide email and password")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Your current password is wrong")]
    WrongCurrentPassword,

    // Session-token errors
    #[error("You are not logged in. Please log in to get access")]
    NotLoggedIn,

    #[error("Invalid or expired token. Please log in again")]
    InvalidSessionToken,

    #[error("The user belonging to this token no longer exists")]
    SubjectGone,

    #[error("User recently changed password. Please log in again")]
    StaleToken,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    // Reset lifecycle
    #[error("There is no user with that email address")]
    EmailNotFound,

    #[error("Token is invalid or has expired")]
    InvalidResetToken,

    #[error("There was an error sending the email. Try again later")]
    NotifierFailure(String),

    // Store errors
    #[error("Email already in use: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Hashing(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    TokenIssue(String),

    #[error("Database error: {0}")]
    Database(String),
}
