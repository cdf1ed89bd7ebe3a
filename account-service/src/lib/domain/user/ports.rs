use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::Password;
use crate::domain::user::models::Session;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::errors::NotifierError;
use crate::user::models::EmailAddress;

/// Port for the auth-gate operations exposed to the HTTP layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a new account and issue a session token.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `Database` - Store operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<Session, AuthError>;

    /// Verify credentials and issue a session token.
    ///
    /// Unknown email and wrong password both fail with the same
    /// `InvalidCredentials`.
    ///
    /// # Errors
    /// * `MissingCredentials` - Email or password absent
    /// * `InvalidCredentials` - No matching user or password mismatch
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Verify a session token and reload its subject.
    ///
    /// # Errors
    /// * `InvalidSessionToken` - Bad signature, malformed, or expired
    /// * `SubjectGone` - Subject deleted or deactivated since issue
    /// * `StaleToken` - Password changed after the token was issued
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;

    /// Start the password-reset flow: store a reset-token digest and email
    /// the plaintext token. A notifier failure rolls the stored fields back
    /// before surfacing.
    ///
    /// # Errors
    /// * `EmailNotFound` - No active user with this email
    /// * `NotifierFailure` - Email could not be sent (after rollback)
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;

    /// Complete the reset flow with the plaintext token from the reset URL.
    ///
    /// # Errors
    /// * `InvalidResetToken` - No user matches the digest within the window
    async fn reset_password(&self, raw_token: &str, password: Password)
        -> Result<Session, AuthError>;

    /// Change the password of an authenticated user.
    ///
    /// # Errors
    /// * `WrongCurrentPassword` - Current password does not verify
    async fn update_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: Password,
    ) -> Result<Session, AuthError>;

    /// List all active users.
    async fn list_users(&self) -> Result<Vec<User>, AuthError>;
}

/// Persistence operations for the credential store.
///
/// Every read path excludes inactive (soft-deleted) users; the filter is
/// part of the contract, not a caller responsibility.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Database` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve an active user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve an active user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Retrieve an active user whose stored reset-token digest matches and
    /// whose reset expiry is still after `now`.
    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError>;

    /// Persist the current state of an existing user.
    async fn update(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve all active users.
    async fn list_all(&self) -> Result<Vec<User>, AuthError>;
}

/// Out-of-band delivery channel for password-reset tokens.
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync + 'static {
    /// Send the reset URL (embedding the plaintext token) to the user.
    ///
    /// # Errors
    /// * `Send` - Delivery failed; the caller rolls back the stored token
    async fn send_reset(
        &self,
        recipient: &EmailAddress,
        reset_url: &str,
    ) -> Result<(), NotifierError>;
}
