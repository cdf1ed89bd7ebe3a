use std::sync::Arc;

use async_trait::async_trait;
use auth::JwtError;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::ResetToken;
use auth::SessionClaims;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::Password;
use crate::domain::user::models::Role;
use crate::domain::user::models::Session;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::PasswordResetNotifier;
use crate::user::ports::UserRepository;

/// Reset tokens expire ten minutes after issue.
const RESET_TOKEN_TTL: i64 = 10;

/// The auth gate: orchestrates credential verification, token issue,
/// the reset-token lifecycle, and identity reloads for protected requests.
///
/// All collaborators are injected; the signing secret and validity windows
/// are fixed at construction.
pub struct AuthService<UR, N>
where
    UR: UserRepository,
    N: PasswordResetNotifier,
{
    repository: Arc<UR>,
    notifier: Arc<N>,
    password_hasher: PasswordHasher,
    tokens: JwtHandler,
    token_validity: Duration,
    reset_token_ttl: Duration,
    reset_url_base: String,
}

impl<UR, N> AuthService<UR, N>
where
    UR: UserRepository,
    N: PasswordResetNotifier,
{
    pub fn new(
        repository: Arc<UR>,
        notifier: Arc<N>,
        jwt_secret: &[u8],
        token_validity: Duration,
        reset_url_base: String,
    ) -> Self {
        Self {
            repository,
            notifier,
            password_hasher: PasswordHasher::new(),
            tokens: JwtHandler::new(jwt_secret),
            token_validity,
            reset_token_ttl: Duration::minutes(RESET_TOKEN_TTL),
            reset_url_base,
        }
    }

    /// Override the reset-token expiry window. Used by tests that need the
    /// window to close immediately.
    pub fn with_reset_token_ttl(mut self, ttl: Duration) -> Self {
        self.reset_token_ttl = ttl;
        self
    }

    fn issue_session(&self, user: User) -> Result<Session, AuthError> {
        let claims = SessionClaims::for_subject(&user.id, self.token_validity);
        let token = self
            .tokens
            .encode(&claims)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        Ok(Session { user, token })
    }
}

#[async_trait]
impl<UR, N> AuthServicePort for AuthService<UR, N>
where
    UR: UserRepository,
    N: PasswordResetNotifier,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<Session, AuthError> {
        let password_hash = self.password_hasher.hash(command.password.as_str())?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role: Role::default(),
            password_changed_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            active: true,
        };

        let created = self.repository.create(user).await?;
        tracing::info!(user_id = %created.id, "User signed up");

        self.issue_session(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let email = email.trim().to_lowercase();
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = self
            .password_hasher
            .verify(password, &user.password_hash)?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_session(user)
    }

    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.decode(token).map_err(|e| {
            match e {
                JwtError::TokenExpired => tracing::debug!("Session token expired"),
                _ => tracing::warn!("Session token rejected: {}", e),
            }
            // Expiry and signature failures are not distinguished to the client
            AuthError::InvalidSessionToken
        })?;

        let user_id =
            UserId::from_string(&claims.sub).map_err(|_| AuthError::InvalidSessionToken)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::SubjectGone)?;

        if user.changed_password_after(claims.iat) {
            return Err(AuthError::StaleToken);
        }

        Ok(user)
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        let mut user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        let reset_token = ResetToken::generate();
        user.set_reset_token(reset_token.digest, Utc::now() + self.reset_token_ttl);

        let mut user = self.repository.update(user).await?;

        let reset_url = format!(
            "{}/api/v1/users/resetPassword/{}",
            self.reset_url_base, reset_token.plaintext
        );

        if let Err(e) = self.notifier.send_reset(&user.email, &reset_url).await {
            // The stored token is useless if the email never went out, and
            // leaving it would keep a live secret digest around. Clearing
            // must be persisted before the failure surfaces.
            user.clear_reset_token();
            if let Err(rollback) = self.repository.update(user).await {
                tracing::error!(error = %rollback, "Failed to roll back reset token");
            }

            tracing::error!(error = %e, "Password reset email failed");
            return Err(AuthError::NotifierFailure(e.to_string()));
        }

        tracing::info!(user_id = %user.id, "Password reset token sent");
        Ok(())
    }

    async fn reset_password(
        &self,
        raw_token: &str,
        password: Password,
    ) -> Result<Session, AuthError> {
        let digest = ResetToken::digest_of(raw_token);

        let mut user = self
            .repository
            .find_by_reset_digest(&digest, Utc::now())
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        user.password_hash = self.password_hasher.hash(password.as_str())?;
        user.clear_reset_token();
        user.record_password_change();

        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "Password reset completed");

        self.issue_session(user)
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: Password,
    ) -> Result<Session, AuthError> {
        let mut user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::SubjectGone)?;

        let verified = self
            .password_hasher
            .verify(current_password, &user.password_hash)?;
        if !verified {
            return Err(AuthError::WrongCurrentPassword);
        }

        user.password_hash = self.password_hasher.hash(new_password.as_str())?;
        user.record_password_change();

        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "Password updated");

        self.issue_session(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        self.repository.list_all().await
    }
}
