use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordRuleError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// The credential store owns this record exclusively; the auth gate holds
/// only request-scoped copies and never caches them across requests.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub password_reset_token_hash: Option<String>,
    pub password_reset_expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl User {
    /// True if the password was changed after a token with the given issue
    /// timestamp was minted. Such a token is stale and must be rejected
    /// regardless of signature validity.
    pub fn changed_password_after(&self, token_issued_at: i64) -> bool {
        self.password_changed_at
            .map_or(false, |changed| token_issued_at < changed.timestamp())
    }

    /// Record a password mutation. The timestamp is backdated one second so
    /// a session token minted within the same second as the change still
    /// reads as issued after it.
    pub fn record_password_change(&mut self) {
        self.password_changed_at = Some(Utc::now() - Duration::seconds(1));
    }

    /// Store a new outstanding reset token, replacing any previous one.
    pub fn set_reset_token(&mut self, digest: String, expires_at: DateTime<Utc>) {
        self.password_reset_token_hash = Some(digest);
        self.password_reset_expires_at = Some(expires_at);
    }

    /// Clear the outstanding reset token; hash and expiry always move
    /// together.
    pub fn clear_reset_token(&mut self) {
        self.password_reset_token_hash = None;
        self.password_reset_expires_at = None;
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display-name value type. Non-empty after trimming, at most 100
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MAX_LENGTH: usize = 100;

    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: name.len(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Lowercased on construction so lookups are case-insensitive, then
/// validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fixed role enumeration; default `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::LeadGuide => "lead-guide",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "guide" => Ok(Role::Guide),
            "lead-guide" => Ok(Role::LeadGuide),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plaintext password that has passed the length policy. The confirmation
/// field is checked here and never persisted anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    pub fn new(password: String) -> Result<Self, PasswordRuleError> {
        let length = password.len();
        if length < Self::MIN_LENGTH {
            return Err(PasswordRuleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    /// Validate a password together with its confirmation field.
    ///
    /// # Errors
    /// * `ConfirmationMismatch` - The two values differ
    /// * `TooShort` - Below the minimum length
    pub fn confirmed(password: String, confirmation: String) -> Result<Self, PasswordRuleError> {
        if password != confirmation {
            return Err(PasswordRuleError::ConfirmationMismatch);
        }
        Self::new(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to sign up a new user with validated fields.
#[derive(Debug)]
pub struct SignUpCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

impl SignUpCommand {
    pub fn new(name: UserName, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// A successful authentication: the loaded user and a freshly issued
/// session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_lowercased() {
        let email = EmailAddress::new("Alice@Example.COM".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_name_rejects_blank() {
        assert_eq!(UserName::new("   ".to_string()), Err(NameError::Empty));
    }

    #[test]
    fn test_password_policy() {
        assert!(matches!(
            Password::new("short".to_string()),
            Err(PasswordRuleError::TooShort { min: 8, actual: 5 })
        ));
        assert!(Password::new("longenough".to_string()).is_ok());
        assert!(matches!(
            Password::confirmed("secret123".to_string(), "secret124".to_string()),
            Err(PasswordRuleError::ConfirmationMismatch)
        ));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Guide, Role::LeadGuide, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_changed_password_after() {
        let mut user = User {
            id: UserId::new(),
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            role: Role::default(),
            password_changed_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            active: true,
        };

        // Never-changed accounts accept any issue time
        assert!(!user.changed_password_after(0));

        user.password_changed_at = Some(Utc::now());
        let changed = user.password_changed_at.unwrap().timestamp();

        assert!(user.changed_password_after(changed - 10));
        assert!(!user.changed_password_after(changed));
        assert!(!user.changed_password_after(changed + 10));
    }

    #[test]
    fn test_record_password_change_is_backdated() {
        let mut user = User {
            id: UserId::new(),
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            role: Role::default(),
            password_changed_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            active: true,
        };

        user.record_password_change();

        // A token minted in the same second as the change stays valid
        assert!(!user.changed_password_after(Utc::now().timestamp()));
    }

    #[test]
    fn test_reset_token_fields_move_together() {
        let mut user = User {
            id: UserId::new(),
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            role: Role::default(),
            password_changed_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            active: true,
        };

        user.set_reset_token("digest".to_string(), Utc::now());
        assert!(user.password_reset_token_hash.is_some());
        assert!(user.password_reset_expires_at.is_some());

        user.clear_reset_token();
        assert!(user.password_reset_token_hash.is_none());
        assert!(user.password_reset_expires_at.is_none());
    }
}
