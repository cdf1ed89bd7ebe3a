//! Authentication primitives for the account service
//!
//! Provides the cryptographic building blocks the auth gate composes:
//! - Password hashing (Argon2id)
//! - Session-token issue and verification (HS256 JWT)
//! - Password-reset token generation (random secret, stored only as a digest)
//!
//! Construction is explicit: secrets and validity windows are passed in at
//! startup rather than read from ambient process state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{JwtHandler, SessionClaims};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = SessionClaims::for_subject("user123", Duration::hours(24));
//! let token = handler.encode(&claims).unwrap();
//! let decoded = handler.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```
//!
//! ## Reset Tokens
//! ```
//! use auth::ResetToken;
//!
//! let token = ResetToken::generate();
//! // Only `token.digest` is persisted; the plaintext travels out of band.
//! assert_eq!(ResetToken::digest_of(&token.plaintext), token.digest);
//! ```

pub mod jwt;
pub mod password;
pub mod reset;

pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use reset::ResetToken;
