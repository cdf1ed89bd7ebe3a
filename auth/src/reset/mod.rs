//! Password-reset token generation.
//!
//! A reset token is a single-use, short-lived, high-entropy secret. The
//! plaintext travels to the user out of band (email); only its SHA-256
//! digest is ever persisted, so a leaked credential store cannot be used to
//! reset passwords.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

/// A freshly generated reset token: the plaintext to send and the digest to
/// store.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Hex-encoded random secret, sent to the user.
    pub plaintext: String,
    /// Hex-encoded SHA-256 of the plaintext, the only form persisted.
    pub digest: String,
}

impl ResetToken {
    /// Generate a new token from 32 bytes of OS randomness.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);

        let plaintext = hex::encode(bytes);
        let digest = Self::digest_of(&plaintext);

        Self { plaintext, digest }
    }

    /// Digest of a candidate plaintext, for lookup against the stored form.
    pub fn digest_of(plaintext: &str) -> String {
        hex::encode(Sha256::digest(plaintext.as_bytes()))
    }
}
