use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::JwtError;

/// Session-token signer and verifier.
///
/// HS256 over [`SessionClaims`]; the signature covers subject, issue time,
/// and expiry. The secret should be at least 32 bytes and is supplied at
/// construction, never read from the environment here.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a token.
    ///
    /// Expiry is checked against the embedded `exp` claim. All structural
    /// and signature failures collapse into `InvalidToken`.
    ///
    /// # Errors
    /// * `TokenExpired` - Past the embedded expiry
    /// * `InvalidToken` - Bad signature or malformed token
    pub fn decode(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let claims = SessionClaims::for_subject("user123", Duration::hours(1));
        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_malformed_token() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let result = handler.decode("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let claims = SessionClaims::for_subject("user123", Duration::hours(1));
        let token = handler1.encode(&claims).expect("Failed to encode token");

        let result = handler2.decode(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        // Issued two hours ago with a one-hour validity
        let claims = SessionClaims {
            sub: "user123".to_string(),
            iat: (chrono::Utc::now() - Duration::hours(2)).timestamp(),
            exp: (chrono::Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = handler.encode(&claims).expect("Failed to encode token");

        let result = handler.decode(&token);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_tokens_for_same_subject_differ() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let now = chrono::Utc::now().timestamp();
        let first = handler
            .encode(&SessionClaims {
                sub: "user123".to_string(),
                iat: now,
                exp: now + 3600,
            })
            .unwrap();
        let second = handler
            .encode(&SessionClaims {
                sub: "user123".to_string(),
                iat: now + 1,
                exp: now + 3601,
            })
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(handler.decode(&first).unwrap().sub, "user123");
        assert_eq!(handler.decode(&second).unwrap().sub, "user123");
    }
}
