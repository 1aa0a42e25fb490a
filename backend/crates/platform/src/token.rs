//! Signed bearer tokens
//!
//! HS256 JWTs carrying `{ id, role, exp }`. The role is an opaque string at
//! this layer; the auth crate parses it back into its closed role enum.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fixed lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: Uuid,
    pub role: String,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token")]
    Malformed,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, id: Uuid, role: &str) -> Result<String, TokenError> {
        let claims = TokenClaims {
            id,
            role: role.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;

                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token verification failed: expired");
                        TokenError::Expired
                    }
                    ErrorKind::InvalidSignature => {
                        tracing::warn!("Token verification failed: bad signature");
                        TokenError::InvalidSignature
                    }
                    _ => {
                        tracing::debug!(error = %e, "Token verification failed: malformed");
                        TokenError::Malformed
                    }
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret-do-not-use", DEFAULT_TOKEN_TTL_SECS)
    }

    #[test]
    fn test_issue_and_verify() {
        let id = Uuid::new_v4();
        let token = signer().issue(id, "provider").unwrap();

        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.id, id);
        assert_eq!(claims.role, "provider");

        let remaining = claims.exp - Utc::now().timestamp();
        assert!(remaining > DEFAULT_TOKEN_TTL_SECS - 60 && remaining <= DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = signer().issue(Uuid::new_v4(), "client").unwrap();
        let other = TokenSigner::new(b"another-secret", DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = TokenSigner::new(b"test-secret-do-not-use", -120);
        let token = expired.issue(Uuid::new_v4(), "client").unwrap();
        assert_eq!(signer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(signer().verify("invalid.jwt.token"), Err(TokenError::Malformed));
        assert_eq!(signer().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", signer());
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("test-secret"));
    }
}
