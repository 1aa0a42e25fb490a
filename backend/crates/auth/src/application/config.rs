//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;

use platform::token::{DEFAULT_TOKEN_TTL_SECS, TokenSigner};

#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: Vec<u8>,
    /// Token lifetime in seconds (1 hour)
    pub token_ttl_secs: i64,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            password_pepper: None,
        }
    }

    /// Config with a random 32-byte signing secret (for development).
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret.to_vec())
    }

    pub fn with_pepper(mut self, pepper: Option<Vec<u8>>) -> Self {
        self.password_pepper = pepper.filter(|p| !p.is_empty());
        self
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_signer(&self) -> TokenSigner {
        TokenSigner::new(&self.jwt_secret, self.token_ttl_secs)
    }
}
