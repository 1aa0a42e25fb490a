//! Display name of an account.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub const USER_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AuthError> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(AuthError::Validation("Name is required".into()));
        }
        if name.chars().count() > USER_NAME_MAX_CHARS {
            return Err(AuthError::Validation(format!(
                "Name must be at most {} characters",
                USER_NAME_MAX_CHARS
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AuthError::Validation(
                "Name contains invalid characters".into(),
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_accepts() {
        assert_eq!(UserName::new("  Ana María ").unwrap().as_str(), "Ana María");
    }

    #[test]
    fn test_rejects_blank_and_oversized() {
        assert!(UserName::new("").is_err());
        assert!(UserName::new("\t ").is_err());
        assert!(UserName::new("x".repeat(USER_NAME_MAX_CHARS + 1)).is_err());
        assert!(UserName::new("bad\u{0}name").is_err());
    }
}
