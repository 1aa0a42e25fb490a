use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of account roles.
///
/// Serialized as `client`, `provider` and `administrator`; stored as a
/// small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Client = 0,
    Provider = 1,
    Administrator = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Client => "client",
            Provider => "provider",
            Administrator => "administrator",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Administrator)
    }

    /// Providers and administrators may manage the catalog and fulfil
    /// orders.
    #[inline]
    pub const fn is_provider_or_admin(&self) -> bool {
        matches!(self, UserRole::Provider | UserRole::Administrator)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(Client),
            1 => Some(Provider),
            2 => Some(Administrator),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code.trim().to_ascii_lowercase().as_str() {
            "client" => Some(Client),
            "provider" => Some(Provider),
            "administrator" => Some(Administrator),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Some(UserRole::Client));
        assert_eq!(UserRole::from_id(1), Some(UserRole::Provider));
        assert_eq!(UserRole::from_id(2), Some(UserRole::Administrator));
        assert_eq!(UserRole::from_id(7), None);
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("client"), Some(UserRole::Client));
        assert_eq!(UserRole::from_code("Provider"), Some(UserRole::Provider));
        assert_eq!(
            UserRole::from_code("administrator"),
            Some(UserRole::Administrator)
        );
        assert_eq!(UserRole::from_code("admin"), None);
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::Administrator).unwrap(),
            "\"administrator\""
        );
        let role: UserRole = serde_json::from_str("\"provider\"").unwrap();
        assert_eq!(role, UserRole::Provider);
    }

    #[test]
    fn test_user_role_checks() {
        assert!(!UserRole::Client.is_provider_or_admin());
        assert!(UserRole::Provider.is_provider_or_admin());
        assert!(UserRole::Administrator.is_provider_or_admin());
        assert!(!UserRole::Provider.is_admin());
        assert!(UserRole::Administrator.is_admin());
    }
}
