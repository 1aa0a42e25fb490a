//! User Status Value Object
//!
//! - **Active**: can log in and use every feature of its role
//! - **Pending**: self-registered provider awaiting approval; login is still
//!   allowed
//! - **Inactive**: disabled by an administrator; login and every
//!   authenticated request are refused

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserStatus {
    #[default]
    Active = 0,
    Pending = 1,
    Inactive = 2,
}

impl UserStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }

    #[inline]
    pub const fn can_login(&self) -> bool {
        !matches!(self, Self::Inactive)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Active),
            1 => Some(Self::Pending),
            2 => Some(Self::Inactive),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(UserStatus::from_id(0), Some(UserStatus::Active));
        assert_eq!(UserStatus::from_id(1), Some(UserStatus::Pending));
        assert_eq!(UserStatus::from_id(2), Some(UserStatus::Inactive));
        assert_eq!(UserStatus::from_id(99), None);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(UserStatus::from_code("active"), Some(UserStatus::Active));
        assert_eq!(UserStatus::from_code("PENDING"), Some(UserStatus::Pending));
        assert_eq!(UserStatus::from_code("inactive"), Some(UserStatus::Inactive));
        assert_eq!(UserStatus::from_code("disabled"), None);
    }

    #[test]
    fn test_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(UserStatus::Pending.can_login());
        assert!(!UserStatus::Inactive.can_login());
    }
}
