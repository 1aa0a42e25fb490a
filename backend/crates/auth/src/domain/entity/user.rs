//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_role::UserRole, user_status::UserStatus,
};

/// Account of any role.
///
/// The password hash never leaves this crate's persistence layer; response
/// DTOs are built from the other fields.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New account. Self-registered providers start `Pending`, every other
    /// role starts `Active`.
    pub fn new(name: UserName, email: Email, password_hash: HashedPassword, role: UserRole) -> Self {
        let now = Utc::now();
        let status = match role {
            UserRole::Provider => UserStatus::Pending,
            UserRole::Client | UserRole::Administrator => UserStatus::Active,
        };

        Self {
            user_id: UserId::new(),
            name,
            email,
            password_hash,
            role,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }
}
