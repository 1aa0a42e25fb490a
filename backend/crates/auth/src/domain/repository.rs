//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use kernel::id::UserId;
use kernel::pagination::PageRequest;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_role::UserRole, user_status::UserStatus};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. Fails with `AuthError::EmailTaken` on a duplicate
    /// email.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Users whose id is in `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[UserId]) -> AuthResult<Vec<User>>;

    /// Persist name, email and status. Fails with `AuthError::EmailTaken`
    /// when the new email belongs to another user; returns `false` when no
    /// row matched.
    async fn update(&self, user: &User) -> AuthResult<bool>;

    /// Returns `false` when no row matched.
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;

    /// One page ordered by creation time (newest first), plus the total
    /// number of users.
    async fn list_page(&self, page: PageRequest) -> AuthResult<(Vec<User>, u64)>;

    async fn count(&self) -> AuthResult<u64>;

    async fn count_by_role_and_status(&self, role: UserRole, status: UserStatus)
    -> AuthResult<u64>;
}
