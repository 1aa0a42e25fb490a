//! In-memory user repository
//!
//! Used when no database is configured and by the test suites. Email
//! uniqueness is enforced the same way the `users.email` unique index does.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;
use kernel::pagination::PageRequest;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_role::UserRole, user_status::UserStatus};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.read().await.values().any(|u| &u.email == email))
    }

    async fn find_many(&self, ids: &[UserId]) -> AuthResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn update(&self, user: &User) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.user_id) {
            return Ok(false);
        }
        if users
            .values()
            .any(|u| u.email == user.email && u.user_id != user.user_id)
        {
            return Err(AuthError::EmailTaken);
        }
        if let Some(stored) = users.get_mut(&user.user_id) {
            stored.name = user.name.clone();
            stored.email = user.email.clone();
            stored.status = user.status;
            stored.updated_at = user.updated_at;
        }
        Ok(true)
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        Ok(self.users.write().await.remove(user_id).is_some())
    }

    async fn list_page(&self, page: PageRequest) -> AuthResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let mut all: Vec<&User> = users.values().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn count(&self) -> AuthResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn count_by_role_and_status(
        &self,
        role: UserRole,
        status: UserStatus,
    ) -> AuthResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role && u.status == status)
            .count() as u64)
    }
}
