//! User administration use cases

use std::str::FromStr;
use std::sync::Arc;

use auth::domain::{Email, UserName};
use auth::{Identity, User, UserRepository, UserStatus};
use kernel::id::UserId;
use kernel::pagination::{Page, PageRequest};

use crate::error::{AdminError, AdminResult};

/// Unparsable ids cannot name a user.
fn parse_user_id(raw: &str) -> AdminResult<UserId> {
    UserId::from_str(raw.trim()).map_err(|_| AdminError::UserNotFound)
}

async fn load<U>(users: &U, user_id: &UserId) -> AdminResult<User>
where
    U: UserRepository + Send + Sync + 'static,
{
    users
        .find_by_id(user_id)
        .await?
        .ok_or(AdminError::UserNotFound)
}

// ============================================================================
// List
// ============================================================================

pub struct ListUsersUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    users: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, request: PageRequest) -> AdminResult<Page<User>> {
        let (users, total) = self.users.list_page(request).await?;
        Ok(Page::new(users, total, request))
    }
}

// ============================================================================
// Update
// ============================================================================

/// Fields left `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

pub struct UpdateUserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    users: Arc<U>,
}

impl<U> UpdateUserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Every supplied field is validated before anything is written. A
    /// duplicate email surfaces as `AuthError::EmailTaken`.
    pub async fn execute(
        &self,
        actor: &Identity,
        user_id: &str,
        input: UpdateUserInput,
    ) -> AdminResult<User> {
        let name = input.name.map(UserName::new).transpose()?;
        let email = input.email.map(Email::new).transpose()?;
        let status = input
            .status
            .map(|raw| {
                UserStatus::from_code(&raw)
                    .ok_or_else(|| AdminError::Validation(format!("Invalid status: {raw}")))
            })
            .transpose()?;

        let user_id = parse_user_id(user_id)?;
        let mut user = load(self.users.as_ref(), &user_id).await?;

        if let Some(name) = name {
            user.set_name(name);
        }
        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(status) = status {
            user.set_status(status);
        }

        if !self.users.update(&user).await? {
            return Err(AdminError::UserNotFound);
        }

        tracing::info!(
            admin_id = %actor.user_id,
            user_id = %user.user_id,
            status = %user.status,
            "User updated"
        );

        Ok(user)
    }
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteUserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    users: Arc<U>,
}

impl<U> DeleteUserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, actor: &Identity, user_id: &str) -> AdminResult<()> {
        let user_id = parse_user_id(user_id)?;
        if !self.users.delete(&user_id).await? {
            return Err(AdminError::UserNotFound);
        }

        tracing::info!(admin_id = %actor.user_id, user_id = %user_id, "User deleted");
        Ok(())
    }
}

// ============================================================================
// Approve provider
// ============================================================================

pub struct ApproveProviderUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    users: Arc<U>,
}

impl<U> ApproveProviderUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Sets the account `active` whatever its previous status.
    pub async fn execute(&self, actor: &Identity, user_id: &str) -> AdminResult<User> {
        let user_id = parse_user_id(user_id)?;
        let mut user = load(self.users.as_ref(), &user_id).await?;

        user.set_status(UserStatus::Active);
        if !self.users.update(&user).await? {
            return Err(AdminError::UserNotFound);
        }

        tracing::info!(
            admin_id = %actor.user_id,
            user_id = %user.user_id,
            role = %user.role,
            "Provider approved"
        );

        Ok(user)
    }
}
