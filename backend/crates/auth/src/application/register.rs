//! Register Use Case
//!
//! Creates client, provider and administrator accounts.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_role::UserRole, user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Requested role code; `None` registers a client
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
    pub role: UserRole,
    pub status: UserStatus,
}

pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Public registration. Administrator accounts cannot be requested here.
    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::Client,
            Some(code) => UserRole::from_code(code)
                .ok_or_else(|| AuthError::Validation(format!("Unknown role: {code}")))?,
        };

        if role == UserRole::Administrator {
            return Err(AuthError::Validation(
                "Administrator accounts cannot be self-registered".into(),
            ));
        }

        self.create_account(input, role).await
    }

    /// Administrator creation; the route is gated to providers and
    /// administrators. Any `role` in the input is ignored.
    pub async fn execute_admin(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        self.create_account(input, UserRole::Administrator).await
    }

    async fn create_account(&self, input: RegisterInput, role: UserRole) -> AuthResult<RegisterOutput> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(input.name),
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::Validation("All fields are required".into()));
        };

        let name = UserName::new(name)?;
        let email = Email::new(email)?;
        let password = ClearTextPassword::new(password)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password.hash(self.config.pepper())?;
        let user = User::new(name, email, password_hash, role);

        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            status = %user.status,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
            role: user.role,
            status: user.status,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
