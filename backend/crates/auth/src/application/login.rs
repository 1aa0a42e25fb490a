//! Login Use Case
//!
//! Checks credentials and issues a bearer token.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;
use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub user_id: UserId,
    pub role: UserRole,
    pub name: String,
}

pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenSigner>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>, tokens: Arc<TokenSigner>) -> Self {
        Self {
            user_repo,
            config,
            tokens,
        }
    }

    /// Check order: missing fields, unknown email, inactive account, wrong
    /// password.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let (Some(email), Some(password)) = (
            input.email.filter(|e| !e.trim().is_empty()),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::Validation("Email and password are required".into()));
        };

        // A malformed address cannot belong to any account.
        let email = Email::new(email).map_err(|_| AuthError::UserNotFound)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let password = ClearTextPassword::for_verification(password);
        if !user.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.user_id.into_uuid(), user.role.code())?;

        tracing::info!(user_id = %user.user_id, role = %user.role, "User logged in");

        Ok(LoginOutput {
            token,
            user_id: user.user_id,
            role: user.role,
            name: user.name.to_string(),
        })
    }
}
