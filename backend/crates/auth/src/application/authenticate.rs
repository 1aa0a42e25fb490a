//! Authenticate Use Case
//!
//! Turns a bearer token into an [`Identity`], re-checking the account on
//! every request so that deleted or disabled users lose access before their
//! token expires.

use std::sync::Arc;

use kernel::id::UserId;
use platform::token::TokenSigner;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenSigner>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenSigner>) -> Self {
        Self { user_repo, tokens }
    }

    /// Verify the token only (signature, expiry, payload).
    pub fn verify(&self, token: &str) -> AuthResult<UserId> {
        let claims = self.tokens.verify(token)?;
        Ok(UserId::from_uuid(claims.id))
    }

    /// Token, then account: 401 for a bad token, 404 for a missing user,
    /// 403 for an inactive one.
    pub async fn execute(&self, token: &str) -> AuthResult<Identity> {
        let user_id = self.verify(token)?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        // The stored role wins over the one embedded in the token.
        Ok(Identity::new(user.user_id, user.role))
    }
}
