//! Authorization Middleware
//!
//! `require_identity` authenticates the bearer token and attaches an
//! [`Identity`] to the request; the role gates run after it and only read
//! that identity.
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/all", get(list_all))
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(identity, require_identity::<U>));
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer;
use platform::token::TokenSigner;
use std::sync::Arc;

use crate::application::AuthenticateUseCase;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Middleware state
pub struct IdentityState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub tokens: Arc<TokenSigner>,
}

impl<U> IdentityState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>, tokens: Arc<TokenSigner>) -> Self {
        Self { users, tokens }
    }
}

impl<U> Clone for IdentityState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// 403 without a bearer token, 401 for an invalid one, 404 when the user no
/// longer exists and 403 when it is inactive.
pub async fn require_identity<U>(
    State(state): State<IdentityState<U>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let token = extract_bearer(req.headers())
        .map(str::to_owned)
        .ok_or(AuthError::MissingToken)?;

    let identity = AuthenticateUseCase::new(state.users.clone(), state.tokens.clone())
        .execute(&token)
        .await?;

    tracing::debug!(user_id = %identity.user_id, role = %identity.role, "Request authenticated");

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn check_role(
    req: &Request,
    allowed: fn(UserRole) -> bool,
    audience: &'static str,
) -> Result<(), AuthError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(AuthError::MissingToken)?;

    if allowed(identity.role) {
        Ok(())
    } else {
        Err(AuthError::RoleDenied(audience))
    }
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    check_role(
        &req,
        |role| match role {
            UserRole::Administrator => true,
            UserRole::Client | UserRole::Provider => false,
        },
        "administrators",
    )?;
    Ok(next.run(req).await)
}

pub async fn require_provider_or_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    check_role(
        &req,
        |role| match role {
            UserRole::Provider | UserRole::Administrator => true,
            UserRole::Client => false,
        },
        "providers or administrators",
    )?;
    Ok(next.run(req).await)
}

pub async fn require_client(req: Request, next: Next) -> Result<Response, AuthError> {
    check_role(
        &req,
        |role| match role {
            UserRole::Client => true,
            UserRole::Provider | UserRole::Administrator => false,
        },
        "clients",
    )?;
    Ok(next.run(req).await)
}
