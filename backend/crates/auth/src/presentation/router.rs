//! Auth Router

use axum::{Router, middleware, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{IdentityState, require_identity, require_provider_or_admin};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), Arc::new(config))
}

/// Create a generic Auth router for any repository implementation
///
/// The repository and config are shared so the same user store can back the
/// identity middleware of the other routers.
pub fn auth_router_generic<U>(users: Arc<U>, config: Arc<AuthConfig>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    let tokens = Arc::new(config.token_signer());
    let identity = IdentityState::new(users.clone(), tokens.clone());
    let state = AuthAppState {
        users,
        config,
        tokens,
    };

    let admin_only = Router::new()
        .route("/register-admin", post(handlers::register_admin::<U>))
        .route_layer(middleware::from_fn(require_provider_or_admin))
        .route_layer(middleware::from_fn_with_state(
            identity,
            require_identity::<U>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<U>))
        .route("/login", post(handlers::login::<U>))
        .merge(admin_only)
        .with_state(state)
}
