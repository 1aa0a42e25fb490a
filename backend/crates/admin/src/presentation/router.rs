//! Admin Router

use std::sync::Arc;

use auth::middleware::{IdentityState, require_admin, require_identity};
use auth::{PgUserRepository, UserRepository};
use axum::routing::{get, put};
use axum::{Router, middleware};
use catalog::{PgProductRepository, ProductRepository};
use platform::token::TokenSigner;

use crate::presentation::handlers::{self, AdminAppState};

/// Create the Admin router with PostgreSQL repositories
pub fn admin_router(
    users: PgUserRepository,
    products: PgProductRepository,
    tokens: Arc<TokenSigner>,
) -> Router {
    admin_router_generic(Arc::new(users), Arc::new(products), tokens)
}

/// Create a generic Admin router for any repository implementation
///
/// Every route needs an administrator token.
pub fn admin_router_generic<U, P>(users: Arc<U>, products: Arc<P>, tokens: Arc<TokenSigner>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let identity = IdentityState::new(users.clone(), tokens);
    let state = AdminAppState { users, products };

    Router::new()
        .route("/users", get(handlers::list_users::<U, P>))
        .route(
            "/users/{id}",
            put(handlers::update_user::<U, P>).delete(handlers::delete_user::<U, P>),
        )
        .route("/approve-provider/{id}", put(handlers::approve_provider::<U, P>))
        .route("/stats", get(handlers::dashboard_stats::<U, P>))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(identity, require_identity::<U>))
        .with_state(state)
}
