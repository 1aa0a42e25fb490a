//! Catalog Router

use std::sync::Arc;

use auth::middleware::{IdentityState, require_admin, require_identity, require_provider_or_admin};
use auth::{PgUserRepository, UserRepository};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use platform::token::TokenSigner;

use crate::domain::repository::ProductRepository;
use crate::infra::postgres::PgProductRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the Catalog router with PostgreSQL repositories
pub fn catalog_router(
    products: PgProductRepository,
    users: PgUserRepository,
    tokens: Arc<TokenSigner>,
) -> Router {
    catalog_router_generic(Arc::new(products), Arc::new(users), tokens)
}

/// Create a generic Catalog router for any repository implementation
///
/// Reads are public; writes need a provider or administrator token and
/// `/all` an administrator token.
pub fn catalog_router_generic<P, U>(
    products: Arc<P>,
    users: Arc<U>,
    tokens: Arc<TokenSigner>,
) -> Router
where
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let identity = IdentityState::new(users.clone(), tokens);
    let state = CatalogAppState { products, users };

    let providers = Router::new()
        .route("/", post(handlers::create_product::<P, U>))
        .route("/provider", get(handlers::list_own_products::<P, U>))
        .route(
            "/{id}",
            put(handlers::update_product::<P, U>).delete(handlers::delete_product::<P, U>),
        )
        .route_layer(middleware::from_fn(require_provider_or_admin))
        .route_layer(middleware::from_fn_with_state(
            identity.clone(),
            require_identity::<U>,
        ));

    let admins = Router::new()
        .route("/all", get(handlers::list_all_products::<P, U>))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            identity,
            require_identity::<U>,
        ));

    Router::new()
        .route("/", get(handlers::list_products::<P, U>))
        .route("/{id}", get(handlers::get_product::<P, U>))
        .merge(providers)
        .merge(admins)
        .with_state(state)
}
