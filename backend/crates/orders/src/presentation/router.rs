//! Orders Router

use std::sync::Arc;

use auth::middleware::{IdentityState, require_identity, require_provider_or_admin};
use auth::{PgUserRepository, UserRepository};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use catalog::{PgProductRepository, ProductRepository};
use platform::token::TokenSigner;

use crate::application::OrderConfig;
use crate::domain::repository::OrderRepository;
use crate::infra::postgres::PgOrderRepository;
use crate::presentation::handlers::{self, OrdersAppState};

/// Create the Orders router with PostgreSQL repositories
pub fn orders_router(
    orders: PgOrderRepository,
    products: PgProductRepository,
    users: PgUserRepository,
    tokens: Arc<TokenSigner>,
    config: OrderConfig,
) -> Router {
    orders_router_generic(
        Arc::new(orders),
        Arc::new(products),
        Arc::new(users),
        tokens,
        Arc::new(config),
    )
}

/// Create a generic Orders router for any repository implementation
///
/// Every route needs a token; `/related`, `/completed` and status changes
/// are limited to providers and administrators.
pub fn orders_router_generic<O, P, U>(
    orders: Arc<O>,
    products: Arc<P>,
    users: Arc<U>,
    tokens: Arc<TokenSigner>,
    config: Arc<OrderConfig>,
) -> Router
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let identity = IdentityState::new(users, tokens);
    let state = OrdersAppState {
        orders,
        products,
        config,
    };

    let fulfilment = Router::new()
        .route("/related", get(handlers::list_related_orders::<O, P>))
        .route("/completed", get(handlers::count_completed_orders::<O, P>))
        .route("/{id}", put(handlers::set_order_status::<O, P>))
        .route_layer(middleware::from_fn(require_provider_or_admin));

    Router::new()
        .route("/", get(handlers::list_my_orders::<O, P>))
        .route("/simulate-order", post(handlers::create_order::<O, P>))
        .route("/validate-cart", post(handlers::validate_cart::<O, P>))
        .merge(fulfilment)
        .route_layer(middleware::from_fn_with_state(
            identity,
            require_identity::<U>,
        ))
        .with_state(state)
}
