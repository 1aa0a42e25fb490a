//! HTTP Handlers

use std::sync::Arc;

use auth::Identity;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::ProductRepository;

use crate::application::{
    CreateOrderUseCase, OrderConfig, OrderQueries, SetOrderStatusUseCase, ValidateCartUseCase,
};
use crate::domain::repository::OrderRepository;
use crate::error::OrderResult;
use crate::presentation::dto::{
    CartQuoteResponse, CompletedOrdersResponse, CreateOrderRequest, OrderMessageResponse,
    OrderResponse, StatusRequest, ValidateCartRequest,
};

/// Shared state for order handlers
pub struct OrdersAppState<O, P>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    pub orders: Arc<O>,
    pub products: Arc<P>,
    pub config: Arc<OrderConfig>,
}

impl<O, P> Clone for OrdersAppState<O, P>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            products: self.products.clone(),
            config: self.config.clone(),
        }
    }
}

impl<O, P> OrdersAppState<O, P>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    fn queries(&self) -> OrderQueries<O, P> {
        OrderQueries::new(self.orders.clone(), self.products.clone())
    }
}

/// POST /orders/simulate-order
pub async fn create_order<O, P>(
    State(state): State<OrdersAppState<O, P>>,
    identity: Identity,
    Json(req): Json<CreateOrderRequest>,
) -> OrderResult<(StatusCode, Json<OrderMessageResponse>)>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let order = CreateOrderUseCase::new(
        state.orders.clone(),
        state.products.clone(),
        state.config.clone(),
    )
    .execute(&identity, req.try_into()?)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderMessageResponse {
            message: "Order placed successfully".to_string(),
            order: order.into(),
        }),
    ))
}

/// POST /orders/validate-cart
pub async fn validate_cart<O, P>(
    State(state): State<OrdersAppState<O, P>>,
    Json(req): Json<ValidateCartRequest>,
) -> OrderResult<Json<CartQuoteResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let quote = ValidateCartUseCase::new(state.products.clone())
        .execute(req.items.into_iter().map(Into::into).collect())
        .await?;

    Ok(Json(quote.into()))
}

/// GET /orders
pub async fn list_my_orders<O, P>(
    State(state): State<OrdersAppState<O, P>>,
    identity: Identity,
) -> OrderResult<Json<Vec<OrderResponse>>>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let orders = state.queries().list_mine(&identity).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /orders/related (provider or administrator)
pub async fn list_related_orders<O, P>(
    State(state): State<OrdersAppState<O, P>>,
    identity: Identity,
) -> OrderResult<Json<Vec<OrderResponse>>>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let orders = state.queries().list_related(&identity).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /orders/completed (provider or administrator)
pub async fn count_completed_orders<O, P>(
    State(state): State<OrdersAppState<O, P>>,
    identity: Identity,
) -> OrderResult<Json<CompletedOrdersResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let completed_orders = state.queries().count_completed(&identity).await?;
    Ok(Json(CompletedOrdersResponse { completed_orders }))
}

/// PUT /orders/{id} (provider or administrator)
pub async fn set_order_status<O, P>(
    State(state): State<OrdersAppState<O, P>>,
    identity: Identity,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> OrderResult<Json<OrderMessageResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let order = SetOrderStatusUseCase::new(state.orders.clone())
        .execute(&identity, &id, req.status.as_deref())
        .await?;

    Ok(Json(OrderMessageResponse {
        message: "Order status updated".to_string(),
        order: order.into(),
    }))
}
