//! API DTOs (Data Transfer Objects)
//!
//! Order lines are sent as `products` (alias `items`), each
//! `{productId, size, quantity}`. Quantities and totals accept numbers or
//! numeric strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{
    CartQuote, CreateOrderInput, LineDetails, OrderDetails, OrderItemInput, ProductSummary,
    Shortfall, ShortfallReason,
};
use crate::domain::cart::CartLine;
use crate::domain::order::Order;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemRequest {
    pub product_id: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<Value>,
}

impl From<OrderItemRequest> for OrderItemInput {
    fn from(req: OrderItemRequest) -> Self {
        Self {
            product_id: req.product_id,
            size: req.size,
            quantity: req.quantity.as_ref().and_then(integer_of),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    #[serde(alias = "items")]
    pub products: Vec<OrderItemRequest>,
    pub total_amount: Option<Value>,
}

impl TryFrom<CreateOrderRequest> for CreateOrderInput {
    type Error = OrderError;

    fn try_from(req: CreateOrderRequest) -> OrderResult<Self> {
        let total_amount = match req.total_amount {
            None | Some(Value::Null) => None,
            Some(value) => Some(decimal_of(&value).ok_or_else(|| {
                OrderError::Validation("Total amount must be a number".into())
            })?),
        };

        Ok(Self {
            items: req.products.into_iter().map(Into::into).collect(),
            total_amount,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateCartRequest {
    #[serde(alias = "products")]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: Option<String>,
}

fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub name: String,
    pub image: String,
    pub price: Decimal,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(p: ProductSummary) -> Self {
        Self {
            name: p.name,
            image: p.image_url,
            price: p.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product_id: ProductId,
    pub provider_id: UserId,
    pub size: String,
    pub quantity: u32,
    /// Omitted when the product no longer exists or was not looked up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummaryResponse>,
}

impl From<LineDetails> for OrderLineResponse {
    fn from(details: LineDetails) -> Self {
        Self {
            product_id: details.line.product_id,
            provider_id: details.line.provider_id,
            size: details.line.size,
            quantity: details.line.quantity,
            product: details.product.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: UserId,
    pub products: Vec<OrderLineResponse>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

impl OrderResponse {
    fn build(order: Order, products: Vec<OrderLineResponse>) -> Self {
        Self {
            id: order.order_id,
            user_id: order.user_id,
            products,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
            estimated_delivery: order.estimated_delivery,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(mut order: Order) -> Self {
        let lines = std::mem::take(&mut order.lines)
            .into_iter()
            .map(|line| LineDetails { line, product: None }.into())
            .collect();
        Self::build(order, lines)
    }
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let lines = details.lines.into_iter().map(Into::into).collect();
        Self::build(details.order, lines)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderMessageResponse {
    pub message: String,
    pub order: OrderResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrdersResponse {
    pub completed_orders: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub product_id: ProductId,
    pub provider_id: UserId,
    pub name: String,
    pub size: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub available: u32,
}

impl From<&CartLine> for CartLineResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            provider_id: line.provider_id,
            name: line.name.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal(),
            available: line.available,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortfallResponse {
    pub product_id: ProductId,
    pub size: String,
    pub requested: u32,
    pub available: u32,
    pub reason: &'static str,
}

impl From<Shortfall> for ShortfallResponse {
    fn from(s: Shortfall) -> Self {
        let reason = match s.reason {
            ShortfallReason::ProductMissing => "product-missing",
            ShortfallReason::SizeNotStocked => "size-not-stocked",
            ShortfallReason::InsufficientStock => "insufficient-stock",
        };
        Self {
            product_id: s.product_id,
            size: s.size,
            requested: s.requested,
            available: s.available,
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuoteResponse {
    pub valid: bool,
    pub total: Decimal,
    pub lines: Vec<CartLineResponse>,
    pub shortfalls: Vec<ShortfallResponse>,
}

impl From<CartQuote> for CartQuoteResponse {
    fn from(quote: CartQuote) -> Self {
        Self {
            valid: quote.is_valid(),
            total: quote.total(),
            lines: quote.cart.lines().iter().map(Into::into).collect(),
            shortfalls: quote.shortfalls.into_iter().map(Into::into).collect(),
        }
    }
}
