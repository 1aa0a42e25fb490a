//! Create Order Use Case

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use auth::Identity;
use catalog::ProductRepository;
use catalog::domain::category::canonical_size;
use kernel::id::ProductId;
use rust_decimal::Decimal;

use crate::application::config::OrderConfig;
use crate::domain::order::{Order, OrderLine};
use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};

#[derive(Debug, Clone, Default)]
pub struct OrderItemInput {
    pub product_id: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateOrderInput {
    pub items: Vec<OrderItemInput>,
    /// Client-side total; computed from catalog prices when absent
    pub total_amount: Option<Decimal>,
}

pub struct CreateOrderUseCase<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
    config: Arc<OrderConfig>,
}

impl<O, P> CreateOrderUseCase<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    pub fn new(orders: Arc<O>, products: Arc<P>, config: Arc<OrderConfig>) -> Self {
        Self {
            orders,
            products,
            config,
        }
    }

    /// Places a `pending` order for the requester. Stock is only checked
    /// and taken when the order is completed.
    pub async fn execute(&self, requester: &Identity, input: CreateOrderInput) -> OrderResult<Order> {
        if input.items.is_empty() {
            return Err(OrderError::Validation("The order has no products".into()));
        }

        let requested = input
            .items
            .into_iter()
            .map(parse_item)
            .collect::<OrderResult<Vec<_>>>()?;

        let mut ids: Vec<ProductId> = requested.iter().map(|(id, _, _)| *id).collect();
        ids.sort();
        ids.dedup();
        let catalog: HashMap<ProductId, _> = self
            .products
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|p| (p.product_id, p))
            .collect();

        let mut computed_total = Decimal::ZERO;
        let mut lines = Vec::with_capacity(requested.len());
        for (product_id, size, quantity) in requested {
            let product = catalog.get(&product_id).ok_or_else(|| {
                OrderError::Validation(format!("Product {product_id} does not exist"))
            })?;
            computed_total += product.price * Decimal::from(quantity);
            lines.push(OrderLine {
                product_id,
                provider_id: product.provider_id,
                size,
                quantity,
            });
        }

        let total = input.total_amount.unwrap_or(computed_total);
        let order = Order::new(
            requester.user_id,
            lines,
            total,
            self.config.delivery_offset(),
        )?;

        self.orders.create(&order).await?;

        tracing::info!(
            order_id = %order.order_id,
            user_id = %order.user_id,
            lines = order.lines.len(),
            total = %order.total_amount,
            "Order placed"
        );

        Ok(order)
    }
}

pub(crate) fn parse_item(item: OrderItemInput) -> OrderResult<(ProductId, String, u32)> {
    let raw_id = item.product_id.unwrap_or_default();
    let product_id = ProductId::from_str(raw_id.trim())
        .map_err(|_| OrderError::Validation(format!("Invalid product id: {raw_id}")))?;

    let size = item
        .size
        .map(|s| canonical_size(&s))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            OrderError::Validation(format!("Product {product_id} has no size selected"))
        })?;

    let quantity = item
        .quantity
        .and_then(|q| u32::try_from(q).ok())
        .filter(|&q| q > 0)
        .ok_or_else(|| {
            OrderError::Validation(format!("Product {product_id} needs a positive quantity"))
        })?;

    Ok((product_id, size, quantity))
}
