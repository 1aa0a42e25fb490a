//! Order read paths.

use std::collections::HashMap;
use std::sync::Arc;

use auth::{Identity, UserRole};
use catalog::ProductRepository;
use kernel::id::ProductId;
use rust_decimal::Decimal;

use crate::domain::order::{Order, OrderLine};
use crate::domain::repository::OrderRepository;
use crate::error::{OrderError, OrderResult};

/// Catalog fields shown next to an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct LineDetails {
    pub line: OrderLine,
    /// `None` once the product has been removed from the catalog
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub lines: Vec<LineDetails>,
}

pub struct OrderQueries<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
}

impl<O, P> OrderQueries<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    pub fn new(orders: Arc<O>, products: Arc<P>) -> Self {
        Self { orders, products }
    }

    /// The requester's own orders.
    pub async fn list_mine(&self, requester: &Identity) -> OrderResult<Vec<OrderDetails>> {
        let orders = self.orders.list_by_user(&requester.user_id).await?;
        self.with_products(orders).await
    }

    /// Providers see orders containing one of their products;
    /// administrators see every order.
    pub async fn list_related(&self, requester: &Identity) -> OrderResult<Vec<OrderDetails>> {
        let orders = match requester.role {
            UserRole::Administrator => self.orders.list_all().await?,
            UserRole::Provider => self.orders.list_by_provider(&requester.user_id).await?,
            UserRole::Client => return Err(OrderError::RoleDenied("providers or administrators")),
        };
        self.with_products(orders).await
    }

    /// Completed orders under the same visibility rule as
    /// [`Self::list_related`].
    pub async fn count_completed(&self, requester: &Identity) -> OrderResult<u64> {
        match requester.role {
            UserRole::Administrator => self.orders.count_completed(None).await,
            UserRole::Provider => {
                self.orders
                    .count_completed(Some(&requester.user_id))
                    .await
            }
            UserRole::Client => Err(OrderError::RoleDenied("providers or administrators")),
        }
    }

    async fn with_products(&self, orders: Vec<Order>) -> OrderResult<Vec<OrderDetails>> {
        let mut ids: Vec<ProductId> = orders.iter().flat_map(Order::product_ids).collect();
        ids.sort();
        ids.dedup();

        let summaries: HashMap<ProductId, ProductSummary> = self
            .products
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|p| {
                (
                    p.product_id,
                    ProductSummary {
                        name: p.name,
                        image_url: p.image_url,
                        price: p.price,
                    },
                )
            })
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = order
                    .lines
                    .iter()
                    .map(|line| LineDetails {
                        line: line.clone(),
                        product: summaries.get(&line.product_id).cloned(),
                    })
                    .collect();
                OrderDetails { order, lines }
            })
            .collect())
    }
}
