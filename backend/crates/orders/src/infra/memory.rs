//! In-memory order repository
//!
//! Shares the product store with the catalog so that completion can take
//! stock. Completion holds the order map lock and then the product map
//! lock, always in that order.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog::{InMemoryProductRepository, StockDemand, apply_demand};
use kernel::id::{OrderId, UserId};
use tokio::sync::RwLock;

use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<BTreeMap<OrderId, Order>>>,
    products: InMemoryProductRepository,
}

impl InMemoryOrderRepository {
    pub fn new(products: InMemoryProductRepository) -> Self {
        Self {
            orders: Arc::default(),
            products,
        }
    }

    async fn collect(&self, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| keep(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        orders
    }
}

impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> OrderResult<()> {
        self.orders
            .write()
            .await
            .insert(order.order_id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, order_id: &OrderId) -> OrderResult<Option<Order>> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> OrderResult<Vec<Order>> {
        Ok(self.collect(|o| &o.user_id == user_id).await)
    }

    async fn list_by_provider(&self, provider_id: &UserId) -> OrderResult<Vec<Order>> {
        Ok(self.collect(|o| o.involves_provider(provider_id)).await)
    }

    async fn list_all(&self) -> OrderResult<Vec<Order>> {
        Ok(self.collect(|_| true).await)
    }

    async fn count_completed(&self, provider_id: Option<&UserId>) -> OrderResult<u64> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.status == OrderStatus::Completed)
            .filter(|o| provider_id.is_none_or(|p| o.involves_provider(p)))
            .count() as u64)
    }

    async fn update_status(&self, order_id: &OrderId, status: OrderStatus) -> OrderResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(order_id).ok_or(OrderError::OrderNotFound)?;
        order.ensure_open()?;
        order.status = status;
        Ok(())
    }

    async fn complete(&self, order_id: &OrderId, demand: &StockDemand) -> OrderResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(order_id).ok_or(OrderError::OrderNotFound)?;
        order.ensure_open()?;

        let mut products = self.products.lock().await;
        apply_demand(&mut *products, demand)?;
        order.status = OrderStatus::Completed;
        Ok(())
    }
}
