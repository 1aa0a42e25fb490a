//! Order Status Use Case
//!
//! Moving an order to `completed` takes the stock for every line; any other
//! accepted target only rewrites the status.

use std::str::FromStr;
use std::sync::Arc;

use auth::{Identity, UserRole};
use kernel::id::OrderId;

use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

pub struct SetOrderStatusUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> SetOrderStatusUseCase<O>
where
    O: OrderRepository,
{
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    /// Checks, in order: role, target status, existence, provider link,
    /// order still open. Completion then validates every line before any
    /// stock moves.
    pub async fn execute(
        &self,
        requester: &Identity,
        order_id: &str,
        status: Option<&str>,
    ) -> OrderResult<Order> {
        match requester.role {
            UserRole::Provider | UserRole::Administrator => {}
            UserRole::Client => return Err(OrderError::RoleDenied("providers or administrators")),
        }

        let target = status
            .and_then(OrderStatus::from_code)
            .filter(OrderStatus::is_settable)
            .ok_or_else(|| OrderError::Validation("Invalid status".into()))?;

        let order_id = OrderId::from_str(order_id.trim()).map_err(|_| OrderError::OrderNotFound)?;
        let mut order = self
            .orders
            .find_by_id(&order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        if !requester.is_admin() && !order.involves_provider(&requester.user_id) {
            tracing::warn!(
                order_id = %order_id,
                provider_id = %requester.user_id,
                "Status change refused for unrelated provider"
            );
            return Err(OrderError::NotRelated);
        }

        order.ensure_open()?;

        match target {
            OrderStatus::Completed => {
                let demand = order.demand()?;
                self.orders.complete(&order_id, &demand).await?;
            }
            OrderStatus::Pending | OrderStatus::InProgress | OrderStatus::Cancelled => {
                self.orders.update_status(&order_id, target).await?;
            }
        }

        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %target,
            changed_by = %requester.user_id,
            "Order status changed"
        );

        order.status = target;
        Ok(order)
    }
}
