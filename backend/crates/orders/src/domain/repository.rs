//! Repository Traits

use catalog::StockDemand;
use kernel::id::{OrderId, UserId};

use crate::domain::order::Order;
use crate::domain::status::OrderStatus;
use crate::error::OrderResult;

/// Order repository trait
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    async fn create(&self, order: &Order) -> OrderResult<()>;

    async fn find_by_id(&self, order_id: &OrderId) -> OrderResult<Option<Order>>;

    /// Orders placed by `user_id`, newest first.
    async fn list_by_user(&self, user_id: &UserId) -> OrderResult<Vec<Order>>;

    /// Orders with at least one line from `provider_id`, newest first.
    async fn list_by_provider(&self, provider_id: &UserId) -> OrderResult<Vec<Order>>;

    async fn list_all(&self) -> OrderResult<Vec<Order>>;

    /// Completed orders, restricted to one provider's lines when given.
    async fn count_completed(&self, provider_id: Option<&UserId>) -> OrderResult<u64>;

    /// Status change that touches no stock. Fails with
    /// `OrderError::AlreadyFinal` if the stored order is completed or
    /// cancelled.
    async fn update_status(&self, order_id: &OrderId, status: OrderStatus) -> OrderResult<()>;

    /// Marks the order completed and applies `demand` to product stock as
    /// one atomic unit. Either every decrement and the status change are
    /// stored, or none of them.
    async fn complete(&self, order_id: &OrderId, demand: &StockDemand) -> OrderResult<()>;
}
