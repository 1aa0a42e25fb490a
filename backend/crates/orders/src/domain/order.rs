//! Order Entity

use chrono::{DateTime, Duration, Utc};
use catalog::domain::product::MAX_AMOUNT;
use catalog::{StockDemand, StockError};
use kernel::id::{OrderId, ProductId, UserId};
use rust_decimal::Decimal;

use crate::domain::status::OrderStatus;
use crate::error::{OrderError, OrderResult};

/// One product/size/quantity of an order. The provider is copied from the
/// catalog when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub provider_id: UserId,
    pub size: String,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

impl Order {
    /// New `pending` order, delivered `delivery_offset` after creation.
    pub fn new(
        user_id: UserId,
        lines: Vec<OrderLine>,
        total_amount: Decimal,
        delivery_offset: Duration,
    ) -> OrderResult<Self> {
        if lines.is_empty() {
            return Err(OrderError::Validation("The order has no products".into()));
        }
        let total_amount = total_amount.round_dp(2);
        if total_amount < Decimal::ZERO {
            return Err(OrderError::Validation(
                "Total amount cannot be negative".into(),
            ));
        }
        if total_amount > MAX_AMOUNT {
            return Err(OrderError::Validation(format!(
                "Total amount must be at most {MAX_AMOUNT}"
            )));
        }

        let now = Utc::now();
        Ok(Self {
            order_id: OrderId::new(),
            user_id,
            lines,
            total_amount,
            status: OrderStatus::Pending,
            created_at: now,
            estimated_delivery: now + delivery_offset,
        })
    }

    pub fn involves_provider(&self, provider_id: &UserId) -> bool {
        self.lines.iter().any(|line| &line.provider_id == provider_id)
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.lines.iter().map(|l| l.product_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Quantity per (product, size) over every line.
    pub fn demand(&self) -> Result<StockDemand, StockError> {
        let mut demand = StockDemand::new();
        for line in &self.lines {
            demand.add(line.product_id, line.size.clone(), line.quantity)?;
        }
        Ok(demand)
    }

    /// Refuses to move out of `completed` or `cancelled`.
    pub fn ensure_open(&self) -> OrderResult<()> {
        if self.status.is_final() {
            return Err(OrderError::AlreadyFinal(self.status));
        }
        Ok(())
    }
}
