//! Application Configuration

use chrono::Duration;

pub const DEFAULT_DELIVERY_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// Days between placing an order and its estimated delivery
    pub delivery_days: i64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            delivery_days: DEFAULT_DELIVERY_DAYS,
        }
    }
}

impl OrderConfig {
    pub fn delivery_offset(&self) -> Duration {
        Duration::days(self.delivery_days)
    }
}
