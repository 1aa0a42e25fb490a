//! Dashboard counters

use std::sync::Arc;

use auth::{UserRepository, UserRole, UserStatus};
use catalog::ProductRepository;

use crate::error::AdminResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    /// Providers whose status is `active`
    pub active_providers: u64,
    /// Products with a positive total stock
    pub products_in_stock: u64,
}

pub struct DashboardStatsUseCase<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    users: Arc<U>,
    products: Arc<P>,
}

impl<U, P> DashboardStatsUseCase<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<U>, products: Arc<P>) -> Self {
        Self { users, products }
    }

    pub async fn execute(&self) -> AdminResult<DashboardStats> {
        let total_users = self.users.count().await?;
        let active_providers = self
            .users
            .count_by_role_and_status(UserRole::Provider, UserStatus::Active)
            .await?;
        let products_in_stock = self.products.count_in_stock().await?;

        Ok(DashboardStats {
            total_users,
            active_providers,
            products_in_stock,
        })
    }
}
