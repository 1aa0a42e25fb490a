//! Orders Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Orders, the status machine, the cart model
//! - `application/` - Placing orders, status changes, listings, cart checks
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Completion
//! Moving an order to `completed` is irreversible. The quantities of all
//! lines are summed per product and size, checked against current stock,
//! and decremented together with the status write in one transaction
//! (row locks on the products, taken in id order). If any line cannot be
//! served, no stock changes.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::OrderConfig;
pub use domain::{Cart, Order, OrderRepository, OrderStatus};
pub use error::{OrderError, OrderResult};
pub use infra::{InMemoryOrderRepository, PgOrderRepository};
pub use presentation::{orders_router, orders_router_generic};
