//! Application Layer
//!
//! Order placement, status changes, read paths and cart validation.

pub mod cart;
pub mod config;
pub mod create;
pub mod queries;
pub mod status;

// Re-exports
pub use cart::{CartQuote, Shortfall, ShortfallReason, ValidateCartUseCase};
pub use config::OrderConfig;
pub use create::{CreateOrderInput, CreateOrderUseCase, OrderItemInput};
pub use queries::{LineDetails, OrderDetails, OrderQueries, ProductSummary};
pub use status::SetOrderStatusUseCase;
