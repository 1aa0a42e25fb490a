//! Domain Layer
//!
//! Orders, their status machine, the cart model and repository traits.

pub mod cart;
pub mod order;
pub mod repository;
pub mod status;

// Re-exports
pub use cart::{Cart, CartError, CartLine};
pub use order::{Order, OrderLine};
pub use repository::OrderRepository;
pub use status::OrderStatus;
