//! Domain Layer
//!
//! Products, the category size table, stock-by-size and repository traits.

pub mod category;
pub mod inventory;
pub mod product;
pub mod repository;
pub mod stock;

// Re-exports
pub use category::Category;
pub use inventory::apply_demand;
pub use product::{Product, ProductDetails, ProductPatch};
pub use repository::ProductRepository;
pub use stock::{StockBySize, StockDemand, StockError};
