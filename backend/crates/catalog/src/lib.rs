//! Catalog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Products, the category size table, stock-by-size
//! - `application/` - Create, update, delete and read use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Stock
//! Each product keeps a count per size; valid sizes come from its category.
//! Total stock is derived from the per-size counts. Stock only goes down
//! when an order is completed, through [`domain::apply_demand`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use domain::{
    Category, Product, ProductRepository, StockBySize, StockDemand, StockError, apply_demand,
};
pub use error::{CatalogError, CatalogResult};
pub use infra::{InMemoryProductRepository, PgProductRepository};
pub use presentation::{catalog_router, catalog_router_generic};
