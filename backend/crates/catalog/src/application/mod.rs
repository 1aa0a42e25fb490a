//! Application Layer
//!
//! Product use cases and read paths.

pub mod create;
pub mod delete;
pub mod queries;
pub mod update;

// Re-exports
pub use create::{CreateProductInput, CreateProductUseCase};
pub use delete::DeleteProductUseCase;
pub use queries::{ProductQueries, ProductWithProvider, ProviderSummary};
pub use update::{UpdateProductInput, UpdateProductUseCase};
