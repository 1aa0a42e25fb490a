//! Shared Kernel - Domain-crossing minimal core
//!
//! The vocabulary every storefront crate agrees on:
//! - The error envelope and its classification
//! - Typed entity IDs (users, products, orders)
//! - Offset pagination shared by list endpoints

pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
pub mod pagination;
