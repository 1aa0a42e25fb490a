//! Admin Backend Module
//!
//! User administration and dashboard reporting for administrators.
//!
//! - `application/` - Paged user listing, user edits, provider approval,
//!   dashboard counters
//! - `presentation/` - HTTP handlers, DTOs and the admin-only router
//!
//! The crate owns no tables. Users come from the `auth` store and product
//! counts from the `catalog` store.

pub mod application;
pub mod error;
pub mod presentation;


pub use application::DashboardStats;
pub use error::{AdminError, AdminResult};
pub use presentation::{admin_router, admin_router_generic};
