//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    IdentityState, require_admin, require_client, require_identity, require_provider_or_admin,
};
pub use router::{auth_router, auth_router_generic};
