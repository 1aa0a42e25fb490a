//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, roles, statuses, repository traits
//! - `application/` - Register, login and token authentication use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, authorization middleware
//!
//! ## Features
//! - Registration for clients and providers (providers start `pending`)
//! - Administrator creation by providers or administrators
//! - Login issuing a one-hour HS256 bearer token `{ id, role, exp }`
//! - Bearer middleware plus role gates shared by every other router
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (optional pepper)
//! - The account is re-loaded on every authenticated request; inactive or
//!   deleted users are refused even with an unexpired token

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::{Identity, User, UserRepository, UserRole, UserStatus};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
