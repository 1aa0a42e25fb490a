//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{identity::Identity, user::User};
pub use repository::UserRepository;
pub use value_object::{email::Email, user_name::UserName, user_role::UserRole, user_status::UserStatus};
