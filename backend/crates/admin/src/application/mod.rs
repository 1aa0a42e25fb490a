//! Application Layer
//!
//! Administrator use cases.

pub mod stats;
pub mod users;

pub use stats::{DashboardStats, DashboardStatsUseCase};
pub use users::{
    ApproveProviderUseCase, DeleteUserUseCase, ListUsersUseCase, UpdateUserInput,
    UpdateUserUseCase,
};
