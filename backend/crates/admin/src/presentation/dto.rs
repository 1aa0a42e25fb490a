//! API DTOs (Data Transfer Objects)

use auth::{User, UserRole, UserStatus};
use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};

use crate::application::{DashboardStats, UpdateUserInput};

// ============================================================================
// Users
// ============================================================================

/// `?page=&limit=`; anything that is not a positive integer falls back to
/// the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl UserListQuery {
    pub fn page_request(&self) -> PageRequest {
        let parse = |raw: &Option<String>| raw.as_deref().and_then(|v| v.trim().parse::<i64>().ok());
        PageRequest::from_query(parse(&self.page), parse(&self.limit))
    }
}

/// A user without the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.as_str().to_string(),
            email: user.email.into_db(),
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        let page = page.map(UserResponse::from);
        Self {
            users: page.items,
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            status: req.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: UserResponse,
}

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub active_providers: u64,
    pub products_in_stock: u64,
}

impl From<DashboardStats> for StatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_users: stats.total_users,
            active_providers: stats.active_providers,
            products_in_stock: stats.products_in_stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageRequest {
        UserListQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
        .page_request()
    }

    #[test]
    fn test_page_query_fallbacks() {
        assert_eq!(query(Some("2"), Some("10")), PageRequest { page: 2, limit: 10 });
        assert_eq!(query(None, None), PageRequest::default());
        assert_eq!(query(Some("abc"), Some("-4")), PageRequest::default());
        assert_eq!(query(Some(" 3 "), Some("0")), PageRequest { page: 3, limit: 10 });
    }

    #[test]
    fn test_stats_keys() {
        let json = serde_json::to_value(StatsResponse::from(DashboardStats {
            total_users: 4,
            active_providers: 1,
            products_in_stock: 2,
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"totalUsers": 4, "activeProviders": 1, "productsInStock": 2})
        );
    }
}
