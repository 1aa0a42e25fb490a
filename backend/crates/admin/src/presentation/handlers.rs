//! HTTP Handlers

use std::sync::Arc;

use auth::presentation::dto::MessageResponse;
use auth::{Identity, UserRepository};
use axum::Json;
use axum::extract::{Path, Query, State};
use catalog::ProductRepository;

use crate::application::{
    ApproveProviderUseCase, DashboardStatsUseCase, DeleteUserUseCase, ListUsersUseCase,
    UpdateUserUseCase,
};
use crate::error::AdminResult;
use crate::presentation::dto::{
    StatsResponse, UpdateUserRequest, UserListQuery, UserListResponse, UserMessageResponse,
};

/// Shared state for admin handlers
pub struct AdminAppState<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub products: Arc<P>,
}

impl<U, P> Clone for AdminAppState<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            products: self.products.clone(),
        }
    }
}

/// GET /admin/users?page=&limit=
pub async fn list_users<U, P>(
    State(state): State<AdminAppState<U, P>>,
    Query(query): Query<UserListQuery>,
) -> AdminResult<Json<UserListResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let page = ListUsersUseCase::new(state.users.clone())
        .execute(query.page_request())
        .await?;
    Ok(Json(page.into()))
}

/// PUT /admin/users/{id}
pub async fn update_user<U, P>(
    State(state): State<AdminAppState<U, P>>,
    identity: Identity,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AdminResult<Json<UserMessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let user = UpdateUserUseCase::new(state.users.clone())
        .execute(&identity, &id, req.into())
        .await?;

    Ok(Json(UserMessageResponse {
        message: "User updated".to_string(),
        user: user.into(),
    }))
}

/// DELETE /admin/users/{id}
pub async fn delete_user<U, P>(
    State(state): State<AdminAppState<U, P>>,
    identity: Identity,
    Path(id): Path<String>,
) -> AdminResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    DeleteUserUseCase::new(state.users.clone())
        .execute(&identity, &id)
        .await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// PUT /admin/approve-provider/{id}
pub async fn approve_provider<U, P>(
    State(state): State<AdminAppState<U, P>>,
    identity: Identity,
    Path(id): Path<String>,
) -> AdminResult<Json<UserMessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let user = ApproveProviderUseCase::new(state.users.clone())
        .execute(&identity, &id)
        .await?;

    Ok(Json(UserMessageResponse {
        message: "Provider approved".to_string(),
        user: user.into(),
    }))
}

/// GET /admin/stats
pub async fn dashboard_stats<U, P>(
    State(state): State<AdminAppState<U, P>>,
) -> AdminResult<Json<StatsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let stats = DashboardStatsUseCase::new(state.users.clone(), state.products.clone())
        .execute()
        .await?;
    Ok(Json(stats.into()))
}
