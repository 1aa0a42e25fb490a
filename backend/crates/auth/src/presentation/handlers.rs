//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use platform::token::TokenSigner;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

/// Shared state for auth handlers
pub struct AuthAppState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenSigner>,
}

impl<U> Clone for AuthAppState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

/// POST /auth/register
pub async fn register<U>(
    State(state): State<AuthAppState<U>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.users.clone(), state.config.clone());
    use_case.execute(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /auth/register-admin (provider or administrator)
pub async fn register_admin<U>(
    State(state): State<AuthAppState<U>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.users.clone(), state.config.clone());
    use_case.execute_admin(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Administrator created successfully")),
    ))
}

/// POST /auth/login
pub async fn login<U>(
    State(state): State<AuthAppState<U>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: output.token,
    }))
}
