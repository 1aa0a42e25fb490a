//! Admin Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    /// User store failures, including duplicate emails
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::Validation(_) => ErrorKind::BadRequest,
            AdminError::UserNotFound => ErrorKind::NotFound,
            AdminError::Auth(e) => e.kind(),
            AdminError::Catalog(e) => e.kind(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AdminError::Auth(e) => e.to_app_error(),
            AdminError::Catalog(e) => e.to_app_error(),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        let kind = self.kind();
        if kind.is_server_error() {
            tracing::error!(error = %self, "Admin request failed");
        } else if kind.is_security_relevant() {
            tracing::warn!(error = %self, "Admin request refused");
        } else {
            tracing::debug!(error = %self, "Admin error");
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
