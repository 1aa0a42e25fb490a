//! Catalog Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::stock::StockError;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing or invalid product fields
    #[error("{0}")]
    Validation(String),

    /// Stock map does not fit the category, or cannot cover a demand
    #[error(transparent)]
    Stock(#[from] StockError),

    #[error("Product not found")]
    ProductNotFound,

    /// Requester neither owns the product nor is an administrator
    #[error("You do not have permission to modify this product")]
    NotOwner,

    /// Provider lookups go through the user store
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) | CatalogError::Stock(_) => ErrorKind::BadRequest,
            CatalogError::ProductNotFound => ErrorKind::NotFound,
            CatalogError::NotOwner => ErrorKind::Forbidden,
            CatalogError::Auth(e) => e.kind(),
            CatalogError::Database(_) | CatalogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CatalogError::Auth(e) => e.to_app_error(),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::NotOwner => {
                tracing::warn!("Product change refused for non-owner");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<rust_decimal::Error> for CatalogError {
    fn from(err: rust_decimal::Error) -> Self {
        CatalogError::Validation(format!("Invalid price: {err}"))
    }
}
