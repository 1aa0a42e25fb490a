//! Order Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::{CatalogError, StockError};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::status::OrderStatus;

pub type OrderResult<T> = Result<T, OrderError>;

#[derive(Debug, Error)]
pub enum OrderError {
    /// Missing or invalid order input
    #[error("{0}")]
    Validation(String),

    /// Completion would oversell or references stock that is gone
    #[error(transparent)]
    Stock(#[from] StockError),

    #[error("Order not found")]
    OrderNotFound,

    /// Completed and cancelled orders never change again
    #[error("Order is already {0}")]
    AlreadyFinal(OrderStatus),

    /// Role not allowed to manage orders
    #[error("Access denied. Only {0} may use this resource")]
    RoleDenied(&'static str),

    /// Provider with no line in the order
    #[error("Access denied. You are not linked to this order")]
    NotRelated,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::Validation(_) | OrderError::Stock(_) | OrderError::AlreadyFinal(_) => {
                ErrorKind::BadRequest
            }
            OrderError::OrderNotFound => ErrorKind::NotFound,
            OrderError::RoleDenied(_) | OrderError::NotRelated => ErrorKind::Forbidden,
            OrderError::Catalog(e) => e.kind(),
            OrderError::Auth(e) => e.kind(),
            OrderError::Database(_) | OrderError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            OrderError::Catalog(e) => e.to_app_error(),
            OrderError::Auth(e) => e.to_app_error(),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            OrderError::Database(e) => {
                tracing::error!(error = %e, "Order database error");
            }
            OrderError::Internal(msg) => {
                tracing::error!(message = %msg, "Order internal error");
            }
            OrderError::RoleDenied(required) => {
                tracing::warn!(required, "Order role check failed");
            }
            OrderError::NotRelated => {
                tracing::warn!("Order change refused for unrelated provider");
            }
            OrderError::Stock(e) => {
                tracing::info!(reason = %e, "Order completion rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Order error");
            }
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
