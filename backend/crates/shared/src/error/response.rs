//! `IntoResponse` for [`AppError`]

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use super::app_error::AppError;

/// Renders `{ "message": ..., "error": ... }`; `error` is omitted when no
/// detail was attached.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut body = json!({ "message": self.message() });
        if let Some(detail) = self.detail() {
            body["error"] = Value::from(detail);
        }

        (status, Json(body)).into_response()
    }
}
