//! `AppError` -> HTTP response mapping. `shared::AppError` has no axum
//! dependency of its own, so the conversion lives here at the edge of the
//! persistence core (`spec.md` §1, "HTTP routing … out of scope" — only the
//! boundary at which errors cross into a response belongs to this crate).

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use shared::AppError;

pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.should_log_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type HandlerResult<T> = Result<T, ApiError>;
