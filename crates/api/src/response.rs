//! Converting lifecycle results into HTTP responses.
//!
//! Successes and failures share the `{success, message, error?}` shape;
//! the status code comes from the error taxonomy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use fundflow_core::{ErrorKind, OperationResult, RequestError, RequestResult};
use fundflow_shared::AppError;

/// Builds the response for a lifecycle operation.
pub fn respond<T: Serialize>(
    result: RequestResult<T>,
    status: StatusCode,
    success_message: &str,
    failure_message: &str,
) -> Response {
    match result {
        Ok(data) => (status, Json(OperationResult::ok(success_message, data))).into_response(),
        Err(err) => failure(failure_message, &err),
    }
}

/// Builds the failure response for `err`.
pub fn failure(message: &str, err: &RequestError) -> Response {
    if err.kind() == ErrorKind::Persistence {
        error!(error = %err, "{message}");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(OperationResult::<()>::failed(message, err))).into_response()
}

/// Rejection for requests that fail before reaching the lifecycle.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "success": false,
                "message": "Request rejected",
                "error": self.0.to_string(),
                "error_code": self.0.error_code(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self(err.into())
    }
}
