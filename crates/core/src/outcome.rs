//! Structured `{success, message, error?}` result for workflow operations.

use serde::Serialize;

use crate::error::{ErrorKind, RequestError};

/// Serializable outcome of a workflow operation.
///
/// Both success and failure travel in this shape so clients can surface
/// admin notes and rejection reasons without special-casing errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult<T> {
    /// True when the operation took effect.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Error message, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    /// Error bucket, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Payload, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> OperationResult<T> {
    /// Successful outcome carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            error_code: None,
            kind: None,
            data: Some(data),
        }
    }

    /// Failed outcome describing `err`.
    #[must_use]
    pub fn failed(message: impl Into<String>, err: &RequestError) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(err.to_string()),
            error_code: Some(err.error_code()),
            kind: Some(err.kind()),
            data: None,
        }
    }

    /// Converts a result, using `success_message` or `failure_message`.
    pub fn from_result(
        result: Result<T, RequestError>,
        success_message: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        match result {
            Ok(data) => Self::ok(success_message, data),
            Err(err) => Self::failed(failure_message, &err),
        }
    }
}
