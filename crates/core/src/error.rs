//! Error taxonomy for request operations.
//!
//! Every failure a caller can observe falls into one of four buckets:
//! client-correctable validation, a state conflict, a missing (or foreign)
//! record, or a persistence failure.

use serde::Serialize;
use thiserror::Error;

use fundflow_shared::AppError;

use crate::validation::ValidationError;
use crate::workflow::WorkflowError;

/// Result type alias for request operations.
pub type RequestResult<T> = Result<T, RequestError>;

/// Coarse error classification surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input breaks a business rule; the client can fix it.
    Validation,
    /// The record is not in the state the operation requires.
    StateConflict,
    /// The record does not exist or does not belong to the caller.
    NotFound,
    /// The store failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::StateConflict => 409,
            Self::NotFound => 404,
            Self::Persistence => 500,
        }
    }
}

/// Errors returned by request lifecycle operations.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A validation rule failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A workflow transition was refused.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The record or account does not exist, or is not the caller's.
    #[error("{0} not found")]
    NotFound(String),

    /// Another writer changed the record first.
    #[error("{0}")]
    Conflict(String),

    /// The store failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl RequestError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Workflow(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::StateConflict,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Workflow(err) => err.error_code(),
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "STATE_CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns true if repeating the call may succeed.
    ///
    /// Only reads are ever retried on this basis.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::StateConflict => Self::Conflict(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Persistence => Self::Database(message),
        }
    }
}
