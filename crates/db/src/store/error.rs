//! Store error types.

use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use fundflow_core::RequestError;
use fundflow_core::validation::ValidationError;

/// Errors returned by store adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The conditional update found the record in another status.
    #[error("Record is {current}")]
    Conflict {
        /// Status the record is actually in.
        current: String,
    },

    /// Reference number already taken.
    #[error("Reference number already exists")]
    DuplicateReference,

    /// The user already submitted a request with this idempotency key.
    #[error("Idempotency key already used")]
    DuplicateIdempotencyKey,

    /// Record or account does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The increment would take the balance below zero.
    #[error("Insufficient funds: balance {available}, debit {requested}")]
    InsufficientFunds {
        /// Balance at the time of the attempt.
        available: Decimal,
        /// Amount the debit asked for.
        requested: Decimal,
    },

    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if the failure may clear up on its own.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
            if message.contains("idempotency") {
                return Self::DuplicateIdempotencyKey;
            }
            if message.contains("reference") {
                return Self::DuplicateReference;
            }
        }
        match err {
            DbErr::Conn(e) => Self::Unavailable(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::Unavailable(e.to_string()),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<StoreError> for RequestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { current } => Self::Conflict(format!("Request is {current}")),
            StoreError::NotFound(what) => Self::NotFound(what.to_string()),
            StoreError::InsufficientFunds {
                available,
                requested,
            } => Self::Validation(ValidationError::InsufficientFunds {
                available,
                requested,
            }),
            StoreError::DuplicateReference | StoreError::DuplicateIdempotencyKey => {
                Self::Conflict(err.to_string())
            }
            StoreError::Unavailable(_) | StoreError::Backend(_) => {
                Self::Persistence(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundflow_core::ErrorKind;

    #[test]
    fn test_only_unavailable_is_transient() {
        assert!(StoreError::Unavailable("timeout".into()).is_transient());
        assert!(!StoreError::Backend("syntax".into()).is_transient());
        assert!(!StoreError::Conflict { current: "approved".into() }.is_transient());
    }

    #[test]
    fn test_conversion_to_request_error() {
        let err: RequestError = StoreError::Conflict {
            current: "approved".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::StateConflict);

        let err: RequestError = StoreError::NotFound("Withdrawal").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Withdrawal not found");

        let err: RequestError = StoreError::Unavailable("down".into()).into();
        assert!(err.is_retryable());
    }
}
