//! Workflow error types for request lifecycle management.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Attempted a transition the current status does not allow.
    #[error("Request is {from} and cannot be moved to {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The attempted target status.
        to: String,
    },

    /// Modified amount is larger than the amount originally requested.
    #[error("Modified amount {modified} exceeds the original amount {original}")]
    ModifiedAmountExceedsOriginal {
        /// The proposed amount.
        modified: Decimal,
        /// The amount requested at submission.
        original: Decimal,
    },

    /// Modified amount is zero or negative.
    #[error("Modified amount must be greater than zero")]
    NonPositiveModifiedAmount,

    /// Modifying the amount without explaining why.
    #[error("Notes are required when modifying the withdrawal amount")]
    ModificationNotesRequired,

    /// Rejecting without notes.
    #[error("Rejection notes are required")]
    RejectionNotesRequired,

    /// Caller does not own the request.
    #[error("Request does not belong to the caller")]
    NotOwner,
}

impl WorkflowError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. } => ErrorKind::StateConflict,
            Self::NotOwner => ErrorKind::NotFound,
            Self::ModifiedAmountExceedsOriginal { .. }
            | Self::NonPositiveModifiedAmount
            | Self::ModificationNotesRequired
            | Self::RejectionNotesRequired => ErrorKind::Validation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ModifiedAmountExceedsOriginal { .. } => "MODIFIED_AMOUNT_EXCEEDS_ORIGINAL",
            Self::NonPositiveModifiedAmount => "NON_POSITIVE_MODIFIED_AMOUNT",
            Self::ModificationNotesRequired => "MODIFICATION_NOTES_REQUIRED",
            Self::RejectionNotesRequired => "REJECTION_NOTES_REQUIRED",
            Self::NotOwner => "NOT_OWNER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: "approved".to_string(),
            to: "approved".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(
            err.to_string(),
            "Request is approved and cannot be moved to approved"
        );
    }

    #[test]
    fn test_modified_amount_error() {
        let err = WorkflowError::ModifiedAmountExceedsOriginal {
            modified: dec!(1500),
            original: dec!(1000),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("1500"));
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn test_not_owner_is_reported_as_not_found() {
        assert_eq!(WorkflowError::NotOwner.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_notes_required_errors() {
        assert_eq!(
            WorkflowError::RejectionNotesRequired.error_code(),
            "REJECTION_NOTES_REQUIRED"
        );
        assert_eq!(
            WorkflowError::ModificationNotesRequired.kind(),
            ErrorKind::Validation
        );
    }
}
