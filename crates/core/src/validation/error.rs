//! Validation errors for proposed requests.

use rust_decimal::Decimal;
use thiserror::Error;

/// A business rule that a proposed deposit or withdrawal breaks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount is zero or negative.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Amount is above the single-request ceiling.
    #[error("Amount exceeds the maximum of {max}")]
    AmountExceedsMaximum {
        /// Configured ceiling.
        max: Decimal,
    },

    /// Cash courier deposit outside the accepted band.
    #[error("Cash courier deposits must be between {min} and {max}")]
    CashCourierOutOfRange {
        /// Smallest accepted amount.
        min: Decimal,
        /// Largest accepted amount.
        max: Decimal,
    },

    /// The account balance does not cover the amount.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Current balance.
        available: Decimal,
        /// Amount asked for.
        requested: Decimal,
    },

    /// Method string is not one of the accepted values.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Rejection reason is not one of the accepted categories.
    #[error("Unsupported rejection reason: {0}")]
    UnsupportedRejectionReason(String),

    /// A field the method requires is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A last-four field is not exactly four digits.
    #[error("{0} must be exactly 4 digits")]
    InvalidLast4(&'static str),

    /// Wallet email is malformed.
    #[error("A valid email address is required")]
    InvalidEmail,

    /// Wallet address is shorter than the minimum length.
    #[error("Crypto address must be at least {min_len} characters")]
    CryptoAddressTooShort {
        /// Configured minimum length.
        min_len: usize,
    },

    /// Crypto ticker is not accepted.
    #[error("Unsupported crypto currency: {0}")]
    UnsupportedCryptoCurrency(String),

    /// Debit card payout above the card cap.
    #[error("Debit card withdrawals are limited to {max}")]
    DebitCardLimitExceeded {
        /// Configured cap.
        max: Decimal,
    },
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountExceedsMaximum { .. } => "AMOUNT_EXCEEDS_MAXIMUM",
            Self::CashCourierOutOfRange { .. } => "CASH_COURIER_OUT_OF_RANGE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::UnsupportedRejectionReason(_) => "UNSUPPORTED_REJECTION_REASON",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidLast4(_) => "INVALID_LAST4",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::CryptoAddressTooShort { .. } => "CRYPTO_ADDRESS_TOO_SHORT",
            Self::UnsupportedCryptoCurrency(_) => "UNSUPPORTED_CRYPTO_CURRENCY",
            Self::DebitCardLimitExceeded { .. } => "DEBIT_CARD_LIMIT_EXCEEDED",
        }
    }
}
