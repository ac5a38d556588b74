//! Pure rule checks for proposed requests.
//!
//! Validation runs before any record exists. Deposits are checked against
//! the configured limits alone; withdrawals also take the balance that the
//! caller read once from the store. The balance check is point-in-time:
//! approval re-verifies it atomically with the debit.
//!
//! # Modules
//!
//! - `error` - `ValidationError`
//! - `deposit` - Deposit rules
//! - `withdrawal` - Withdrawal rules, per payout channel

pub mod deposit;
pub mod error;
pub mod withdrawal;

#[cfg(test)]
mod validation_props;

use rust_decimal::Decimal;
use serde::Serialize;

use fundflow_shared::LimitsConfig;

use crate::request::types::{DepositMethod, RejectionReason, WithdrawalMethod};

pub use deposit::validate_deposit;
pub use error::ValidationError;
pub use withdrawal::validate_withdrawal;

/// Serializable `{valid, error?}` verdict for a proposed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// True when every rule passed.
    pub valid: bool,
    /// Message for the first failing rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable code for the first failing rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl From<Result<(), ValidationError>> for ValidationOutcome {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
                error_code: None,
            },
            Err(err) => Self {
                valid: false,
                error: Some(err.to_string()),
                error_code: Some(err.error_code()),
            },
        }
    }
}

/// Parses a deposit method arriving as free text.
///
/// # Errors
///
/// Returns `ValidationError::UnsupportedMethod` for unknown values.
pub fn parse_deposit_method(raw: &str) -> Result<DepositMethod, ValidationError> {
    DepositMethod::parse(raw).ok_or_else(|| ValidationError::UnsupportedMethod(raw.to_string()))
}

/// Parses a withdrawal method arriving as free text.
///
/// # Errors
///
/// Returns `ValidationError::UnsupportedMethod` for unknown values.
pub fn parse_withdrawal_method(raw: &str) -> Result<WithdrawalMethod, ValidationError> {
    WithdrawalMethod::parse(raw).ok_or_else(|| ValidationError::UnsupportedMethod(raw.to_string()))
}

/// Parses a withdrawal rejection reason arriving as free text.
///
/// # Errors
///
/// Returns `ValidationError::UnsupportedRejectionReason` for unknown values.
pub fn parse_rejection_reason(raw: &str) -> Result<RejectionReason, ValidationError> {
    RejectionReason::parse(raw)
        .ok_or_else(|| ValidationError::UnsupportedRejectionReason(raw.to_string()))
}

/// Rules shared by both directions: strictly positive and under the ceiling.
fn check_amount(amount: Decimal, limits: &LimitsConfig) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount > limits.max_amount {
        return Err(ValidationError::AmountExceedsMaximum {
            max: limits.max_amount,
        });
    }
    Ok(())
}

/// Returns true for exactly four ASCII digits.
fn is_last4(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns the trimmed value if present and non-blank.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_from_ok() {
        let outcome = ValidationOutcome::from(Ok(()));
        assert!(outcome.valid);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({ "valid": true })
        );
    }

    #[test]
    fn test_outcome_from_err() {
        let outcome = ValidationOutcome::from(Err(ValidationError::NonPositiveAmount));
        assert!(!outcome.valid);
        assert_eq!(outcome.error_code, Some("NON_POSITIVE_AMOUNT"));
        assert_eq!(outcome.error.as_deref(), Some("Amount must be greater than zero"));
    }

    #[test]
    fn test_parse_methods() {
        assert_eq!(parse_deposit_method("Wire"), Ok(DepositMethod::Wire));
        assert_eq!(
            parse_withdrawal_method("zelle"),
            Err(ValidationError::UnsupportedMethod("zelle".to_string()))
        );
        // ACH is a withdrawal-only rail.
        assert!(parse_deposit_method("ach").is_err());
    }

    #[test]
    fn test_parse_rejection_reason() {
        assert_eq!(
            parse_rejection_reason(" Suspicious_Activity "),
            Ok(RejectionReason::SuspiciousActivity)
        );
        assert_eq!(
            parse_rejection_reason("bogus"),
            Err(ValidationError::UnsupportedRejectionReason("bogus".to_string()))
        );
        assert!(parse_rejection_reason("").is_err());
    }

    #[test]
    fn test_check_amount_bounds() {
        let limits = LimitsConfig::default();
        assert!(check_amount(dec!(0.01), &limits).is_ok());
        assert!(check_amount(dec!(1000000), &limits).is_ok());
        assert_eq!(
            check_amount(dec!(0), &limits),
            Err(ValidationError::NonPositiveAmount)
        );
        assert!(matches!(
            check_amount(dec!(1000000.01), &limits),
            Err(ValidationError::AmountExceedsMaximum { .. })
        ));
    }

    #[test]
    fn test_is_last4() {
        assert!(is_last4("0042"));
        assert!(!is_last4("042"));
        assert!(!is_last4("12a4"));
    }
}
