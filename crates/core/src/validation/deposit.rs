//! Deposit validation rules.

use fundflow_shared::LimitsConfig;

use super::{ValidationError, check_amount, is_last4, non_blank};
use crate::request::deposit::NewDeposit;
use crate::request::types::DepositMethod;

/// Validates a proposed deposit.
///
/// Rules, first failure wins:
/// 1. `0 < amount <= max_amount`
/// 2. `cash_courier` deposits fall within `[cash_courier_min, cash_courier_max]`
/// 3. A supplied `account_number_last4` is exactly four digits
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_deposit(deposit: &NewDeposit, limits: &LimitsConfig) -> Result<(), ValidationError> {
    check_amount(deposit.amount, limits)?;

    if deposit.method == DepositMethod::CashCourier
        && (deposit.amount < limits.cash_courier_min || deposit.amount > limits.cash_courier_max)
    {
        return Err(ValidationError::CashCourierOutOfRange {
            min: limits.cash_courier_min,
            max: limits.cash_courier_max,
        });
    }

    if let Some(last4) = non_blank(deposit.account_number_last4.as_ref())
        && !is_last4(last4)
    {
        return Err(ValidationError::InvalidLast4("account_number_last4"));
    }

    Ok(())
}
