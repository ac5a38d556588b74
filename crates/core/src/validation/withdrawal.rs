//! Withdrawal validation rules.

use rust_decimal::Decimal;
use validator::ValidateEmail;

use fundflow_shared::LimitsConfig;

use super::{ValidationError, check_amount, is_last4, non_blank};
use crate::request::types::{CryptoCurrency, PayoutChannel, WithdrawalMethod};
use crate::request::withdrawal::{NewWithdrawal, PayoutDetails};

/// Validates a proposed withdrawal against the balance read for its account.
///
/// Rules, first failure wins:
/// 1. `0 < amount <= max_amount`
/// 2. `balance >= amount`
/// 3. The payout fields the method's channel requires
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_withdrawal(
    withdrawal: &NewWithdrawal,
    balance: Decimal,
    limits: &LimitsConfig,
) -> Result<(), ValidationError> {
    check_amount(withdrawal.amount, limits)?;

    if balance < withdrawal.amount {
        return Err(ValidationError::InsufficientFunds {
            available: balance,
            requested: withdrawal.amount,
        });
    }

    validate_payout(withdrawal.method, withdrawal.amount, &withdrawal.details, limits)
}

/// Checks the payout destination for a method.
///
/// # Errors
///
/// Returns the first missing or malformed field.
pub fn validate_payout(
    method: WithdrawalMethod,
    amount: Decimal,
    details: &PayoutDetails,
    limits: &LimitsConfig,
) -> Result<(), ValidationError> {
    match method.channel() {
        PayoutChannel::Banking => {
            non_blank(details.bank_name.as_ref()).ok_or(ValidationError::MissingField("bank_name"))?;
            let last4 = non_blank(details.account_number_last4.as_ref())
                .ok_or(ValidationError::MissingField("account_number_last4"))?;
            if !is_last4(last4) {
                return Err(ValidationError::InvalidLast4("account_number_last4"));
            }
        }
        PayoutChannel::Wallet => {
            let email = non_blank(details.email.as_ref()).ok_or(ValidationError::MissingField("email"))?;
            if !is_wallet_email(email) {
                return Err(ValidationError::InvalidEmail);
            }
        }
        PayoutChannel::Crypto => {
            let address = non_blank(details.crypto_address.as_ref())
                .ok_or(ValidationError::MissingField("crypto_address"))?;
            if address.chars().count() < limits.crypto_address_min_len {
                return Err(ValidationError::CryptoAddressTooShort {
                    min_len: limits.crypto_address_min_len,
                });
            }
            let ticker = non_blank(details.crypto_currency.as_ref())
                .ok_or(ValidationError::MissingField("crypto_currency"))?;
            if CryptoCurrency::parse(ticker).is_none() {
                return Err(ValidationError::UnsupportedCryptoCurrency(ticker.to_string()));
            }
        }
        PayoutChannel::Card => {
            let last4 = non_blank(details.card_last4.as_ref())
                .ok_or(ValidationError::MissingField("card_last4"))?;
            if !is_last4(last4) {
                return Err(ValidationError::InvalidLast4("card_last4"));
            }
            if amount > limits.debit_card_max {
                return Err(ValidationError::DebitCardLimitExceeded {
                    max: limits.debit_card_max,
                });
            }
        }
    }
    Ok(())
}

/// `local@domain.tld`: a valid address whose domain has a dot.
fn is_wallet_email(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'))
}
