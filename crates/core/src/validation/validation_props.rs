//! Property-based tests for deposit and withdrawal validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use fundflow_shared::LimitsConfig;
use fundflow_shared::types::{AccountId, UserId};

use super::{ValidationError, validate_deposit, validate_withdrawal};
use crate::request::deposit::NewDeposit;
use crate::request::types::{DepositMethod, WithdrawalMethod};
use crate::request::withdrawal::{NewWithdrawal, PayoutDetails};

/// Strategy for amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1_i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for zero or negative amounts.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0_i64..100_000_000).prop_map(|cents| Decimal::new(-cents, 2))
}

fn arb_deposit_method() -> impl Strategy<Value = DepositMethod> {
    proptest::sample::select(DepositMethod::ALL.to_vec())
}

fn deposit(amount: Decimal, method: DepositMethod) -> NewDeposit {
    NewDeposit {
        user_id: UserId::new(),
        account_id: AccountId::new(),
        amount,
        method,
        bank_name: None,
        account_number_last4: None,
        notes: None,
        idempotency_key: None,
    }
}

fn bank_withdrawal(amount: Decimal) -> NewWithdrawal {
    NewWithdrawal {
        user_id: UserId::new(),
        account_id: AccountId::new(),
        amount,
        method: WithdrawalMethod::BankTransfer,
        details: PayoutDetails {
            bank_name: Some("Chase".to_string()),
            account_number_last4: Some("1234".to_string()),
            ..PayoutDetails::default()
        },
        notes: None,
        idempotency_key: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Non-courier deposits validate for every amount in (0, 1,000,000].
    #[test]
    fn prop_valid_deposits_validate(amount in positive_amount(), method in arb_deposit_method()) {
        prop_assume!(method != DepositMethod::CashCourier);
        prop_assert!(validate_deposit(&deposit(amount, method), &LimitsConfig::default()).is_ok());
    }

    /// Deposits with amount <= 0 never validate.
    #[test]
    fn prop_non_positive_deposits_fail(amount in non_positive_amount(), method in arb_deposit_method()) {
        prop_assert_eq!(
            validate_deposit(&deposit(amount, method), &LimitsConfig::default()),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    /// Cash courier outside [10,000, 500,000] is always rejected.
    #[test]
    fn prop_cash_courier_band(amount in positive_amount()) {
        let limits = LimitsConfig::default();
        let in_band = amount >= limits.cash_courier_min && amount <= limits.cash_courier_max;
        let result = validate_deposit(&deposit(amount, DepositMethod::CashCourier), &limits);
        prop_assert_eq!(result.is_ok(), in_band);
    }

    /// A balance below the amount always fails with insufficient funds.
    #[test]
    fn prop_insufficient_balance_fails(amount in positive_amount(), shortfall in 1_i64..1_000_000) {
        let balance = amount - Decimal::new(shortfall, 2);
        let result = validate_withdrawal(&bank_withdrawal(amount), balance, &LimitsConfig::default());
        let is_insufficient = matches!(result, Err(ValidationError::InsufficientFunds { .. }));
        prop_assert!(is_insufficient);
    }

    /// A balance at or above the amount never blocks a well-formed withdrawal.
    #[test]
    fn prop_sufficient_balance_passes(amount in positive_amount(), surplus in 0_i64..1_000_000) {
        let balance = amount + Decimal::new(surplus, 2);
        prop_assert!(validate_withdrawal(&bank_withdrawal(amount), balance, &LimitsConfig::default()).is_ok());
    }

    /// Debit card payouts above 10,000 are always rejected.
    #[test]
    fn prop_debit_card_cap(cents in 1_000_001_i64..100_000_000) {
        let amount = Decimal::new(cents, 2);
        let mut w = bank_withdrawal(amount);
        w.method = WithdrawalMethod::DebitCard;
        w.details = PayoutDetails {
            card_last4: Some("4242".to_string()),
            ..PayoutDetails::default()
        };
        let result = validate_withdrawal(&w, amount, &LimitsConfig::default());
        let is_capped = matches!(result, Err(ValidationError::DebitCardLimitExceeded { .. }));
        prop_assert!(is_capped);
    }
}
