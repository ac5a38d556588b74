//! Funded account as seen by the lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundflow_shared::types::{AccountId, UserId};

/// An account whose balance deposits credit and withdrawals debit.
///
/// The balance is only ever changed through the store's atomic increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Current balance; never negative.
    pub balance: Decimal,
    /// Last balance change.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns true if the balance covers `amount`.
    #[must_use]
    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}
