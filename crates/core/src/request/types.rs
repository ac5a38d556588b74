//! Closed enumerations exposed at the request boundary.
//!
//! Every enum serializes to the snake_case (or upper-case, for crypto
//! tickers) wire value and can be parsed back case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a wire-level enum with `as_str`, `parse`, `ALL` and `Display`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Parses the wire representation, ignoring case and surrounding whitespace.
            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// How funds arrive in an account.
    DepositMethod {
        /// Domestic bank transfer.
        BankTransfer => "bank_transfer",
        /// Wire transfer.
        Wire => "wire",
        /// Mailed check.
        Check => "check",
        /// Card payment.
        Card => "card",
        /// On-chain crypto transfer.
        Crypto => "crypto",
        /// Physical cash collected by courier.
        CashCourier => "cash_courier",
    }
}

wire_enum! {
    /// How funds leave an account.
    WithdrawalMethod {
        /// Domestic bank transfer.
        BankTransfer => "bank_transfer",
        /// Wire transfer.
        Wire => "wire",
        /// Mailed check.
        Check => "check",
        /// ACH transfer.
        Ach => "ach",
        /// PayPal wallet.
        Paypal => "paypal",
        /// Venmo wallet.
        Venmo => "venmo",
        /// On-chain crypto transfer.
        Crypto => "crypto",
        /// Push to a debit card.
        DebitCard => "debit_card",
    }
}

wire_enum! {
    /// Deposit status.
    ///
    /// `Pending` and `Processing` await an admin decision; the rest are terminal.
    TransactionStatus {
        /// Submitted, not yet picked up.
        Pending => "pending",
        /// Claimed by an admin for review.
        Processing => "processing",
        /// Approved and credited.
        Completed => "completed",
        /// Rejected; no balance effect.
        Failed => "failed",
        /// Withdrawn before review.
        Cancelled => "cancelled",
    }
}

wire_enum! {
    /// Withdrawal admin approval status.
    ///
    /// Only `PendingReview` is non-terminal.
    AdminApprovalStatus {
        /// Awaiting an admin decision.
        PendingReview => "pending_review",
        /// Approved and debited.
        Approved => "approved",
        /// Rejected by an admin.
        Rejected => "rejected",
        /// Cancelled by the owner before review.
        Cancelled => "cancelled",
    }
}

wire_enum! {
    /// Why an admin rejected a withdrawal.
    RejectionReason {
        /// Identity or ownership could not be verified.
        InsufficientVerification => "insufficient_verification",
        /// Pattern looks fraudulent.
        SuspiciousActivity => "suspicious_activity",
        /// Payout details are wrong.
        IncorrectDetails => "incorrect_details",
        /// The account cannot cover the amount.
        InsufficientFunds => "insufficient_funds",
        /// Anything else; explained in the admin notes.
        Other => "other",
    }
}

wire_enum! {
    /// Crypto assets accepted for withdrawal.
    CryptoCurrency {
        /// Bitcoin.
        Btc => "BTC",
        /// Ether.
        Eth => "ETH",
        /// Tether.
        Usdt => "USDT",
        /// USD Coin.
        Usdc => "USDC",
    }
}

/// Payout rail a withdrawal method belongs to.
///
/// Each channel carries its own required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutChannel {
    /// Bank name and account number.
    Banking,
    /// Wallet email.
    Wallet,
    /// Wallet address and asset.
    Crypto,
    /// Card number suffix.
    Card,
}

impl WithdrawalMethod {
    /// Returns the payout channel for this method.
    #[must_use]
    pub const fn channel(&self) -> PayoutChannel {
        match self {
            Self::BankTransfer | Self::Wire | Self::Check | Self::Ach => PayoutChannel::Banking,
            Self::Paypal | Self::Venmo => PayoutChannel::Wallet,
            Self::Crypto => PayoutChannel::Crypto,
            Self::DebitCard => PayoutChannel::Card,
        }
    }
}

impl TransactionStatus {
    /// Statuses from which an admin may approve or reject.
    pub const REVIEWABLE: &'static [Self] = &[Self::Pending, Self::Processing];

    /// Returns true if an admin may approve or reject from this status.
    #[must_use]
    pub fn is_reviewable(&self) -> bool {
        Self::REVIEWABLE.contains(self)
    }

    /// Returns true if no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl AdminApprovalStatus {
    /// Statuses from which an admin may approve or reject, or the owner cancel.
    pub const REVIEWABLE: &'static [Self] = &[Self::PendingReview];

    /// Returns true if no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::PendingReview)
    }
}

/// Direction of a funds-movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Funds into an account.
    Deposit,
    /// Funds out of an account.
    Withdrawal,
}

impl RequestKind {
    /// Prefix used for this kind's reference numbers.
    #[must_use]
    pub const fn reference_prefix(&self) -> &'static str {
        match self {
            Self::Deposit => "DEP-",
            Self::Withdrawal => "WTH-",
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// Capitalised name used in messages.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
