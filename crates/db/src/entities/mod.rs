//! `SeaORM` entities for the lifecycle tables.
//!
//! Enumerations are stored as `TEXT` guarded by `CHECK` constraints and
//! parsed back through the core wire names.

pub mod accounts;
pub mod deposits;
pub mod withdrawals;

use chrono::{DateTime, FixedOffset, Utc};

use crate::store::StoreError;

/// Parses a stored enumeration value.
pub(crate) fn parse_column<T>(
    column: &'static str,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, StoreError> {
    parse(raw).ok_or_else(|| StoreError::Backend(format!("Unexpected {column} value: {raw}")))
}

pub(crate) fn to_utc(at: DateTime<FixedOffset>) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}
