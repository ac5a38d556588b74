//! Human-shareable reference numbers.
//!
//! A reference is `prefix + base36(unix millis) + "-" + 8 random base36
//! characters`, upper-cased, e.g. `DEP-MG9ZQX4K-7Q2M0B1Z`. It identifies a
//! request in support conversations and grants no access by itself.
//! Uniqueness is enforced by the store; callers regenerate on conflict.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::request::types::RequestKind;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 8;

/// Generates reference numbers.
pub struct ReferenceGenerator;

impl ReferenceGenerator {
    /// Generates a reference with the given prefix at the current time.
    #[must_use]
    pub fn generate(prefix: &str) -> String {
        Self::generate_at(prefix, Utc::now())
    }

    /// Generates a reference for a request kind (`DEP-` or `WTH-`).
    #[must_use]
    pub fn for_kind(kind: RequestKind) -> String {
        Self::generate(kind.reference_prefix())
    }

    /// Generates a reference stamped with `now`.
    #[must_use]
    pub fn generate_at(prefix: &str, now: DateTime<Utc>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let mut rng = rand::rng();

        let mut reference = String::with_capacity(prefix.len() + 13 + 1 + SUFFIX_LEN);
        reference.push_str(prefix);
        reference.push_str(&to_base36(millis));
        reference.push('-');
        for _ in 0..SUFFIX_LEN {
            reference.push(char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]));
        }
        reference
    }
}

/// Encodes an integer in upper-case base 36.
fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        // value % 36 < 36, always a valid index
        digits.push(ALPHABET[usize::try_from(value % 36).unwrap_or_default()]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_shape() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let reference = ReferenceGenerator::generate_at("DEP-", now);
        let rest = reference.strip_prefix("DEP-").unwrap();
        let (stamp, suffix) = rest.split_once('-').unwrap();
        assert_eq!(stamp, "LOYW3V28");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_for_kind_prefixes() {
        assert!(ReferenceGenerator::for_kind(RequestKind::Deposit).starts_with("DEP-"));
        assert!(ReferenceGenerator::for_kind(RequestKind::Withdrawal).starts_with("WTH-"));
    }

    #[test]
    fn test_ten_thousand_references_are_unique() {
        let references: HashSet<String> = (0..10_000)
            .map(|_| ReferenceGenerator::generate("WTH-"))
            .collect();
        assert_eq!(references.len(), 10_000);
    }
}
