//! Account and member identifiers.
//!
//! A patient *account* groups a primary holder and their family. Every
//! person on the account gets a *member* ID that is unique within it:
//!
//! ```text
//! account 101
//!   ├── 001  primary holder
//!   ├── 002  first family member
//!   └── 003  second family member
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A patient account number, handed out once from a persisted counter.
///
/// Written as a JSON number. Older records hold it as a numeric string
/// (`"101"`), which reads back as the same ID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u64", try_from = "StoredAccountId")]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccountId> for u64 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAccountId {
    Number(u64),
    Text(String),
}

impl TryFrom<StoredAccountId> for AccountId {
    type Error = ModelError;

    fn try_from(value: StoredAccountId) -> Result<Self, Self::Error> {
        match value {
            StoredAccountId::Number(n) => Ok(Self(n)),
            StoredAccountId::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| ModelError::InvalidAccountId(s)),
        }
    }
}

/// A person's number within an account, shown as three zero-padded digits.
///
/// Stored as the padded string (`"001"`) so persisted records read the
/// same way the member card prints them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(u16);

impl MemberId {
    /// The primary account holder.
    pub const PRIMARY: MemberId = MemberId(1);

    /// Largest number that still fits in three digits.
    pub const MAX: u16 = 999;

    /// Creates a member ID from its number.
    ///
    /// # Errors
    /// [`ModelError::InvalidMemberId`] if `n` is 0 or above 999.
    pub fn new(n: u16) -> Result<Self, ModelError> {
        if n == 0 || n > Self::MAX {
            return Err(ModelError::InvalidMemberId(n.to_string()));
        }
        Ok(Self(n))
    }

    /// Parses a member ID such as `"002"` (padding is optional).
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let n: u16 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidMemberId(s.to_string()))?;
        Self::new(n)
    }

    /// The numeric value.
    pub fn get(self) -> u16 {
        self.0
    }

    /// The ID after this one.
    ///
    /// # Errors
    /// [`ModelError::MemberLimit`] once `999` is reached.
    pub fn next(self) -> Result<Self, ModelError> {
        Self::new(self.0 + 1).map_err(|_| ModelError::MemberLimit)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl TryFrom<String> for MemberId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_display_is_zero_padded() {
        assert_eq!(MemberId::PRIMARY.to_string(), "001");
        assert_eq!(MemberId::new(42).unwrap().to_string(), "042");
        assert_eq!(MemberId::new(999).unwrap().to_string(), "999");
    }

    #[test]
    fn test_member_id_parse_accepts_padded_and_bare() {
        assert_eq!(MemberId::parse("002").unwrap(), MemberId::new(2).unwrap());
        assert_eq!(MemberId::parse("7").unwrap(), MemberId::new(7).unwrap());
    }

    #[test]
    fn test_member_id_parse_rejects_garbage_and_zero() {
        assert!(matches!(
            MemberId::parse("abc"),
            Err(ModelError::InvalidMemberId(_))
        ));
        assert!(matches!(
            MemberId::parse("000"),
            Err(ModelError::InvalidMemberId(_))
        ));
        assert!(matches!(
            MemberId::parse("1000"),
            Err(ModelError::InvalidMemberId(_))
        ));
    }

    #[test]
    fn test_member_id_next_stops_at_999() {
        let last = MemberId::new(999).unwrap();
        assert!(matches!(last.next(), Err(ModelError::MemberLimit)));
        assert_eq!(MemberId::PRIMARY.next().unwrap().to_string(), "002");
    }

    #[test]
    fn test_account_id_display_is_bare_number() {
        assert_eq!(AccountId(101).to_string(), "101");
    }

    #[test]
    fn test_account_id_reads_number_or_numeric_string() {
        let from_number: AccountId = serde_json::from_str("101").unwrap();
        let from_text: AccountId = serde_json::from_str(r#""101""#).unwrap();

        assert_eq!(from_number, AccountId(101));
        assert_eq!(from_text, AccountId(101));
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "101");
    }

    #[test]
    fn test_account_id_rejects_non_numeric_string() {
        let result: Result<AccountId, _> = serde_json::from_str(r#""abc""#);
        assert!(result.is_err());
    }
}
