//! Account records and the session identity projected from them.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MemberId, Role};

// ---------------------------------------------------------------------------
// AccountDetails
// ---------------------------------------------------------------------------

/// The role-specific part of an account.
///
/// Stored flattened into the account object with a `role` tag, so a
/// doctor record reads `{"name":…,"role":"doctor","department":…}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum AccountDetails {
    /// IDs are optional only so that records written before ID issuance
    /// existed still load; sign-in back-fills them.
    #[serde(rename_all = "camelCase")]
    Patient {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        account_id: Option<AccountId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        member_id: Option<MemberId>,
    },

    #[serde(rename_all = "camelCase")]
    Doctor {
        department: String,
        #[serde(default)]
        hospital: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        license_number: Option<String>,
    },

    Admin,
}

impl AccountDetails {
    /// A patient with no IDs yet; the directory fills them in.
    pub fn patient() -> Self {
        Self::Patient {
            account_id: None,
            member_id: None,
        }
    }

    /// The role this variant stands for.
    pub fn role(&self) -> Role {
        match self {
            Self::Patient { .. } => Role::Patient,
            Self::Doctor { .. } => Role::Doctor,
            Self::Admin => Role::Admin,
        }
    }
}

// ---------------------------------------------------------------------------
// AccountRecord
// ---------------------------------------------------------------------------

/// A registered account in the credential directory.
///
/// `password` holds a digest produced by the session layer's password
/// hasher, never the password itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub details: AccountDetails,
}

impl AccountRecord {
    pub fn role(&self) -> Role {
        self.details.role()
    }

    /// The account and member IDs, for patients that have them.
    pub fn patient_ids(&self) -> Option<(AccountId, MemberId)> {
        match self.details {
            AccountDetails::Patient {
                account_id: Some(account),
                member_id: Some(member),
            } => Some((account, member)),
            _ => None,
        }
    }

    /// The part of the email before `@`. Used as a doctor's roster handle.
    pub fn local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

// ---------------------------------------------------------------------------
// SessionIdentity
// ---------------------------------------------------------------------------

/// The signed-in user, as held by the session store and mirrored to
/// storage under `authUser`.
///
/// `has_completed_profile` is derived, not authoritative: the session
/// store recomputes it from the profile records every time it hydrates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub has_completed_profile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<MemberId>,
}

impl SessionIdentity {
    /// Projects an account record into a session identity.
    pub fn from_account(account: &AccountRecord, has_completed_profile: bool) -> Self {
        let (account_id, member_id) = match account.patient_ids() {
            Some((a, m)) => (Some(a), Some(m)),
            None => (None, None),
        };
        Self {
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role(),
            has_completed_profile,
            account_id,
            member_id,
        }
    }
}
