//! The credential directory: every registered account, keyed by email.
//!
//! The directory owns no data of its own. Accounts live in storage under
//! `users`, and the patient account counter under `nextAccountId`; each
//! operation reads them, changes them and writes them back before
//! returning.
//!
//! ## Account numbering
//!
//! ```text
//! nextAccountId = 101
//! register(patient a) → account 101, member 001, counter → 102
//! register(doctor d)  → no ids,                  counter unchanged
//! register(patient b) → account 102, member 001, counter → 103
//! ```
//!
//! The allocator also looks at the highest account ID already on file and
//! never hands out anything at or below it, so a lost or corrupt counter
//! can't cause two accounts to share a number.
//!
//! ## Unreadable `users`
//!
//! Operations that rewrite `users` refuse to run when the stored list
//! doesn't parse, returning [`SessionError::PersistenceParse`] and
//! leaving it untouched. Read-only lookups treat it as empty.

use carenexus_model::{
    AccountDetails, AccountId, AccountRecord, Codec, MemberId, Role, Route, SessionIdentity,
};
use carenexus_storage::{keys, KeyValueStore};
use serde::{Deserialize, Serialize};

use crate::{profiles, PasswordHasher, Records, SaltedSha256, SessionError};

// ---------------------------------------------------------------------------
// DirectoryConfig
// ---------------------------------------------------------------------------

/// Configuration for the credential directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryConfig {
    /// The account number given to the first patient ever registered.
    pub first_account_id: u64,

    /// Rounds of SHA-256 applied to each new password.
    pub hash_iterations: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            first_account_id: 101,
            hash_iterations: SaltedSha256::DEFAULT_ITERATIONS,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// A sign-up form.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role-specific fields. Patient IDs in here are ignored; the
    /// directory always allocates fresh ones.
    pub details: AccountDetails,
}

impl NewAccount {
    fn validate(&self) -> Result<(), SessionError> {
        let blank = |s: &str| s.trim().is_empty();
        let missing_department = matches!(
            &self.details,
            AccountDetails::Doctor { department, .. } if blank(department)
        );

        if blank(&self.name) || blank(&self.email) || self.password.is_empty() || missing_department {
            return Err(SessionError::InvalidRegistration(
                "Please fill in all required fields".into(),
            ));
        }
        Ok(())
    }
}

/// A successful sign-up or sign-in: who is now signed in, and where to
/// send them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub identity: SessionIdentity,
    pub target: Route,
}

// ---------------------------------------------------------------------------
// CredentialDirectory
// ---------------------------------------------------------------------------

/// Registers accounts and checks sign-ins.
///
/// Generic over the [`PasswordHasher`] so tests can use a cheap one and
/// deployments a stronger one.
#[derive(Debug, Clone)]
pub struct CredentialDirectory<H = SaltedSha256> {
    config: DirectoryConfig,
    hasher: H,
}

impl CredentialDirectory {
    /// Creates a directory using [`SaltedSha256`] with the configured
    /// iteration count.
    pub fn new(config: DirectoryConfig) -> Self {
        let hasher = SaltedSha256::new(config.hash_iterations);
        Self { config, hasher }
    }
}

impl<H: PasswordHasher> CredentialDirectory<H> {
    pub fn with_hasher(config: DirectoryConfig, hasher: H) -> Self {
        Self { config, hasher }
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Registers a new account.
    ///
    /// Patients get a fresh account ID and member `001`. The returned
    /// identity always has `has_completed_profile = false`, and the target
    /// is the role's profile form (`/admin` for admins).
    ///
    /// # Errors
    /// - [`SessionError::InvalidRegistration`]: a required field is blank
    /// - [`SessionError::DuplicateEmail`]: the email is already on file,
    ///   under any role (exact, case-sensitive match)
    /// - [`SessionError::PersistenceParse`]: the stored `users` list is
    ///   unreadable
    /// - [`SessionError::AccountIdsExhausted`]: no patient account number
    ///   is left to hand out
    pub fn register<S: KeyValueStore, C: Codec>(
        &self,
        records: &mut Records<S, C>,
        account: NewAccount,
    ) -> Result<AuthOutcome, SessionError> {
        account.validate()?;

        let mut users = self.load_users(records)?;
        if users.iter().any(|u| u.email == account.email) {
            return Err(SessionError::DuplicateEmail(account.email));
        }

        let details = match account.details {
            AccountDetails::Patient { .. } => AccountDetails::Patient {
                account_id: Some(self.allocate_account_id(records, &users)?),
                member_id: Some(MemberId::PRIMARY),
            },
            other => other,
        };

        let record = AccountRecord {
            name: account.name,
            email: account.email,
            password: self.hasher.hash(&account.password),
            details,
        };
        let role = record.role();
        let identity = SessionIdentity::from_account(&record, false);

        users.push(record);
        records.save(keys::USERS, &users)?;

        tracing::info!(email = %identity.email, %role, "account registered");
        Ok(AuthOutcome {
            target: Route::landing_for(role, false),
            identity,
        })
    }

    /// Checks a sign-in attempt through the `role` portal.
    ///
    /// On success the identity's `has_completed_profile` reflects the
    /// stored profile, and the target is the dashboard or the profile form
    /// accordingly. Patients registered before IDs were issued get them
    /// now: a fresh account ID if they have none, and member `001`.
    ///
    /// # Errors
    /// - [`SessionError::UnknownEmail`]: nobody registered this email
    /// - [`SessionError::RoleMismatch`]: the email belongs to another role
    /// - [`SessionError::InvalidPassword`]: wrong password
    pub fn authenticate<S: KeyValueStore, C: Codec>(
        &self,
        records: &mut Records<S, C>,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthOutcome, SessionError> {
        let mut users = self.load_users(records)?;

        let index = users
            .iter()
            .position(|u| u.email == email)
            .ok_or_else(|| SessionError::UnknownEmail(email.to_string()))?;

        let actual = users[index].role();
        if actual != role {
            tracing::info!(%email, %actual, attempted = %role, "sign-in through wrong portal");
            return Err(SessionError::RoleMismatch {
                email: email.to_string(),
                actual,
            });
        }

        if !self.hasher.verify(password, &users[index].password) {
            tracing::info!(%email, "sign-in rejected: bad password");
            return Err(SessionError::InvalidPassword);
        }

        let missing = match users[index].details {
            AccountDetails::Patient {
                account_id,
                member_id,
            } if account_id.is_none() || member_id.is_none() => Some((account_id, member_id)),
            _ => None,
        };
        if let Some((account_id, member_id)) = missing {
            let account_id = match account_id {
                Some(existing) => existing,
                None => self.allocate_account_id(records, &users)?,
            };
            users[index].details = AccountDetails::Patient {
                account_id: Some(account_id),
                member_id: Some(member_id.unwrap_or(MemberId::PRIMARY)),
            };
            records.save(keys::USERS, &users)?;
            tracing::info!(%email, %account_id, "back-filled patient ids");
        }

        let account = &users[index];
        let completed = profiles::completion_or_incomplete(records, email, role)?;
        let identity = SessionIdentity::from_account(account, completed);

        tracing::info!(%email, %role, completed, "signed in");
        Ok(AuthOutcome {
            target: Route::landing_for(role, completed),
            identity,
        })
    }

    /// Looks an account up by email.
    pub fn find<S: KeyValueStore, C: Codec>(
        &self,
        records: &Records<S, C>,
        email: &str,
    ) -> Result<Option<AccountRecord>, SessionError> {
        Ok(self.read_users(records)?.into_iter().find(|u| u.email == email))
    }

    /// Every account registered under `role`, in registration order.
    pub fn accounts<S: KeyValueStore, C: Codec>(
        &self,
        records: &Records<S, C>,
        role: Role,
    ) -> Result<Vec<AccountRecord>, SessionError> {
        Ok(self
            .read_users(records)?
            .into_iter()
            .filter(|u| u.role() == role)
            .collect())
    }

    /// Removes the doctor accounts that belong to a roster entry.
    ///
    /// When the entry knows its doctor's `email`, only that account is
    /// removed. Otherwise doctor accounts whose email local part equals
    /// `handle` are. Patient and admin accounts are never touched.
    ///
    /// Returns how many accounts were removed.
    pub fn remove_doctor_accounts<S: KeyValueStore, C: Codec>(
        &self,
        records: &mut Records<S, C>,
        handle: &str,
        email: Option<&str>,
    ) -> Result<usize, SessionError> {
        let mut users = self.load_users(records)?;
        let before = users.len();

        users.retain(|u| {
            let belongs = match email {
                Some(email) => u.email == email,
                None => u.local_part() == handle,
            };
            !(u.role() == Role::Doctor && belongs)
        });

        let removed = before - users.len();
        if removed > 0 {
            records.save(keys::USERS, &users)?;
            tracing::info!(%handle, removed, "doctor accounts removed");
        }
        Ok(removed)
    }

    /// Reads `users` ahead of rewriting it. An unreadable list is an
    /// error, so a write never replaces accounts it couldn't see.
    fn load_users<S: KeyValueStore, C: Codec>(
        &self,
        records: &Records<S, C>,
    ) -> Result<Vec<AccountRecord>, SessionError> {
        Ok(records.load(keys::USERS)?.unwrap_or_default())
    }

    /// Reads `users` for a lookup. An unreadable list is treated as empty.
    fn read_users<S: KeyValueStore, C: Codec>(
        &self,
        records: &Records<S, C>,
    ) -> Result<Vec<AccountRecord>, SessionError> {
        Ok(records.load_or_skip(keys::USERS)?.unwrap_or_default())
    }

    /// Hands out the next patient account ID and advances the counter.
    fn allocate_account_id<S: KeyValueStore, C: Codec>(
        &self,
        records: &mut Records<S, C>,
        users: &[AccountRecord],
    ) -> Result<AccountId, SessionError> {
        let counter = records
            .load_or_skip::<u64>(keys::NEXT_ACCOUNT_ID)?
            .filter(|n| *n > 0)
            .unwrap_or(self.config.first_account_id);

        let highest = users
            .iter()
            .filter_map(|u| match u.details {
                AccountDetails::Patient {
                    account_id: Some(id),
                    ..
                } => Some(id.0),
                _ => None,
            })
            .max();
        let above_existing = match highest {
            Some(id) => id.checked_add(1).ok_or(SessionError::AccountIdsExhausted)?,
            None => 0,
        };

        let next = counter.max(above_existing);
        let after = next.checked_add(1).ok_or(SessionError::AccountIdsExhausted)?;
        records.save(keys::NEXT_ACCOUNT_ID, &after)?;
        Ok(AccountId(next))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `CredentialDirectory`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //! Every test uses a 1-round hasher so hashing stays instant.

    use carenexus_model::{DoctorProfile, PatientProfile};
    use carenexus_storage::MemoryStore;

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn directory() -> CredentialDirectory {
        CredentialDirectory::new(DirectoryConfig {
            hash_iterations: 1,
            ..DirectoryConfig::default()
        })
    }

    fn records() -> Records<MemoryStore> {
        Records::new(MemoryStore::new())
    }

    fn patient(email: &str) -> NewAccount {
        NewAccount {
            name: "Patient".into(),
            email: email.into(),
            password: "pw".into(),
            details: AccountDetails::patient(),
        }
    }

    fn doctor(email: &str) -> NewAccount {
        NewAccount {
            name: "Dr. Rao".into(),
            email: email.into(),
            password: "pw".into(),
            details: AccountDetails::Doctor {
                department: "Cardiology".into(),
                hospital: String::new(),
                license_number: None,
            },
        }
    }

    fn admin(email: &str) -> NewAccount {
        NewAccount {
            name: "Root".into(),
            email: email.into(),
            password: "pw".into(),
            details: AccountDetails::Admin,
        }
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_patient_gets_first_account_and_primary_member() {
        let dir = directory();
        let mut rec = records();

        let out = dir.register(&mut rec, patient("a@x.com")).unwrap();

        assert_eq!(out.identity.account_id, Some(AccountId(101)));
        assert_eq!(out.identity.member_id.map(|m| m.to_string()).as_deref(), Some("001"));
        assert!(!out.identity.has_completed_profile);
        assert_eq!(out.target, Route::PatientProfile);
    }

    #[test]
    fn test_register_patients_get_distinct_account_ids() {
        let dir = directory();
        let mut rec = records();

        let a = dir.register(&mut rec, patient("a@x.com")).unwrap();
        dir.register(&mut rec, doctor("d@x.com")).unwrap();
        let b = dir.register(&mut rec, patient("b@x.com")).unwrap();

        assert_eq!(a.identity.account_id, Some(AccountId(101)));
        assert_eq!(b.identity.account_id, Some(AccountId(102)));
        assert_eq!(b.identity.member_id, Some(MemberId::PRIMARY));
    }

    #[test]
    fn test_register_doctor_has_no_ids_and_targets_doctor_profile() {
        let dir = directory();
        let mut rec = records();

        let out = dir.register(&mut rec, doctor("d@x.com")).unwrap();

        assert_eq!(out.identity.account_id, None);
        assert_eq!(out.identity.member_id, None);
        assert_eq!(out.target, Route::DoctorProfile);
        // The counter is untouched by non-patients.
        assert_eq!(rec.load::<u64>(keys::NEXT_ACCOUNT_ID).unwrap(), None);
    }

    #[test]
    fn test_register_admin_targets_admin() {
        let out = directory().register(&mut records(), admin("root@x.com")).unwrap();
        assert_eq!(out.target, Route::Admin);
    }

    #[test]
    fn test_register_duplicate_email_any_role_returns_error() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();

        let same_role = dir.register(&mut rec, patient("a@x.com"));
        let other_role = dir.register(&mut rec, doctor("a@x.com"));

        assert!(matches!(same_role, Err(SessionError::DuplicateEmail(e)) if e == "a@x.com"));
        assert!(matches!(other_role, Err(SessionError::DuplicateEmail(_))));
    }

    #[test]
    fn test_register_email_match_is_case_sensitive() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();

        assert!(dir.register(&mut rec, patient("A@x.com")).is_ok());
    }

    #[test]
    fn test_register_blank_fields_rejected() {
        let dir = directory();
        let mut rec = records();

        let mut no_name = patient("a@x.com");
        no_name.name = "  ".into();
        let mut no_password = patient("b@x.com");
        no_password.password.clear();
        let mut no_department = doctor("d@x.com");
        no_department.details = AccountDetails::Doctor {
            department: " ".into(),
            hospital: String::new(),
            license_number: None,
        };

        for form in [no_name, no_password, no_department] {
            let result = dir.register(&mut rec, form);
            assert!(
                matches!(result, Err(SessionError::InvalidRegistration(_))),
                "got {result:?}"
            );
        }
        assert!(dir.accounts(&rec, Role::Patient).unwrap().is_empty());
    }

    #[test]
    fn test_register_stores_digest_not_password() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();

        let stored = dir.find(&rec, "a@x.com").unwrap().unwrap();

        assert_ne!(stored.password, "pw");
        assert!(stored.password.starts_with("sha256$"));
    }

    #[test]
    fn test_register_ignores_caller_supplied_patient_ids() {
        let dir = directory();
        let mut rec = records();
        let mut form = patient("a@x.com");
        form.details = AccountDetails::Patient {
            account_id: Some(AccountId(9)),
            member_id: Some(MemberId::new(7).unwrap()),
        };

        let out = dir.register(&mut rec, form).unwrap();

        assert_eq!(out.identity.account_id, Some(AccountId(101)));
        assert_eq!(out.identity.member_id, Some(MemberId::PRIMARY));
    }

    // =====================================================================
    // Account id allocation
    // =====================================================================

    #[test]
    fn test_allocation_respects_configured_first_id() {
        let dir = CredentialDirectory::new(DirectoryConfig {
            first_account_id: 5000,
            hash_iterations: 1,
        });
        let out = dir.register(&mut records(), patient("a@x.com")).unwrap();
        assert_eq!(out.identity.account_id, Some(AccountId(5000)));
    }

    #[test]
    fn test_allocation_continues_from_persisted_counter() {
        let dir = directory();
        let mut rec = records();
        rec.save(keys::NEXT_ACCOUNT_ID, &250u64).unwrap();

        let out = dir.register(&mut rec, patient("a@x.com")).unwrap();

        assert_eq!(out.identity.account_id, Some(AccountId(250)));
        assert_eq!(rec.load::<u64>(keys::NEXT_ACCOUNT_ID).unwrap(), Some(251));
    }

    #[test]
    fn test_allocation_never_reuses_after_counter_lost() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();
        dir.register(&mut rec, patient("b@x.com")).unwrap();
        rec.remove(keys::NEXT_ACCOUNT_ID).unwrap();

        let c = dir.register(&mut rec, patient("c@x.com")).unwrap();

        assert_eq!(c.identity.account_id, Some(AccountId(103)));
    }

    #[test]
    fn test_register_unreadable_users_list_keeps_stored_accounts() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();
        let mut raw = rec.store().get(keys::USERS).unwrap().unwrap();
        raw.truncate(raw.len() - 1);
        raw.push_str(r#",{"name":"Odd","email":"odd@x.com","password":"x","role":"nurse"}]"#);
        rec.store_mut().set(keys::USERS, raw.clone()).unwrap();

        let result = dir.register(&mut rec, patient("b@x.com"));

        assert!(
            matches!(&result, Err(SessionError::PersistenceParse { key, .. }) if key == keys::USERS),
            "got {result:?}"
        );
        assert_eq!(rec.store().get(keys::USERS).unwrap(), Some(raw));
    }

    #[test]
    fn test_register_reads_string_account_ids() {
        let dir = directory();
        let mut rec = records();
        let raw = format!(
            r#"[{{"name":"A","email":"a@x.com","password":"{}","role":"patient","accountId":"101","memberId":"001"}}]"#,
            dir.hasher.hash("pw")
        );
        rec.store_mut().set(keys::USERS, raw).unwrap();

        let b = dir.register(&mut rec, patient("b@x.com")).unwrap();

        assert_eq!(b.identity.account_id, Some(AccountId(102)));
        let emails: Vec<_> = dir
            .accounts(&rec, Role::Patient)
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_allocation_exhausted_counter_returns_error() {
        let dir = directory();
        let mut rec = records();
        rec.save(keys::NEXT_ACCOUNT_ID, &u64::MAX).unwrap();

        let result = dir.register(&mut rec, patient("a@x.com"));

        assert!(matches!(result, Err(SessionError::AccountIdsExhausted)), "got {result:?}");
        assert!(dir.find(&rec, "a@x.com").unwrap().is_none());
        assert_eq!(rec.load::<u64>(keys::NEXT_ACCOUNT_ID).unwrap(), Some(u64::MAX));
    }

    #[test]
    fn test_allocation_highest_existing_id_at_limit_returns_error() {
        let dir = directory();
        let mut rec = records();
        let full = AccountRecord {
            name: "Last".into(),
            email: "last@x.com".into(),
            password: dir.hasher.hash("pw"),
            details: AccountDetails::Patient {
                account_id: Some(AccountId(u64::MAX)),
                member_id: Some(MemberId::PRIMARY),
            },
        };
        rec.save(keys::USERS, &vec![full]).unwrap();

        let result = dir.register(&mut rec, patient("a@x.com"));

        assert!(matches!(result, Err(SessionError::AccountIdsExhausted)), "got {result:?}");
    }

    #[test]
    fn test_allocation_corrupt_counter_falls_back() {
        let dir = directory();
        let mut rec = records();
        rec.store_mut()
            .set(keys::NEXT_ACCOUNT_ID, "not-a-number".into())
            .unwrap();

        let out = dir.register(&mut rec, patient("a@x.com")).unwrap();

        assert_eq!(out.identity.account_id, Some(AccountId(101)));
    }

    // =====================================================================
    // authenticate()
    // =====================================================================

    #[test]
    fn test_authenticate_after_register_succeeds() {
        let dir = directory();
        let mut rec = records();
        let registered = dir.register(&mut rec, patient("a@x.com")).unwrap();

        let out = dir.authenticate(&mut rec, "a@x.com", "pw", Role::Patient).unwrap();

        assert_eq!(out.identity, registered.identity);
        assert_eq!(out.target, Route::PatientProfile);
    }

    #[test]
    fn test_authenticate_unknown_email_returns_error() {
        let result = directory().authenticate(&mut records(), "nobody@x.com", "pw", Role::Patient);
        assert!(matches!(result, Err(SessionError::UnknownEmail(e)) if e == "nobody@x.com"));
    }

    #[test]
    fn test_authenticate_wrong_role_names_actual_role() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();

        let err = dir
            .authenticate(&mut rec, "a@x.com", "pw", Role::Doctor)
            .unwrap_err();

        assert!(matches!(err, SessionError::RoleMismatch { actual: Role::Patient, .. }));
        assert!(err.to_string().contains("patient"));
    }

    #[test]
    fn test_authenticate_role_checked_before_password() {
        // A wrong password through the wrong portal still reports the role.
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, doctor("d@x.com")).unwrap();

        let result = dir.authenticate(&mut rec, "d@x.com", "nope", Role::Patient);

        assert!(matches!(result, Err(SessionError::RoleMismatch { actual: Role::Doctor, .. })));
    }

    #[test]
    fn test_authenticate_wrong_password_returns_error() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();

        let result = dir.authenticate(&mut rec, "a@x.com", "PW", Role::Patient);

        assert!(matches!(result, Err(SessionError::InvalidPassword)));
    }

    #[test]
    fn test_authenticate_completed_profile_targets_dashboard() {
        let dir = directory();
        let mut rec = records();
        let out = dir.register(&mut rec, patient("a@x.com")).unwrap();
        let profile: PatientProfile = serde_json_profile(&out.identity, true);
        profiles::save_patient(&mut rec, &profile).unwrap();

        let out = dir.authenticate(&mut rec, "a@x.com", "pw", Role::Patient).unwrap();

        assert!(out.identity.has_completed_profile);
        assert_eq!(out.target, Route::PatientDashboard);
    }

    #[test]
    fn test_authenticate_doctor_targets_follow_profile_state() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, doctor("d@x.com")).unwrap();

        let before = dir.authenticate(&mut rec, "d@x.com", "pw", Role::Doctor).unwrap();
        assert_eq!(before.target, Route::DoctorProfile);

        profiles::save_doctor(
            &mut rec,
            &DoctorProfile {
                details: Default::default(),
                email: "d@x.com".into(),
                completed: true,
            },
        )
        .unwrap();

        let after = dir.authenticate(&mut rec, "d@x.com", "pw", Role::Doctor).unwrap();
        assert_eq!(after.target, Route::DoctorDashboard);
    }

    #[test]
    fn test_authenticate_admin_targets_admin() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, admin("root@x.com")).unwrap();

        let out = dir.authenticate(&mut rec, "root@x.com", "pw", Role::Admin).unwrap();

        assert_eq!(out.target, Route::Admin);
        assert!(out.identity.has_completed_profile);
    }

    #[test]
    fn test_authenticate_backfills_legacy_patient_ids() {
        let dir = directory();
        let mut rec = records();
        let legacy = AccountRecord {
            name: "Old".into(),
            email: "old@x.com".into(),
            password: dir.hasher.hash("pw"),
            details: AccountDetails::patient(),
        };
        rec.save(keys::USERS, &vec![legacy]).unwrap();

        let out = dir.authenticate(&mut rec, "old@x.com", "pw", Role::Patient).unwrap();

        assert_eq!(out.identity.account_id, Some(AccountId(101)));
        assert_eq!(out.identity.member_id, Some(MemberId::PRIMARY));
        let stored = dir.find(&rec, "old@x.com").unwrap().unwrap();
        assert_eq!(stored.patient_ids(), Some((AccountId(101), MemberId::PRIMARY)));

        // Signing in again doesn't allocate a second number.
        let again = dir.authenticate(&mut rec, "old@x.com", "pw", Role::Patient).unwrap();
        assert_eq!(again.identity.account_id, Some(AccountId(101)));
        assert_eq!(rec.load::<u64>(keys::NEXT_ACCOUNT_ID).unwrap(), Some(102));
    }

    #[test]
    fn test_authenticate_corrupt_users_list_returns_parse_error() {
        let dir = directory();
        let mut rec = records();
        rec.store_mut().set(keys::USERS, "{broken".into()).unwrap();

        let result = dir.authenticate(&mut rec, "a@x.com", "pw", Role::Patient);

        assert!(
            matches!(&result, Err(SessionError::PersistenceParse { key, .. }) if key == keys::USERS),
            "got {result:?}"
        );
        assert!(dir.find(&rec, "a@x.com").unwrap().is_none());
    }

    #[test]
    fn test_authenticate_keeps_existing_account_id_when_member_missing() {
        let dir = directory();
        let mut rec = records();
        let raw = format!(
            r#"[{{"name":"Old","email":"old@x.com","password":"{}","role":"patient","accountId":105}}]"#,
            dir.hasher.hash("pw")
        );
        rec.store_mut().set(keys::USERS, raw).unwrap();

        let out = dir.authenticate(&mut rec, "old@x.com", "pw", Role::Patient).unwrap();

        assert_eq!(out.identity.account_id, Some(AccountId(105)));
        assert_eq!(out.identity.member_id, Some(MemberId::PRIMARY));
        let stored = dir.find(&rec, "old@x.com").unwrap().unwrap();
        assert_eq!(stored.patient_ids(), Some((AccountId(105), MemberId::PRIMARY)));
        // No number was drawn from the counter.
        assert_eq!(rec.load::<u64>(keys::NEXT_ACCOUNT_ID).unwrap(), None);
    }

    // =====================================================================
    // accounts() / remove_doctor_accounts()
    // =====================================================================

    #[test]
    fn test_accounts_filters_by_role() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, patient("a@x.com")).unwrap();
        dir.register(&mut rec, doctor("d1@x.com")).unwrap();
        dir.register(&mut rec, doctor("d2@x.com")).unwrap();

        let doctors = dir.accounts(&rec, Role::Doctor).unwrap();

        let emails: Vec<_> = doctors.iter().map(|d| d.email.as_str()).collect();
        assert_eq!(emails, vec!["d1@x.com", "d2@x.com"]);
    }

    #[test]
    fn test_remove_doctor_accounts_by_email() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, doctor("rao@x.com")).unwrap();
        dir.register(&mut rec, doctor("rao@y.com")).unwrap();

        let removed = dir
            .remove_doctor_accounts(&mut rec, "rao", Some("rao@y.com"))
            .unwrap();

        assert_eq!(removed, 1);
        assert!(dir.find(&rec, "rao@x.com").unwrap().is_some());
        assert!(dir.find(&rec, "rao@y.com").unwrap().is_none());
    }

    #[test]
    fn test_remove_doctor_accounts_by_handle_spares_patients() {
        let dir = directory();
        let mut rec = records();
        dir.register(&mut rec, doctor("rao@x.com")).unwrap();
        dir.register(&mut rec, patient("rao@y.com")).unwrap();

        let removed = dir.remove_doctor_accounts(&mut rec, "rao", None).unwrap();

        assert_eq!(removed, 1);
        assert!(dir.find(&rec, "rao@x.com").unwrap().is_none());
        assert!(dir.find(&rec, "rao@y.com").unwrap().is_some());
    }

    #[test]
    fn test_remove_doctor_accounts_no_match_writes_nothing() {
        let dir = directory();
        let mut rec = records();

        let removed = dir.remove_doctor_accounts(&mut rec, "ghost", None).unwrap();

        assert_eq!(removed, 0);
        assert!(rec.store().is_empty());
    }

    // -- Fixtures ----------------------------------------------------------

    fn serde_json_profile(identity: &SessionIdentity, completed: bool) -> PatientProfile {
        PatientProfile {
            account_id: identity.account_id.unwrap(),
            member_id: identity.member_id.unwrap(),
            details: Default::default(),
            email: identity.email.clone(),
            completed,
            family_members: Vec::new(),
        }
    }
}
