//! `Portal` builder and the user-facing operations.
//!
//! This is the entry point for embedding Care Nexus. It ties together all
//! the layers: storage → records → directory/session → clinic.

use std::time::Duration;

use carenexus_clinic::{Appointment, CatalogSeed, Clinic, ClinicError, Doctor, Medicine};
use carenexus_model::{
    AccountId, AccountRecord, DoctorDetails, DoctorProfile, FamilyMemberDraft, MemberId,
    PatientProfile, PersonalDetails, Role, Route, SessionIdentity,
};
use carenexus_session::{
    gate, profiles, AuthOutcome, CredentialDirectory, GateDecision, NewAccount, PasswordHasher,
    Records, SaltedSha256, SessionError, SessionStore,
};
use carenexus_storage::KeyValueStore;

use crate::{CareNexusError, PortalConfig};

/// Builder for configuring and opening a [`Portal`].
///
/// # Example
///
/// ```rust
/// use carenexus::prelude::*;
///
/// let portal = PortalBuilder::new()
///     .config(PortalConfig { seed_catalog: false, ..PortalConfig::default() })
///     .build(MemoryStore::new())
///     .unwrap();
/// assert!(portal.current().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortalBuilder {
    config: PortalConfig,
}

impl PortalBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the simulated network delay.
    pub fn simulated_latency_ms(mut self, ms: u64) -> Self {
        self.config.simulated_latency_ms = ms;
        self
    }

    /// Opens the portal over `store` with the default password hasher.
    ///
    /// Loads (or seeds) the catalog and restores any persisted session.
    pub fn build<S: KeyValueStore>(self, store: S) -> Result<Portal<S>, CareNexusError> {
        let directory = CredentialDirectory::new(self.config.directory.clone());
        Portal::open(self.config, store, directory)
    }

    /// Like [`build`](Self::build), with a custom password hasher.
    pub fn build_with_hasher<S: KeyValueStore, H: PasswordHasher>(
        self,
        store: S,
        hasher: H,
    ) -> Result<Portal<S, H>, CareNexusError> {
        let directory = CredentialDirectory::with_hasher(self.config.directory.clone(), hasher);
        Portal::open(self.config, store, directory)
    }
}

/// The portal: one store, one signed-in user at a time.
///
/// Sign-up, sign-in, and profile saves are `async` only because they
/// wait out the configured latency first. Everything else is immediate.
pub struct Portal<S, H = SaltedSha256> {
    records: Records<S>,
    directory: CredentialDirectory<H>,
    session: SessionStore,
    clinic: Clinic,
    latency: Duration,
}

impl<S: KeyValueStore, H: PasswordHasher> Portal<S, H> {
    fn open(
        config: PortalConfig,
        store: S,
        directory: CredentialDirectory<H>,
    ) -> Result<Self, CareNexusError> {
        let mut records = Records::new(store);

        let seed = if config.seed_catalog {
            CatalogSeed::builtin()
        } else {
            CatalogSeed::default()
        };
        let clinic = Clinic::load(&mut records, seed)?;

        let mut session = SessionStore::new();
        session.hydrate(&mut records)?;
        tracing::info!(signed_in = session.is_authenticated(), "portal opened");

        Ok(Self {
            records,
            directory,
            session,
            clinic,
            latency: config.simulated_latency(),
        })
    }

    // -- Authentication ---------------------------------------------------

    /// Registers an account and signs it in.
    ///
    /// A doctor who signs up is also listed on the clinic roster. The
    /// sign-up stands even if that listing can't be written.
    pub async fn sign_up(&mut self, account: NewAccount) -> Result<AuthOutcome, CareNexusError> {
        self.simulate_latency().await;

        let is_doctor = account.details.role() == Role::Doctor;
        let email = account.email.clone();
        let outcome = self.directory.register(&mut self.records, account)?;
        self.session.establish(&mut self.records, outcome.identity.clone())?;

        if is_doctor {
            self.list_signed_up_doctor(&email);
        }
        Ok(outcome)
    }

    /// Signs in through the `role` portal.
    ///
    /// On failure the current session, if any, is left alone.
    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthOutcome, CareNexusError> {
        self.simulate_latency().await;

        let outcome = self
            .directory
            .authenticate(&mut self.records, email, password, role)?;
        self.session.establish(&mut self.records, outcome.identity.clone())?;
        Ok(outcome)
    }

    /// Signs out and returns the welcome page.
    pub fn sign_out(&mut self) -> Result<Route, CareNexusError> {
        Ok(self.session.sign_out(&mut self.records)?)
    }

    pub fn current(&self) -> Option<&SessionIdentity> {
        self.session.current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Runs the profile gate for `path` against the signed-in user.
    pub fn guard(&self, path: &str) -> GateDecision {
        gate::check(self.session.current(), path)
    }

    // -- Profiles ---------------------------------------------------------

    /// Saves the signed-in patient's profile and marks it complete.
    ///
    /// Returns the dashboard the first time, and the profile page when an
    /// already-complete profile is edited. Family members are kept.
    pub async fn save_patient_profile(
        &mut self,
        details: PersonalDetails,
    ) -> Result<Route, CareNexusError> {
        self.simulate_latency().await;

        let identity = self.require(Role::Patient)?;
        details.validate()?;
        let (account_id, member_id) = self.patient_ids(&identity)?;

        let family_members = match profiles::load_patient(&self.records, &identity.email) {
            Ok(existing) => existing.map(|p| p.family_members).unwrap_or_default(),
            Err(SessionError::PersistenceParse { key, source }) => {
                tracing::warn!(%key, error = %source, "replacing unreadable patient profile");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let profile = PatientProfile {
            account_id,
            member_id,
            details: details.trimmed(),
            email: identity.email.clone(),
            completed: true,
            family_members,
        };
        profiles::save_patient(&mut self.records, &profile)?;
        self.finish_profile(&identity)
    }

    /// Saves the signed-in doctor's profile and marks it complete.
    pub async fn save_doctor_profile(
        &mut self,
        details: DoctorDetails,
    ) -> Result<Route, CareNexusError> {
        self.simulate_latency().await;

        let identity = self.require(Role::Doctor)?;
        details.validate()?;

        let profile = DoctorProfile {
            details: details.trimmed(),
            email: identity.email.clone(),
            completed: true,
        };
        profiles::save_doctor(&mut self.records, &profile)?;
        self.finish_profile(&identity)
    }

    /// Adds a family member to the signed-in patient's profile and
    /// returns the member ID they were given.
    ///
    /// # Errors
    /// [`CareNexusError::ProfileRequired`] if the patient has no readable
    /// profile yet.
    pub async fn add_family_member(
        &mut self,
        draft: FamilyMemberDraft,
    ) -> Result<MemberId, CareNexusError> {
        self.simulate_latency().await;

        let identity = self.require(Role::Patient)?;
        let mut profile = match profiles::load_patient(&self.records, &identity.email) {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err(CareNexusError::ProfileRequired),
            Err(SessionError::PersistenceParse { key, source }) => {
                tracing::warn!(%key, error = %source, "patient profile unreadable");
                return Err(CareNexusError::ProfileRequired);
            }
            Err(e) => return Err(e.into()),
        };

        let member_id = profile.add_family_member(draft)?;
        profiles::save_patient(&mut self.records, &profile)?;
        tracing::info!(email = %identity.email, %member_id, "family member added");
        Ok(member_id)
    }

    /// The signed-in patient's stored profile.
    pub fn patient_profile(&self) -> Result<Option<PatientProfile>, CareNexusError> {
        let identity = self.require(Role::Patient)?;
        Ok(profiles::load_patient(&self.records, &identity.email)?)
    }

    /// The signed-in doctor's stored profile.
    pub fn doctor_profile(&self) -> Result<Option<DoctorProfile>, CareNexusError> {
        let identity = self.require(Role::Doctor)?;
        Ok(profiles::load_doctor(&self.records, &identity.email)?)
    }

    // -- Clinic -----------------------------------------------------------

    pub fn clinic(&self) -> &Clinic {
        &self.clinic
    }

    /// Every account registered under `role`.
    pub fn accounts(&self, role: Role) -> Result<Vec<AccountRecord>, CareNexusError> {
        Ok(self.directory.accounts(&self.records, role)?)
    }

    pub fn book_appointment(&mut self, appointment: Appointment) -> Result<(), CareNexusError> {
        Ok(self.clinic.book_appointment(&mut self.records, appointment)?)
    }

    pub fn cancel_appointment(&mut self, index: usize) -> Result<Appointment, CareNexusError> {
        Ok(self.clinic.cancel_appointment(&mut self.records, index)?)
    }

    pub fn add_doctor(&mut self, doctor: Doctor) -> Result<(), CareNexusError> {
        Ok(self.clinic.add_doctor(&mut self.records, doctor)?)
    }

    pub fn update_doctor(&mut self, doctor: Doctor) -> Result<(), CareNexusError> {
        Ok(self.clinic.update_doctor(&mut self.records, doctor)?)
    }

    /// Removes a doctor from the roster together with their account.
    pub fn remove_doctor(&mut self, handle: &str) -> Result<Doctor, CareNexusError> {
        Ok(self
            .clinic
            .remove_doctor(&mut self.records, &self.directory, handle)?)
    }

    pub fn add_medicine(&mut self, medicine: Medicine) -> Result<(), CareNexusError> {
        Ok(self.clinic.add_medicine(&mut self.records, medicine)?)
    }

    pub fn update_medicine(&mut self, medicine: Medicine) -> Result<(), CareNexusError> {
        Ok(self.clinic.update_medicine(&mut self.records, medicine)?)
    }

    pub fn remove_medicine(&mut self, name: &str) -> Result<Medicine, CareNexusError> {
        Ok(self.clinic.remove_medicine(&mut self.records, name)?)
    }

    // -- Storage ----------------------------------------------------------

    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    /// Closes the portal and hands back its store.
    pub fn into_store(self) -> S {
        self.records.into_store()
    }

    // -- Internals --------------------------------------------------------

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// The signed-in identity, if it has `role`.
    fn require(&self, role: Role) -> Result<SessionIdentity, SessionError> {
        let identity = self.session.current().ok_or(SessionError::NotSignedIn)?;
        if identity.role != role {
            return Err(SessionError::WrongRole {
                expected: role,
                actual: identity.role,
            });
        }
        Ok(identity.clone())
    }

    /// Account and member ID for a patient session. Sessions restored
    /// from before IDs were issued fall back to the account record.
    fn patient_ids(
        &self,
        identity: &SessionIdentity,
    ) -> Result<(AccountId, MemberId), CareNexusError> {
        if let Some(account_id) = identity.account_id {
            return Ok((account_id, identity.member_id.unwrap_or(MemberId::PRIMARY)));
        }
        self.directory
            .find(&self.records, &identity.email)?
            .and_then(|account| account.patient_ids())
            .ok_or_else(|| CareNexusError::MissingPatientIds(identity.email.clone()))
    }

    /// Puts a freshly registered doctor on the roster. The account and
    /// session already exist, so a failure here is logged, not returned.
    fn list_signed_up_doctor(&mut self, email: &str) {
        let listed = match self.directory.find(&self.records, email) {
            Ok(Some(record)) => self
                .clinic
                .list_doctor_for_signup(&mut self.records, &record)
                .map(|_| ()),
            Ok(None) => Ok(()),
            Err(e) => Err(ClinicError::from(e)),
        };
        if let Err(error) = listed {
            tracing::warn!(%email, %error, "signed-up doctor not listed on roster");
        }
    }

    /// Marks the profile complete and picks the next page.
    fn finish_profile(&mut self, identity: &SessionIdentity) -> Result<Route, CareNexusError> {
        let first = !identity.has_completed_profile;
        self.session.mark_profile_completed(&mut self.records)?;
        tracing::info!(email = %identity.email, role = %identity.role, first, "profile saved");

        Ok(if first {
            Route::dashboard_for(identity.role)
        } else {
            Route::profile_for(identity.role).unwrap_or(Route::dashboard_for(identity.role))
        })
    }
}
