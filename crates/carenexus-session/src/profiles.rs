//! The profile book: loading and saving profile records, and deciding
//! whether someone has finished theirs.
//!
//! A profile counts as complete only when a record for that role and
//! email exists **and** its `completed` flag is set. Admins have no
//! profile and always count as complete.

use carenexus_model::{Codec, DoctorProfile, PatientProfile, Role};
use carenexus_storage::{keys, KeyValueStore};

use crate::{Records, SessionError};

/// Loads the patient profile for `email`.
pub fn load_patient<S: KeyValueStore, C: Codec>(
    records: &Records<S, C>,
    email: &str,
) -> Result<Option<PatientProfile>, SessionError> {
    records.load(&keys::patient_profile(email))
}

/// Loads the doctor profile for `email`.
pub fn load_doctor<S: KeyValueStore, C: Codec>(
    records: &Records<S, C>,
    email: &str,
) -> Result<Option<DoctorProfile>, SessionError> {
    records.load(&keys::doctor_profile(email))
}

/// Stores `profile` under its own email.
pub fn save_patient<S: KeyValueStore, C: Codec>(
    records: &mut Records<S, C>,
    profile: &PatientProfile,
) -> Result<(), SessionError> {
    records.save(&keys::patient_profile(&profile.email), profile)?;
    tracing::debug!(email = %profile.email, "patient profile saved");
    Ok(())
}

/// Stores `profile` under its own email.
pub fn save_doctor<S: KeyValueStore, C: Codec>(
    records: &mut Records<S, C>,
    profile: &DoctorProfile,
) -> Result<(), SessionError> {
    records.save(&keys::doctor_profile(&profile.email), profile)?;
    tracing::debug!(email = %profile.email, "doctor profile saved");
    Ok(())
}

/// Returns `true` if `email` has a completed profile for `role`.
///
/// # Errors
/// [`SessionError::PersistenceParse`] if the profile record is unreadable.
pub fn is_completed<S: KeyValueStore, C: Codec>(
    records: &Records<S, C>,
    email: &str,
    role: Role,
) -> Result<bool, SessionError> {
    Ok(match role {
        Role::Patient => load_patient(records, email)?.is_some_and(|p| p.completed),
        Role::Doctor => load_doctor(records, email)?.is_some_and(|p| p.completed),
        Role::Admin => true,
    })
}

/// Like [`is_completed`], but an unreadable profile counts as
/// incomplete so the user is sent back to fill it in again.
pub fn completion_or_incomplete<S: KeyValueStore, C: Codec>(
    records: &Records<S, C>,
    email: &str,
    role: Role,
) -> Result<bool, SessionError> {
    match is_completed(records, email, role) {
        Err(SessionError::PersistenceParse { key, source }) => {
            tracing::warn!(%key, error = %source, "profile unreadable, treating as incomplete");
            Ok(false)
        }
        other => other,
    }
}
