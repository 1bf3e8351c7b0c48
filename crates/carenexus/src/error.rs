//! Unified error type for Care Nexus.

use carenexus_clinic::ClinicError;
use carenexus_model::ModelError;
use carenexus_session::SessionError;
use carenexus_storage::StorageError;

/// Top-level error that wraps all crate-specific errors.
///
/// Callers of [`Portal`](crate::Portal) deal with this single type. The
/// `#[from]` attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CareNexusError {
    /// The key-value store failed (I/O, corrupt file).
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A record failed to encode, or a profile form failed validation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Sign-up, sign-in, or session trouble.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A roster, pharmacy, or appointment operation failed.
    #[error(transparent)]
    Clinic(#[from] ClinicError),

    /// Family members can only be added once the patient profile exists.
    #[error("Please complete your profile before adding family members.")]
    ProfileRequired,

    /// A patient session whose account has no account or member ID.
    #[error("patient account {0} has no account id")]
    MissingPatientIds(String),
}

impl CareNexusError {
    /// Returns `true` when the message is meant for the person at the
    /// form: wrong password, missing field, and the like.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Session(e) => e.is_user_facing(),
            Self::Model(ModelError::InvalidProfile(_)) | Self::ProfileRequired => true,
            _ => false,
        }
    }
}
