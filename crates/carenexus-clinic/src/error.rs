//! Error types for the clinic catalog.

use carenexus_session::SessionError;

/// Errors that can occur while changing the clinic catalog.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    /// No roster entry has this handle.
    #[error("doctor {0:?} not found")]
    DoctorNotFound(String),

    /// A roster entry with this handle already exists.
    #[error("doctor {0:?} is already listed")]
    DuplicateDoctor(String),

    /// No medicine has this name.
    #[error("medicine {0:?} not found")]
    MedicineNotFound(String),

    /// A medicine with this name already exists.
    #[error("medicine {0:?} is already stocked")]
    DuplicateMedicine(String),

    /// No upcoming appointment at this position.
    #[error("no upcoming appointment at position {0}")]
    AppointmentNotFound(usize),

    /// Reading or writing the catalog failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}
