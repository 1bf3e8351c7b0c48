//! # Care Nexus
//!
//! The authentication and profile-completion core of a multi-role clinic
//! portal: patients, doctors, and admins sign up, sign in, are routed by
//! role, and are held at their profile form until it is complete.
//!
//! Everything is persisted in a key-value store ([`MemoryStore`] for
//! tests, [`FileStore`] for a JSON file on disk) so a restarted portal
//! picks up exactly where it left off.
//!
//! ## Quick Start
//!
//! ```rust
//! use carenexus::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), CareNexusError> {
//! let mut portal = PortalBuilder::new().build(MemoryStore::new())?;
//!
//! let outcome = portal
//!     .sign_up(NewAccount {
//!         name: "Meera".into(),
//!         email: "meera@example.com".into(),
//!         password: "secret".into(),
//!         details: AccountDetails::patient(),
//!     })
//!     .await?;
//!
//! // New accounts land on their profile form, and stay gated there.
//! assert_eq!(outcome.target, Route::PatientProfile);
//! assert_eq!(
//!     portal.guard("/dashboard"),
//!     GateDecision::Redirect(Route::PatientProfile)
//! );
//! # Ok(())
//! # }
//! ```
//!
//! [`MemoryStore`]: carenexus_storage::MemoryStore
//! [`FileStore`]: carenexus_storage::FileStore

mod config;
mod error;
mod portal;

pub use config::PortalConfig;
pub use error::CareNexusError;
pub use portal::{Portal, PortalBuilder};

pub use carenexus_clinic as clinic;
pub use carenexus_model as model;
pub use carenexus_session as session;
pub use carenexus_storage as storage;

/// Convenience re-exports for embedding the portal.
///
/// ```rust
/// use carenexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{CareNexusError, Portal, PortalBuilder, PortalConfig};

    pub use carenexus_clinic::{Appointment, Clinic, ClinicError, Doctor, Medicine};
    pub use carenexus_model::{
        AccountDetails, DoctorDetails, FamilyMemberDraft, MemberId, PersonalDetails, Role, Route,
        SessionIdentity,
    };
    pub use carenexus_session::{
        AuthOutcome, DirectoryConfig, GateDecision, NewAccount, SessionError,
    };
    pub use carenexus_storage::{FileStore, KeyValueStore, MemoryStore};
}
