//! The clinic catalog for Care Nexus.
//!
//! Everything the dashboards list that isn't a user account: the doctor
//! roster, the pharmacy stock, and the appointment book. Each collection
//! is persisted under its own key and seeded with demo data the first
//! time the portal runs.
//!
//! # Key types
//!
//! - [`Clinic`]: the loaded catalog and every operation on it
//! - [`CatalogSeed`]: what an empty store starts with
//! - [`Doctor`], [`Medicine`], [`Appointment`], [`PastAppointment`]: the records
//!
//! Removing a doctor also removes their sign-in account, which is why
//! this crate sits above the session layer.

mod catalog;
mod clinic;
mod error;
mod seed;

pub use catalog::{Appointment, Doctor, Medicine, PastAppointment, Report};
pub use clinic::Clinic;
pub use error::ClinicError;
pub use seed::CatalogSeed;
