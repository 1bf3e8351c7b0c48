//! Record model for Care Nexus.
//!
//! This crate defines everything the portal writes into storage and the
//! vocabulary the rest of the workspace speaks:
//!
//! - **Identity** ([`Role`], [`AccountId`], [`MemberId`]): who someone is
//!   and how their records are numbered.
//! - **Records** ([`AccountRecord`], [`SessionIdentity`], [`PatientProfile`],
//!   [`DoctorProfile`]): the persisted shapes, with serde schemas so
//!   malformed data is rejected on load instead of half-read.
//! - **Routes** ([`Route`]): the navigation targets returned by sign-in,
//!   sign-up, sign-out and the profile gate.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how records become the
//!   strings the key-value store holds.
//!
//! ```text
//! Storage (strings) → Model (records) → Session (directory, gate, store)
//! ```

mod account;
mod codec;
mod error;
mod ids;
mod profile;
mod role;

pub use account::{AccountDetails, AccountRecord, SessionIdentity};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ModelError;
pub use ids::{AccountId, MemberId};
pub use profile::{
    DoctorDetails, DoctorProfile, FamilyMember, FamilyMemberDraft, PatientProfile,
    PersonalDetails,
};
pub use role::{Role, Route};
