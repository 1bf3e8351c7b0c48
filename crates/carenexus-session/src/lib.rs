//! Authentication and session state for Care Nexus.
//!
//! This crate is the core of the portal:
//!
//! 1. **Credential directory**: registering accounts and checking
//!    sign-ins ([`CredentialDirectory`])
//! 2. **Session store**: who is signed in right now, rehydrated from
//!    storage at startup ([`SessionStore`])
//! 3. **Profile book**: profile records and the completion rule
//!    ([`profiles`])
//! 4. **Profile gate**: the redirect rule every protected page runs
//!    ([`gate`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Clinic / Portal (above)  ← call register/authenticate, read the session
//!     ↕
//! Session Layer (this crate)  ← accounts, identity, completion gating
//!     ↕
//! Model + Storage (below)  ← records, codecs, key-value store
//! ```
//!
//! Everything here is synchronous and single-owner: each operation reads,
//! modifies and writes the store within one call.

mod directory;
mod error;
pub mod gate;
mod password;
pub mod profiles;
mod records;
mod store;

pub use directory::{AuthOutcome, CredentialDirectory, DirectoryConfig, NewAccount};
pub use error::SessionError;
pub use gate::GateDecision;
pub use password::{PasswordHasher, SaltedSha256};
pub use records::Records;
pub use store::SessionStore;
