//! The session store: who is signed in right now.
//!
//! The signed-in identity lives in two places that are kept in step: the
//! `current` field here, and the `authUser` record in storage. Every
//! method that changes one changes the other before returning, so a
//! restart followed by [`SessionStore::hydrate`] sees the same session.
//!
//! ## Lifecycle
//!
//! ```text
//! hydrate() ──→ [signed out] ──establish()──→ [incomplete] ──mark_profile_completed()──→ [complete]
//!                    ▲                             │                                          │
//!                    └────────── sign_out() ───────┴──────────────────────────────────────────┘
//! ```
//!
//! `SessionStore` is not shared. It is owned by the portal, which runs
//! one operation at a time.

use carenexus_model::{Codec, Route, SessionIdentity};
use carenexus_storage::{keys, KeyValueStore};

use crate::{profiles, Records, SessionError};

/// Holds the signed-in identity, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    current: Option<SessionIdentity>,
}

impl SessionStore {
    /// Creates an empty store. Call [`hydrate`](Self::hydrate) to pick
    /// up a persisted session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the session persisted under `authUser`.
    ///
    /// The stored completion flag is not trusted: it is recomputed from
    /// the profile records, and the refreshed identity written back if it
    /// changed. An unreadable `authUser` means nobody is signed in.
    pub fn hydrate<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
    ) -> Result<Option<&SessionIdentity>, SessionError> {
        let Some(mut identity) = records.load_or_skip::<SessionIdentity>(keys::AUTH_USER)? else {
            self.current = None;
            return Ok(None);
        };

        let completed =
            profiles::completion_or_incomplete(records, &identity.email, identity.role)?;
        if completed != identity.has_completed_profile {
            tracing::info!(
                email = %identity.email,
                stored = identity.has_completed_profile,
                actual = completed,
                "stale completion flag corrected"
            );
            identity.has_completed_profile = completed;
            records.save(keys::AUTH_USER, &identity)?;
        }

        tracing::debug!(email = %identity.email, role = %identity.role, "session restored");
        Ok(Some(&*self.current.insert(identity)))
    }

    /// The signed-in identity.
    pub fn current(&self) -> Option<&SessionIdentity> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Signs `identity` in, replacing any previous session.
    pub fn establish<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
        identity: SessionIdentity,
    ) -> Result<&SessionIdentity, SessionError> {
        records.save(keys::AUTH_USER, &identity)?;
        tracing::info!(email = %identity.email, role = %identity.role, "session established");
        Ok(&*self.current.insert(identity))
    }

    /// Records that the signed-in user has finished their profile.
    ///
    /// # Errors
    /// [`SessionError::NotSignedIn`] if nobody is signed in.
    pub fn mark_profile_completed<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
    ) -> Result<&SessionIdentity, SessionError> {
        let identity = self.current.as_mut().ok_or(SessionError::NotSignedIn)?;
        identity.has_completed_profile = true;
        records.save(keys::AUTH_USER, &*identity)?;
        Ok(&*identity)
    }

    /// Ends the session and returns the page to show next.
    ///
    /// Signing out when nobody is signed in is not an error.
    pub fn sign_out<S: KeyValueStore, C: Codec>(
        &mut self,
        records: &mut Records<S, C>,
    ) -> Result<Route, SessionError> {
        records.remove(keys::AUTH_USER)?;
        if let Some(identity) = self.current.take() {
            tracing::info!(email = %identity.email, "signed out");
        }
        Ok(Route::Welcome)
    }
}

// =========================================================================
// Tests
// =========================================================================
