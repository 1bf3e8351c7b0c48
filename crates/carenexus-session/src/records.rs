//! Typed access to the key-value store.
//!
//! [`Records`] pairs a [`KeyValueStore`] with a [`Codec`] so the rest of
//! the crate reads and writes records instead of strings. It is the one
//! place where a decode failure becomes [`SessionError::PersistenceParse`].

use carenexus_model::{Codec, JsonCodec};
use carenexus_storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::SessionError;

/// A key-value store that speaks records.
#[derive(Debug)]
pub struct Records<S, C = JsonCodec> {
    store: S,
    codec: C,
}

impl<S: KeyValueStore> Records<S> {
    /// Wraps `store` with the JSON codec.
    pub fn new(store: S) -> Self {
        Self::with_codec(store, JsonCodec)
    }
}

impl<S: KeyValueStore, C: Codec> Records<S, C> {
    pub fn with_codec(store: S, codec: C) -> Self {
        Self { store, codec }
    }

    /// Loads the record stored under `key`.
    ///
    /// # Errors
    /// - [`SessionError::PersistenceParse`] if the stored text doesn't
    ///   decode as `T`
    /// - [`SessionError::Storage`] if the store itself fails
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let Some(text) = self.store.get(key)? else {
            return Ok(None);
        };
        self.codec
            .decode(&text)
            .map(Some)
            .map_err(|source| SessionError::PersistenceParse {
                key: key.to_string(),
                source,
            })
    }

    /// Like [`load`](Self::load), but an unreadable record counts as
    /// absent. The failure is logged, never returned.
    pub fn load_or_skip<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        match self.load(key) {
            Err(SessionError::PersistenceParse { key, source }) => {
                tracing::warn!(%key, error = %source, "ignoring unreadable record");
                Ok(None)
            }
            other => other,
        }
    }

    /// Encodes `value` and stores it under `key`.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), SessionError> {
        let text = self.codec.encode(value)?;
        self.store.set(key, text)?;
        Ok(())
    }

    /// Removes whatever is stored under `key`.
    pub fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.store.remove(key)?;
        Ok(())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store, for raw writes.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwraps the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}
