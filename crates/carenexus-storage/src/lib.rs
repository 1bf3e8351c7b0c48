//! Storage abstraction layer for Care Nexus.
//!
//! Everything the portal remembers lives in a flat string-to-string map,
//! the same shape as a browser's `localStorage`. This crate provides the
//! [`KeyValueStore`] trait that abstracts over where that map lives, and
//! two implementations:
//!
//! - [`MemoryStore`]: a plain in-process map (tests, ephemeral demos)
//! - [`FileStore`]: the whole map as one JSON object on disk
//!
//! The [`keys`] module names every key the portal reads or writes.
//!
//! # Feature Flags
//!
//! - `file` (default): JSON-file backed store via `serde_json`, with
//!   `tracing` events for opens and failed writes

mod error;
#[cfg(feature = "file")]
mod file;
pub mod keys;
mod memory;

pub use error::StorageError;
#[cfg(feature = "file")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// A persisted map from string keys to string values.
///
/// Reads take `&self`, writes take `&mut self`: the store has exactly one
/// owner (the portal) and every read-modify-write happens synchronously
/// inside one call, so no interior locking is needed.
///
/// Implementations decide durability. [`MemoryStore`] forgets everything
/// when dropped; [`FileStore`] writes through to disk on every mutation.
pub trait KeyValueStore: Send + 'static {
    /// Returns the value stored under `key`, or `Ok(None)` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Returns every key currently stored, in ascending order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Returns `true` if a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
