//! Codec trait and implementations for turning records into stored text.
//!
//! The key-value store only holds strings. A codec decides how a record
//! becomes one of those strings and back. The session layer is generic
//! over [`Codec`], so a different encoding can be swapped in without
//! touching the directory or session logic.

use serde::{de::DeserializeOwned, Serialize};

use crate::ModelError;

/// Encodes records to stored text and decodes them back.
///
/// `decode` is where schema validation happens: a value that doesn't
/// match the target type's serde shape is rejected with
/// [`ModelError::Decode`] rather than partially read.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into text.
    ///
    /// # Errors
    /// Returns `ModelError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ModelError>;

    /// Deserializes text back into a value.
    ///
    /// # Errors
    /// Returns `ModelError::Decode` if the text is malformed or doesn't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ModelError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON keeps the persisted layout readable in a text editor, which is
/// the whole point of a file-backed demo store.
///
/// ## Example
///
/// ```rust
/// use carenexus_model::{Codec, JsonCodec, Role, SessionIdentity};
///
/// let codec = JsonCodec;
/// let identity = SessionIdentity {
///     name: "Asha".into(),
///     email: "asha@example.com".into(),
///     role: Role::Doctor,
///     has_completed_profile: false,
///     account_id: None,
///     member_id: None,
/// };
///
/// let text = codec.encode(&identity).unwrap();
/// assert!(text.contains("\"hasCompletedProfile\":false"));
///
/// let decoded: SessionIdentity = codec.decode(&text).unwrap();
/// assert_eq!(decoded, identity);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ModelError> {
        serde_json::to_string(value).map_err(ModelError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ModelError> {
        serde_json::from_str(text).map_err(ModelError::Decode)
    }
}
