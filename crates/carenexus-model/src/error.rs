//! Error types for the model layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ModelError` always means a record could not be encoded, decoded, or
//! validated; it never means storage or authentication trouble.

/// Errors that can occur while handling records.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Serialization failed (turning a record into stored text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing required fields,
    /// or values of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A profile form failed validation. The message is user-facing.
    #[error("{0}")]
    InvalidProfile(String),

    /// A member ID was not a number between 001 and 999.
    #[error("invalid member id: {0:?}")]
    InvalidMemberId(String),

    /// A stored account ID was a string that isn't a number.
    #[error("invalid account id: {0:?}")]
    InvalidAccountId(String),

    /// The account already uses every member ID up to 999.
    #[error("no member ids left on this account")]
    MemberLimit,
}
