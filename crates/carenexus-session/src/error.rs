//! Error types for the session layer.

use carenexus_model::{ModelError, Role};
use carenexus_storage::StorageError;

/// Errors that can occur during sign-up, sign-in, and session handling.
///
/// The first four variants are the everyday ones. Their `Display` text is
/// exactly what the sign-in and sign-up forms show under the inputs.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Sign-up with an email that is already on file (under any role).
    #[error("Email already registered. Please sign in.")]
    DuplicateEmail(String),

    /// Sign-in with an email nobody registered.
    #[error("Email not registered. Please sign up first.")]
    UnknownEmail(String),

    /// Sign-in through the wrong portal: the email exists under `actual`.
    #[error("This email is registered as a {actual}. Please use the correct role.")]
    RoleMismatch { email: String, actual: Role },

    /// The password doesn't match the account.
    #[error("Invalid password.")]
    InvalidPassword,

    /// A sign-up form was missing required fields.
    #[error("{0}")]
    InvalidRegistration(String),

    /// The operation needs a signed-in user and there is none.
    #[error("no user is signed in")]
    NotSignedIn,

    /// The operation belongs to another role's portal.
    #[error("this action needs a {expected} account, but a {actual} is signed in")]
    WrongRole { expected: Role, actual: Role },

    /// Every patient account number up to the largest one is taken.
    #[error("no patient account numbers are left to allocate")]
    AccountIdsExhausted,

    /// A stored record exists but doesn't match its schema.
    ///
    /// Read-only callers recover locally (log it and treat the record as
    /// absent). Callers about to rewrite the record return it instead.
    #[error("stored record {key:?} is unreadable: {source}")]
    PersistenceParse {
        key: String,
        #[source]
        source: ModelError,
    },

    /// The key-value store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A record failed to encode or a profile form failed validation.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SessionError {
    /// Returns `true` for errors caused by what the user typed, as opposed
    /// to storage or encoding trouble.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEmail(_)
                | Self::UnknownEmail(_)
                | Self::RoleMismatch { .. }
                | Self::InvalidPassword
                | Self::InvalidRegistration(_)
                | Self::Model(ModelError::InvalidProfile(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mismatch_message_names_actual_role() {
        let err = SessionError::RoleMismatch {
            email: "a@x.com".into(),
            actual: Role::Patient,
        };
        assert_eq!(
            err.to_string(),
            "This email is registered as a patient. Please use the correct role."
        );
    }

    #[test]
    fn test_form_messages_match_portal_copy() {
        assert_eq!(
            SessionError::DuplicateEmail("a@x.com".into()).to_string(),
            "Email already registered. Please sign in."
        );
        assert_eq!(
            SessionError::UnknownEmail("a@x.com".into()).to_string(),
            "Email not registered. Please sign up first."
        );
        assert_eq!(SessionError::InvalidPassword.to_string(), "Invalid password.");
    }

    #[test]
    fn test_profile_validation_passes_message_through() {
        let err: SessionError =
            ModelError::InvalidProfile("Please select your gender.".into()).into();
        assert_eq!(err.to_string(), "Please select your gender.");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_not_signed_in_is_not_user_facing() {
        assert!(!SessionError::NotSignedIn.is_user_facing());
    }
}
