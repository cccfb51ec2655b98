//! Error types for ideabox.

use crate::models::NoteId;
use thiserror::Error;

/// Result type alias using ideabox's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ideabox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Operation attempted without a signed-in identity.
    #[error("Please sign in to {0}.")]
    SignInRequired(&'static str),

    /// Authentication failed (bad credentials, duplicate account, ...).
    #[error("{0}")]
    Auth(String),

    /// Input rejected before any store call.
    #[error("{0}")]
    Validation(String),

    /// The target note does not exist or is not owned by the caller.
    /// The store reports both the same way: zero affected rows.
    #[error("Note {0} not found")]
    NoteNotFound(NoteId),

    /// Database operation failed (wraps rusqlite::Error).
    #[error("Storage error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Stored tag array could not be decoded.
    #[error("Corrupt tag data: {0}")]
    TagData(#[from] serde_json::Error),

    /// A stored enum column holds an unknown value.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Stored timestamp is out of range.
    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] time::error::ComponentRange),

    /// Media upload or blob access failed.
    #[error("Media error: {0}")]
    Media(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by user input or missing sign-in, as
    /// opposed to internal/storage failures. The CLI maps user errors
    /// to exit code 1 and internal errors to exit code 2.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::SignInRequired(_)
                | Error::Auth(_)
                | Error::Validation(_)
                | Error::NoteNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_required_names_the_action() {
        let err = Error::SignInRequired("save notes");
        assert_eq!(err.to_string(), "Please sign in to save notes.");
    }

    #[test]
    fn user_errors_are_classified() {
        assert!(Error::Validation("empty title".into()).is_user_error());
        assert!(Error::NoteNotFound(NoteId::new(5)).is_user_error());
        assert!(!Error::Store(rusqlite::Error::InvalidQuery).is_user_error());
    }
}
