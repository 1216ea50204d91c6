//! Error taxonomy for stampcal operations.
//!
//! Every failure that leaves the command executor carries exactly one
//! `ErrorKind`. The kind picks fatal vs. recoverable handling internally;
//! the UI only ever sees the display string, via the warning channel.

use thiserror::Error;

/// Authentication and session failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No usable session")]
    SessionUnavailable,

    #[error("Your session is no longer valid")]
    Unauthorized,
}

/// Record and blob storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("A file with this name already exists")]
    DuplicateFile,

    #[error("This library is already connected")]
    DuplicateLibrary,

    #[error("Record not found")]
    NotFound,

    #[error("Image library not found: {0}")]
    LibraryNotFound(String),
}

/// The closed set of error kinds the core can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Network error, please try again")]
    Network,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Something went wrong: {0}")]
    Unknown(String),
}

impl ErrorKind {
    /// Fatal kinds invalidate the session and force sign-out; everything
    /// else is surfaced as a dismissable warning.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::Auth(AuthError::Unauthorized)
                | ErrorKind::Auth(AuthError::SessionUnavailable)
        )
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        ErrorKind::Validation(reason.into())
    }
}

/// Result type alias for stampcal core operations.
pub type CoreResult<T> = Result<T, ErrorKind>;
