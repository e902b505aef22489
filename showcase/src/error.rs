//! Error types for the showcase.

use std::path::PathBuf;
use tamil_tours_runtime::StoreError;
use thiserror::Error;

/// A write operation was rejected before any state changed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Not shaped like an email address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// A text field was shorter than its minimum.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Field name
        field: &'static str,
        /// Minimum length in characters
        min: usize,
    },

    /// Password confirmation differs from the password.
    #[error("Passwords must match")]
    PasswordMismatch,

    /// Registration without accepting the terms.
    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    /// Review star rating outside 1 to 5.
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    /// Tour rating outside 0.0 to 5.0.
    #[error("Tour rating must be between 0.0 and 5.0, got {0}")]
    TourRatingOutOfRange(f64),
}

/// A sort key name that no ordering is registered under.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

/// Failure reported by an authentication gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email and password were not accepted.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account could not be created.
    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),
}

/// The current session may not open a protected area.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// Nobody is signed in.
    #[error("Sign in required")]
    NotAuthenticated,

    /// Signed in, but not as an administrator.
    #[error("Administrator role required")]
    AdminRequired,
}

/// Reading or writing the persisted session token failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("Token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The storage file is not a JSON object of strings.
    #[error("Token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A lock around in-memory storage was poisoned.
    #[error("Token storage lock poisoned")]
    Poisoned,
}

/// The seed fixture could not be loaded.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The fixture file could not be read.
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        /// Fixture path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The fixture is not valid JSON for the seed schema.
    #[error("Failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record in the fixture breaks a validation rule.
    #[error("Invalid seed record {record}: {source}")]
    Invalid {
        /// Which record, e.g. `tour 3`
        record: String,
        /// The broken rule
        source: ValidationError,
    },
}

/// Errors surfaced by [`crate::app::TourismApp`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before it reached a store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The gateway refused the sign-in or registration.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The seed fixture could not be loaded.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// The store runtime failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
