//! Error types for identity domain validation.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The submitted full name is blank.
    #[error("Full name is required.")]
    EmptyFullName,

    /// The submitted full name has fewer than two tokens.
    #[error("Please enter your full name (first and last name).")]
    IncompleteFullName,

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username exceeds the 150-character storage limit.
    #[error("username exceeds 150 character limit: {0}")]
    UsernameTooLong(String),

    /// The email address is malformed or too long.
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    /// The submitted password is empty.
    #[error("Password is required.")]
    EmptyPassword,
}
