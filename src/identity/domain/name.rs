//! Validated username type and full-name parsing helpers.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a username, matching the `VARCHAR(150)` column.
const MAX_USERNAME_LENGTH: usize = 150;

/// Number of random characters appended to the guest username prefix.
const GUEST_SUFFIX_LENGTH: usize = 8;

/// Validated unique login name for an account.
///
/// Registered accounts use their email address as the username; guest
/// accounts get a generated `guest_` name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// The input is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyUsername`] when the value is empty
    /// after trimming, or [`IdentityDomainError::UsernameTooLong`] when it
    /// exceeds 150 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptyUsername);
        }

        if normalized.len() > MAX_USERNAME_LENGTH {
            return Err(IdentityDomainError::UsernameTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Generates a random guest username of the form `guest_` plus eight
    /// lowercase hex characters.
    ///
    /// Collisions are possible and are resolved by the caller retrying with a
    /// fresh name; uniqueness is enforced at insert time by the repository.
    #[must_use]
    pub fn guest() -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(GUEST_SUFFIX_LENGTH)
            .collect();
        Self(format!("guest_{suffix}"))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Splits a submitted full name into capitalized first and last name parts.
///
/// The name is split at the first whitespace run, so multi-word surnames stay
/// together. Each part has its first character uppercased and the remainder
/// lowercased.
///
/// # Errors
///
/// Returns [`IdentityDomainError::EmptyFullName`] when the value is blank, or
/// [`IdentityDomainError::IncompleteFullName`] when it contains fewer than two
/// whitespace-separated tokens.
pub fn split_fullname(value: &str) -> Result<(String, String), IdentityDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityDomainError::EmptyFullName);
    }

    if trimmed.split_whitespace().count() < 2 {
        return Err(IdentityDomainError::IncompleteFullName);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or_default();
    let last = parts.next().unwrap_or_default().trim_start();
    Ok((capitalize(first), capitalize(last)))
}

/// Uppercases the first character and lowercases the rest of a name part.
fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    chars.next().map_or_else(String::new, |head| {
        head.to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
