//! Validated title type shared by boards and tasks.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a title, matching the `VARCHAR(255)` column.
const MAX_TITLE_LENGTH: usize = 255;

/// Validated, trimmed board or task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the value is empty after
    /// trimming, or [`BoardDomainError::TitleTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }

        if normalized.len() > MAX_TITLE_LENGTH {
            return Err(BoardDomainError::TitleTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
