//! User aggregate root.

use super::{EmailAddress, IdentityDomainError, UserId, Username};
use serde::{Deserialize, Serialize};

/// User account referenced by boards, tasks, and comments.
///
/// Users are created at registration or guest login and are never deleted by
/// this core; other aggregates hold weak references to them for authorization
/// lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: Option<EmailAddress>,
    first_name: String,
    last_name: String,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted login name.
    pub username: Username,
    /// Persisted email address; guest accounts have none.
    pub email: Option<EmailAddress>,
    /// Persisted first name; may be blank.
    pub first_name: String,
    /// Persisted last name; may be blank.
    pub last_name: String,
}

impl User {
    /// Creates a registered account with the email address as its username.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError`] when the derived username fails
    /// validation.
    pub fn register(
        email: EmailAddress,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, IdentityDomainError> {
        let username = Username::new(email.as_str())?;
        Ok(Self {
            id: UserId::new(),
            username,
            email: Some(email),
            first_name: first_name.into(),
            last_name: last_name.into(),
        })
    }

    /// Creates a guest account with a generated username and no email.
    #[must_use]
    pub fn guest(username: Username) -> Self {
        Self {
            id: UserId::new(),
            username,
            email: None,
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address, if the account has one.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns the first name; blank for guest accounts.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name; blank for guest accounts.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the display name: first and last name joined and trimmed,
    /// falling back to the username when both parts are blank.
    #[must_use]
    pub fn fullname(&self) -> String {
        let joined = format!("{} {}", self.first_name, self.last_name);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            self.username.to_string()
        } else {
            trimmed.to_owned()
        }
    }
}
