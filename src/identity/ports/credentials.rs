//! Credential store port: passwords and bearer tokens.
//!
//! Password hashing and token generation mechanics belong to the external
//! credential collaborator; the core only consumes this contract.

use crate::identity::domain::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for credential store operations.
pub type CredentialStoreResult<T> = Result<T, CredentialStoreError>;

/// Opaque bearer token issued for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps an issued token string.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credential persistence and verification contract.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stores the password credential for a user.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the credential cannot be stored.
    async fn set_password(&self, user: UserId, password: &str) -> CredentialStoreResult<()>;

    /// Checks a password against the stored credential.
    ///
    /// Users without a stored credential (guest accounts) never verify.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the credential cannot be read.
    async fn verify_password(&self, user: UserId, password: &str) -> CredentialStoreResult<bool>;

    /// Returns the user's token, issuing one on first use.
    ///
    /// Idempotent per user: repeated calls return the same token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the token cannot be issued.
    async fn issue_or_reuse_token(&self, user: UserId) -> CredentialStoreResult<AccessToken>;

    /// Resolves a presented token to the user it was issued for.
    ///
    /// Returns `None` for unknown tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the token cannot be looked up.
    async fn resolve_token(&self, token: &str) -> CredentialStoreResult<Option<UserId>>;
}

/// Errors returned by credential store implementations.
#[derive(Debug, Clone, Error)]
pub enum CredentialStoreError {
    /// Persistence-layer failure.
    #[error("credential store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CredentialStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
