//! In-memory user repository and credential store.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::identity::{
    domain::{EmailAddress, User, UserId, Username},
    ports::{
        AccessToken, CredentialStore, CredentialStoreError, CredentialStoreResult, UserRepository,
        UserRepositoryError, UserRepositoryResult,
    },
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    email_index: HashMap<String, UserId>,
    username_index: HashMap<String, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;

        if let Some(email) = user.email() {
            if state.email_index.contains_key(email.as_str()) {
                return Err(UserRepositoryError::DuplicateEmail(email.clone()));
            }
        }
        if state.username_index.contains_key(user.username().as_str()) {
            return Err(UserRepositoryError::DuplicateUsername(user.username().clone()));
        }

        if let Some(email) = user.email() {
            state.email_index.insert(email.as_str().to_owned(), user.id());
        }
        state
            .username_index
            .insert(user.username().as_str().to_owned(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let user = state
            .email_index
            .get(email.as_str())
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let user = state
            .username_index
            .get(username.as_str())
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_many(&self, ids: &[UserId]) -> UserRepositoryResult<Vec<User>> {
        let state = self
            .state
            .read()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }
}

/// Thread-safe in-memory credential store.
///
/// Passwords are stored as salted SHA-256 digests and tokens as opaque
/// UUID-derived strings; the production credential collaborator is free to
/// use any mechanics behind the same port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    state: Arc<RwLock<InMemoryCredentialState>>,
}

#[derive(Debug, Default)]
struct InMemoryCredentialState {
    passwords: HashMap<UserId, PasswordRecord>,
    tokens: HashMap<UserId, AccessToken>,
    token_index: HashMap<String, UserId>,
}

#[derive(Debug, Clone)]
struct PasswordRecord {
    salt: String,
    digest: String,
}

impl InMemoryCredentialStore {
    /// Creates an empty in-memory credential store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn set_password(&self, user: UserId, password: &str) -> CredentialStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest_password(&salt, password);
        state.passwords.insert(user, PasswordRecord { salt, digest });
        Ok(())
    }

    async fn verify_password(&self, user: UserId, password: &str) -> CredentialStoreResult<bool> {
        let state = self.state.read().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .passwords
            .get(&user)
            .is_some_and(|record| digest_password(&record.salt, password) == record.digest))
    }

    async fn issue_or_reuse_token(&self, user: UserId) -> CredentialStoreResult<AccessToken> {
        let mut state = self.state.write().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if let Some(token) = state.tokens.get(&user) {
            return Ok(token.clone());
        }
        let token = AccessToken::new(Uuid::new_v4().simple().to_string());
        state.tokens.insert(user, token.clone());
        state.token_index.insert(token.as_str().to_owned(), user);
        Ok(token)
    }

    async fn resolve_token(&self, token: &str) -> CredentialStoreResult<Option<UserId>> {
        let state = self.state.read().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.token_index.get(token).copied())
    }
}
