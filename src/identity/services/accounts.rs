//! Service layer for registration, login, and token resolution.

use crate::identity::{
    domain::{EmailAddress, IdentityDomainError, User, Username, split_fullname},
    ports::{
        AccessToken, CredentialStore, CredentialStoreError, UserRepository, UserRepositoryError,
    },
};
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    fullname: String,
    email: String,
    password: String,
    repeated_password: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        fullname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        repeated_password: impl Into<String>,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            email: email.into(),
            password: password.into(),
            repeated_password: repeated_password.into(),
        }
    }
}

/// An authenticated user together with their bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// The authenticated account.
    pub user: User,
    /// The issued (or reused) bearer token.
    pub token: AccessToken,
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// Credential store operation failed.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
    /// Password and repeated password differ.
    #[error("Passwords don't match")]
    PasswordMismatch,
    /// Login request without email or password.
    #[error("Must provide email and password")]
    MissingCredentials,
    /// Email or password did not match an account.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Result type for identity service operations.
pub type IdentityServiceResult<T> = Result<T, IdentityServiceError>;

/// Account registration, login, and token resolution service.
pub struct IdentityService<U, C>
where
    U: UserRepository,
    C: CredentialStore,
{
    users: Arc<U>,
    credentials: Arc<C>,
}

impl<U, C> Clone for IdentityService<U, C>
where
    U: UserRepository,
    C: CredentialStore,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<U, C> IdentityService<U, C>
where
    U: UserRepository,
    C: CredentialStore,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(users: Arc<U>, credentials: Arc<C>) -> Self {
        Self { users, credentials }
    }

    /// Registers a new account and issues its bearer token.
    ///
    /// The full name must contain first and last name; the email address must
    /// be unique and becomes the username.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError`] when validation fails, the email is
    /// taken, or persistence fails.
    pub async fn register(&self, request: RegisterRequest) -> IdentityServiceResult<AuthSession> {
        let RegisterRequest {
            fullname,
            email,
            password,
            repeated_password,
        } = request;

        if password.is_empty() {
            return Err(IdentityDomainError::EmptyPassword.into());
        }
        if password != repeated_password {
            return Err(IdentityServiceError::PasswordMismatch);
        }

        let (first_name, last_name) = split_fullname(&fullname)?;
        let address = EmailAddress::new(email)?;
        if self.users.find_by_email(&address).await?.is_some() {
            return Err(UserRepositoryError::DuplicateEmail(address).into());
        }

        let user = User::register(address, first_name, last_name)?;
        self.users.insert(&user).await?;
        self.credentials.set_password(user.id(), &password).await?;
        let token = self.credentials.issue_or_reuse_token(user.id()).await?;
        Ok(AuthSession { user, token })
    }

    /// Authenticates an account by email and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::MissingCredentials`] when either field
    /// is blank, or [`IdentityServiceError::InvalidCredentials`] when the
    /// pair does not match an account. The latter message is deliberately
    /// generic.
    pub async fn login(&self, email: &str, password: &str) -> IdentityServiceResult<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(IdentityServiceError::MissingCredentials);
        }

        let address =
            EmailAddress::new(email).map_err(|_| IdentityServiceError::InvalidCredentials)?;
        let user = self
            .users
            .find_by_email(&address)
            .await?
            .ok_or(IdentityServiceError::InvalidCredentials)?;
        if !self.credentials.verify_password(user.id(), password).await? {
            return Err(IdentityServiceError::InvalidCredentials);
        }

        let token = self.credentials.issue_or_reuse_token(user.id()).await?;
        Ok(AuthSession { user, token })
    }

    /// Creates a guest account with a generated username and issues a token.
    ///
    /// Username generation retries until a collision-free name is found:
    /// each candidate is looked up first, and uniqueness is re-checked at
    /// insert time so concurrent guest logins cannot commit the same name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError`] when persistence fails for any reason
    /// other than a username collision.
    pub async fn guest_login(&self) -> IdentityServiceResult<AuthSession> {
        loop {
            let username = Username::guest();
            if self.users.find_by_username(&username).await?.is_some() {
                continue;
            }
            let user = User::guest(username);
            match self.users.insert(&user).await {
                Ok(()) => {
                    let token = self.credentials.issue_or_reuse_token(user.id()).await?;
                    return Ok(AuthSession { user, token });
                }
                Err(UserRepositoryError::DuplicateUsername(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Looks up the account registered under an email address.
    ///
    /// Returns `Ok(None)` for unknown or malformed addresses.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Users`] when the lookup fails.
    pub async fn email_check(&self, email: &str) -> IdentityServiceResult<Option<User>> {
        let Ok(address) = EmailAddress::new(email) else {
            return Ok(None);
        };
        Ok(self.users.find_by_email(&address).await?)
    }

    /// Resolves a bearer token to the account it was issued for.
    ///
    /// Returns `Ok(None)` for unknown tokens.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError`] when the token or user lookup fails.
    pub async fn authenticate_token(&self, token: &str) -> IdentityServiceResult<Option<User>> {
        let Some(user_id) = self.credentials.resolve_token(token).await? else {
            return Ok(None);
        };
        Ok(self.users.find_by_id(user_id).await?)
    }

    /// Finds a user by identifier.
    ///
    /// Returns `Ok(None)` when no user has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Users`] when the lookup fails.
    pub async fn find_by_id(
        &self,
        id: crate::identity::domain::UserId,
    ) -> IdentityServiceResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }
}
