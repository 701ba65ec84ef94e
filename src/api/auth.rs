//! Handlers for registration, login, guest login, token authentication, and
//! email lookup.

use crate::api::error::{ApiError, ApiResult};
use crate::api::payloads::{
    AuthResponse, GuestLoginResponse, LoginBody, RegistrationBody, UserMini,
};
use crate::identity::domain::UserId;
use crate::identity::ports::{CredentialStore, UserRepository};
use crate::identity::services::{IdentityService, RegisterRequest};

/// Scheme prefix expected in the `Authorization` header.
const TOKEN_SCHEME: &str = "Token ";

/// Registers a new account and returns its session.
///
/// # Errors
///
/// Returns field-scoped validation errors for bad input and a duplicate
/// email, all as 400.
pub async fn register<U, C>(
    service: &IdentityService<U, C>,
    body: RegistrationBody,
) -> ApiResult<AuthResponse>
where
    U: UserRepository,
    C: CredentialStore,
{
    let session = service
        .register(RegisterRequest::new(
            body.fullname,
            body.email,
            body.password,
            body.repeated_password,
        ))
        .await?;
    Ok(AuthResponse::from_session(&session))
}

/// Authenticates by email and password.
///
/// # Errors
///
/// Returns 400 for missing or invalid credentials; never 401.
pub async fn login<U, C>(
    service: &IdentityService<U, C>,
    body: LoginBody,
) -> ApiResult<AuthResponse>
where
    U: UserRepository,
    C: CredentialStore,
{
    let session = service.login(&body.email, &body.password).await?;
    Ok(AuthResponse::from_session(&session))
}

/// Creates a guest account and returns its session.
///
/// # Errors
///
/// Returns 500 when persistence fails.
pub async fn guest_login<U, C>(service: &IdentityService<U, C>) -> ApiResult<GuestLoginResponse>
where
    U: UserRepository,
    C: CredentialStore,
{
    let session = service.guest_login().await?;
    Ok(GuestLoginResponse::from_session(&session))
}

/// Resolves the `Authorization` header to the acting user.
///
/// # Errors
///
/// Returns 400 when the header is missing, malformed, or carries an unknown
/// token.
pub async fn authenticate<U, C>(
    service: &IdentityService<U, C>,
    authorization: Option<&str>,
) -> ApiResult<UserId>
where
    U: UserRepository,
    C: CredentialStore,
{
    let header = authorization.ok_or_else(|| {
        ApiError::AuthenticationFailed("Authentication credentials were not provided.".to_owned())
    })?;
    let token = header
        .strip_prefix(TOKEN_SCHEME)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::AuthenticationFailed("Invalid token.".to_owned()))?;

    let user = service
        .authenticate_token(token)
        .await?
        .ok_or_else(|| ApiError::AuthenticationFailed("Invalid token.".to_owned()))?;
    Ok(user.id())
}

/// Looks up the account registered under an email address.
///
/// # Errors
///
/// Returns 400 when the query parameter is missing and 404 when no account
/// has the address.
pub async fn email_check<U, C>(
    service: &IdentityService<U, C>,
    email: Option<&str>,
) -> ApiResult<UserMini>
where
    U: UserRepository,
    C: CredentialStore,
{
    let email =
        email.ok_or_else(|| ApiError::Detail("Email query parameter is required.".to_owned()))?;
    let user = service
        .email_check(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Email not found.".to_owned()))?;
    Ok(UserMini::from_user(&user))
}
