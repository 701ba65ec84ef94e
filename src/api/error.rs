//! API error type and the status mapping from service errors.
//!
//! Handlers return [`ApiError`]; the HTTP collaborator turns it into a
//! response via [`ApiError::status`] and [`ApiError::body`]. Authentication
//! failures map to 400, not 401, to match the published contract.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use thiserror::Error;

use crate::board::services::{BoardServiceError, CommentServiceError, TaskServiceError};
use crate::identity::domain::IdentityDomainError;
use crate::identity::ports::repository::UserRepositoryError;
use crate::identity::services::IdentityServiceError;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error surface of the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The addressed entity does not exist. Maps to 404.
    #[error("{0}")]
    NotFound(String),

    /// The policy engine refused the operation. Maps to 403.
    #[error("{0}")]
    PermissionDenied(String),

    /// Field-scoped input validation failure. Maps to 400.
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    /// Input failure without a field to hang it on. Maps to 400.
    #[error("{0}")]
    Detail(String),

    /// Login or token resolution failure. Maps to 400, not 401.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// Unexpected failure in a collaborator. Maps to 500.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Builds a validation error scoped to a single field.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_owned(), message.into());
        Self::Validation(fields)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::PermissionDenied(_) => 403,
            Self::Validation(_) | Self::Detail(_) | Self::AuthenticationFailed(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the JSON body for this error.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::Validation(fields) => json!(fields),
            Self::NotFound(detail)
            | Self::PermissionDenied(detail)
            | Self::Detail(detail)
            | Self::AuthenticationFailed(detail)
            | Self::Internal(detail) => json!({ "detail": detail }),
        }
    }
}

impl From<IdentityServiceError> for ApiError {
    fn from(err: IdentityServiceError) -> Self {
        match err {
            IdentityServiceError::Domain(domain) => domain.into(),
            IdentityServiceError::Users(UserRepositoryError::DuplicateEmail(_)) => {
                Self::field("email", "Email already exists")
            }
            IdentityServiceError::PasswordMismatch => {
                Self::field("repeated_password", "Passwords don't match")
            }
            IdentityServiceError::MissingCredentials => {
                Self::Detail("Must provide email and password".to_owned())
            }
            IdentityServiceError::InvalidCredentials => {
                Self::AuthenticationFailed("Invalid credentials".to_owned())
            }
            IdentityServiceError::Users(other) => Self::Internal(other.to_string()),
            IdentityServiceError::Credentials(other) => Self::Internal(other.to_string()),
        }
    }
}

impl From<IdentityDomainError> for ApiError {
    fn from(err: IdentityDomainError) -> Self {
        match &err {
            IdentityDomainError::EmptyFullName | IdentityDomainError::IncompleteFullName => {
                Self::field("fullname", err.to_string())
            }
            IdentityDomainError::EmptyPassword => Self::field("password", err.to_string()),
            IdentityDomainError::InvalidEmail(_)
            | IdentityDomainError::EmptyUsername
            | IdentityDomainError::UsernameTooLong(_) => Self::field("email", err.to_string()),
        }
    }
}

impl From<BoardServiceError> for ApiError {
    fn from(err: BoardServiceError) -> Self {
        match err {
            BoardServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            BoardServiceError::Denied(denial) => Self::PermissionDenied(denial.to_string()),
            BoardServiceError::UnknownMember(_) => Self::field("members", err.to_string()),
            BoardServiceError::Domain(domain) => Self::field("title", domain.to_string()),
            BoardServiceError::OwnerMissing(_)
            | BoardServiceError::Boards(_)
            | BoardServiceError::Tasks(_)
            | BoardServiceError::Comments(_)
            | BoardServiceError::Users(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::BoardNotFound(_) | TaskServiceError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            TaskServiceError::Denied(denial) => Self::PermissionDenied(denial.to_string()),
            TaskServiceError::AssigneeNotFound(_) => Self::field("assignee_id", err.to_string()),
            TaskServiceError::ReviewerNotFound(_) => Self::field("reviewer_id", err.to_string()),
            TaskServiceError::AssigneeNotOnBoard(_) | TaskServiceError::ReviewerNotOnBoard(_) => {
                Self::PermissionDenied(err.to_string())
            }
            TaskServiceError::BoardChangeRejected => Self::Detail(err.to_string()),
            TaskServiceError::Domain(domain) => Self::field("title", domain.to_string()),
            TaskServiceError::Boards(_)
            | TaskServiceError::Tasks(_)
            | TaskServiceError::Comments(_)
            | TaskServiceError::Users(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::TaskNotFound(_)
            | CommentServiceError::BoardNotFound(_)
            | CommentServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            CommentServiceError::Denied(denial) => Self::PermissionDenied(denial.to_string()),
            CommentServiceError::Domain(domain) => Self::field("content", domain.to_string()),
            CommentServiceError::Boards(_)
            | CommentServiceError::Tasks(_)
            | CommentServiceError::Comments(_)
            | CommentServiceError::Users(_) => Self::Internal(err.to_string()),
        }
    }
}
