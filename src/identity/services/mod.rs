//! Orchestration services for identity management.

mod accounts;

pub use accounts::{
    AuthSession, IdentityService, IdentityServiceError, IdentityServiceResult, RegisterRequest,
};
