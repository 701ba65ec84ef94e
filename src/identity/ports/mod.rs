//! Port contracts for identity and credential management.
//!
//! Ports define infrastructure-agnostic interfaces used by identity services.

pub mod credentials;
pub mod repository;

pub use credentials::{AccessToken, CredentialStore, CredentialStoreError, CredentialStoreResult};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
