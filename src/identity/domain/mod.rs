//! Domain model for user identity and account naming.
//!
//! The identity domain models user accounts, their validated naming and
//! email types, and the full-name parsing rules applied at registration.
//! All infrastructure concerns are kept outside the domain boundary.

mod email;
mod error;
mod ids;
mod name;
mod user;

pub use email::EmailAddress;
pub use error::IdentityDomainError;
pub use ids::UserId;
pub use name::{Username, split_fullname};
pub use user::{PersistedUserData, User};
