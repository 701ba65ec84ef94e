//! Request handlers and payload shapes for the HTTP surface.
//!
//! The HTTP framework itself is an external collaborator: handlers here are
//! plain async functions taking a service, the authenticated actor, and a
//! deserialized body, returning a serializable payload or an [`ApiError`]
//! carrying its status code and JSON body.

pub mod auth;
pub mod boards;
pub mod comments;
pub mod error;
pub mod payloads;
pub mod tasks;

pub use error::{ApiError, ApiResult};
