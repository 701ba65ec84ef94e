//! Authorization policy engine.
//!
//! Every access decision in the crate flows through [`authorize`] so the
//! owner/member rules live in exactly one place. The engine is a pure
//! function of the actor, the addressed resource, and the operation; it is
//! safe to call any number of times for the same request.

mod engine;

pub use engine::{Operation, PolicyDenial, Resource, authorize};
