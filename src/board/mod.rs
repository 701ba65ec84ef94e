//! Boards, tasks, and comments: entities, persistence ports, adapters, and
//! the services that orchestrate them.
//!
//! The module follows a hexagonal layout: `domain` holds the aggregates and
//! their invariants, `ports` the persistence contracts, `adapters` the
//! in-memory and `PostgreSQL` implementations, and `services` the
//! authorization-aware workflows.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
