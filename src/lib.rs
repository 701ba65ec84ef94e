//! Taskboard: multi-tenant kanban backend core.
//!
//! This crate provides the authorization and consistency layer of a kanban
//! service: user accounts and tokens, boards with owner/member access
//! control, tasks with assignee and reviewer references, and author-scoped
//! comments.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`identity`]: Accounts, credentials, and token resolution
//! - [`board`]: Boards, tasks, comments, and their services
//! - [`policy`]: The single authorization decision point
//! - [`api`]: Request handlers and payload shapes

pub mod api;
pub mod board;
pub mod identity;
pub mod policy;
