//! Port contracts for board, task, and comment persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.
//! The relational store behind them is the external collaborator responsible
//! for transactional integrity; cascade semantics are part of the contract.

pub mod boards;
pub mod comments;
pub mod tasks;

pub use boards::{BoardRepository, BoardRepositoryError, BoardRepositoryResult};
pub use comments::{CommentRepository, CommentRepositoryError, CommentRepositoryResult};
pub use tasks::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
