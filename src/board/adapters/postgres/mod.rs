//! `PostgreSQL` persistence adapter for boards, tasks, and comments.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{KanbanPgPool, PostgresKanbanRepository};
