//! Infrastructure adapters implementing the board persistence ports.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryKanbanStore;
pub use postgres::{KanbanPgPool, PostgresKanbanRepository};
