//! Domain model for boards, tasks, and comments.
//!
//! Boards exclusively own their tasks and tasks their comments (cascade on
//! delete); users are only referenced, never owned. All infrastructure
//! concerns are kept outside the domain boundary.

mod board;
mod comment;
mod error;
mod ids;
mod task;
mod title;

pub use board::{Board, PersistedBoardData};
pub use comment::{Comment, PersistedCommentData};
pub use error::{BoardDomainError, ParseTaskPriorityError, ParseTaskStatusError};
pub use ids::{BoardId, CommentId, TaskId};
pub use task::{PersistedTaskData, Task, TaskPriority, TaskStatus};
pub use title::Title;
