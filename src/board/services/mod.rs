//! Application services orchestrating board, task, and comment workflows.
//!
//! Each service resolves identifiers to live entities, asks the policy
//! engine for a decision, validates cross-entity references, and only then
//! mutates the stores.

pub mod boards;
pub mod comments;
pub mod tasks;

pub use boards::{
    BoardDetail, BoardService, BoardServiceError, BoardServiceResult, BoardSummary, BoardUpdate,
};
pub use comments::{CommentService, CommentServiceError, CommentServiceResult, CommentView};
pub use tasks::{
    CreateTaskRequest, TaskChanges, TaskOverview, TaskService, TaskServiceError, TaskServiceResult,
};
