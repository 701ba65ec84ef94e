//! In-memory board, task, and comment store.
//!
//! One store implements all three repository ports over shared state so that
//! board deletion can cascade through tasks and comments the same way the
//! relational collaborator does with foreign keys.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{Board, BoardId, Comment, CommentId, Task, TaskId},
    ports::{
        BoardRepository, BoardRepositoryError, BoardRepositoryResult, CommentRepository,
        CommentRepositoryError, CommentRepositoryResult, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};
use crate::identity::domain::UserId;

/// Thread-safe in-memory store for the board aggregate family.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKanbanStore {
    state: Arc<RwLock<KanbanState>>,
}

#[derive(Debug, Default)]
struct KanbanState {
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, Comment>,
}

impl KanbanState {
    /// Removes a task's comments, then the task itself.
    fn remove_task_with_comments(&mut self, task_id: TaskId) {
        self.comments.retain(|_, comment| comment.task() != task_id);
        self.tasks.remove(&task_id);
    }
}

impl InMemoryKanbanStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<E>(err: &std::sync::PoisonError<E>) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

#[async_trait]
impl BoardRepository for InMemoryKanbanStore {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BoardRepositoryError::persistence(lock_poisoned(&err)))?;
        if state.boards.contains_key(&board.id()) {
            return Err(BoardRepositoryError::DuplicateBoard(board.id()));
        }
        state.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BoardRepositoryError::persistence(lock_poisoned(&err)))?;
        if !state.boards.contains_key(&board.id()) {
            return Err(BoardRepositoryError::NotFound(board.id()));
        }
        state.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BoardRepositoryError::persistence(lock_poisoned(&err)))?;
        if state.boards.remove(&id).is_none() {
            return Err(BoardRepositoryError::NotFound(id));
        }

        let task_ids: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.board() == id)
            .map(Task::id)
            .collect();
        for task_id in task_ids {
            state.remove_task_with_comments(task_id);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        let state = self
            .state
            .read()
            .map_err(|err| BoardRepositoryError::persistence(lock_poisoned(&err)))?;
        Ok(state.boards.get(&id).cloned())
    }

    async fn list_for_user(&self, user: UserId) -> BoardRepositoryResult<Vec<Board>> {
        let state = self
            .state
            .read()
            .map_err(|err| BoardRepositoryError::persistence(lock_poisoned(&err)))?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|board| board.grants_access(user))
            .cloned()
            .collect();
        boards.sort_by_key(Board::id);
        Ok(boards)
    }
}

#[async_trait]
impl TaskRepository for InMemoryKanbanStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.remove_task_with_comments(id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_for_board(&self, board: BoardId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.board() == board)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::id);
        Ok(tasks)
    }

    async fn list_assigned_to(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.assignee() == Some(user))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::id);
        Ok(tasks)
    }

    async fn list_reviewing(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(lock_poisoned(&err)))?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.reviewer() == Some(user))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::id);
        Ok(tasks)
    }
}

#[async_trait]
impl CommentRepository for InMemoryKanbanStore {
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CommentRepositoryError::persistence(lock_poisoned(&err)))?;
        if state.comments.contains_key(&comment.id()) {
            return Err(CommentRepositoryError::DuplicateComment(comment.id()));
        }
        state.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn delete(&self, id: CommentId) -> CommentRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CommentRepositoryError::persistence(lock_poisoned(&err)))?;
        if state.comments.remove(&id).is_none() {
            return Err(CommentRepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>> {
        let state = self
            .state
            .read()
            .map_err(|err| CommentRepositoryError::persistence(lock_poisoned(&err)))?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn list_for_task(&self, task: TaskId) -> CommentRepositoryResult<Vec<Comment>> {
        let state = self
            .state
            .read()
            .map_err(|err| CommentRepositoryError::persistence(lock_poisoned(&err)))?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.task() == task)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }
}
