//! Comment workflows: thread listing, creation, and author-only deletion.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;

use crate::board::domain::{Board, BoardDomainError, BoardId, Comment, CommentId, Task, TaskId};
use crate::board::ports::{
    BoardRepository, BoardRepositoryError, CommentRepository, CommentRepositoryError,
    TaskRepository, TaskRepositoryError,
};
use crate::identity::domain::{User, UserId};
use crate::identity::ports::repository::{UserRepository, UserRepositoryError};
use crate::policy::{Operation, PolicyDenial, Resource, authorize};

/// Result type for comment service operations.
pub type CommentServiceResult<T> = Result<T, CommentServiceError>;

/// A comment joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    /// The comment itself.
    pub comment: Comment,
    /// Author display name; full name with username fallback.
    pub author: String,
}

/// Errors returned by comment service operations.
#[derive(Debug, Clone, Error)]
pub enum CommentServiceError {
    /// Domain validation failure.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The policy engine refused the operation.
    #[error(transparent)]
    Denied(#[from] PolicyDenial),

    /// The task addressed by the thread does not exist.
    #[error("Task not found.")]
    TaskNotFound(TaskId),

    /// The task's board is gone; the thread cannot be authorized.
    #[error("Board not found.")]
    BoardNotFound(BoardId),

    /// The addressed comment does not exist under the addressed task.
    #[error("Comment not found.")]
    NotFound(CommentId),

    /// Board persistence failure.
    #[error(transparent)]
    Boards(#[from] BoardRepositoryError),

    /// Task persistence failure.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Comment persistence failure.
    #[error(transparent)]
    Comments(#[from] CommentRepositoryError),

    /// User persistence failure.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

/// Application service for comment workflows.
#[derive(Debug)]
pub struct CommentService<C, T, B, U, K> {
    comments: Arc<C>,
    tasks: Arc<T>,
    boards: Arc<B>,
    users: Arc<U>,
    clock: Arc<K>,
}

impl<C, T, B, U, K> Clone for CommentService<C, T, B, U, K> {
    fn clone(&self) -> Self {
        Self {
            comments: Arc::clone(&self.comments),
            tasks: Arc::clone(&self.tasks),
            boards: Arc::clone(&self.boards),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C, T, B, U, K> CommentService<C, T, B, U, K>
where
    C: CommentRepository,
    T: TaskRepository,
    B: BoardRepository,
    U: UserRepository,
    K: Clock,
{
    /// Creates a comment service over the given repositories and clock.
    pub const fn new(
        comments: Arc<C>,
        tasks: Arc<T>,
        boards: Arc<B>,
        users: Arc<U>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            comments,
            tasks,
            boards,
            users,
            clock,
        }
    }

    /// Lists a task's comments, oldest first.
    ///
    /// The actor must have access to the task's board.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError::TaskNotFound`] for an unknown task or
    /// a [`PolicyDenial`] for outsiders.
    pub async fn list(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> CommentServiceResult<Vec<CommentView>> {
        let (_, board) = self.resolve_thread(task_id).await?;
        authorize(
            actor,
            &Resource::CommentThread { board: &board },
            Operation::Read,
        )?;

        let comments = self.comments.list_for_task(task_id).await?;
        let author_ids: Vec<UserId> = comments.iter().map(Comment::author).collect();
        let authors = self.users.find_many(&author_ids).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors
                    .iter()
                    .find(|user| user.id() == comment.author())
                    .map_or_else(String::new, User::fullname);
                CommentView { comment, author }
            })
            .collect())
    }

    /// Adds a comment to a task's thread, authored by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError::TaskNotFound`] for an unknown task, a
    /// [`PolicyDenial`] for outsiders, or a domain error for blank content.
    pub async fn create(
        &self,
        actor: UserId,
        task_id: TaskId,
        content: impl Into<String> + Send,
    ) -> CommentServiceResult<CommentView> {
        let (_, board) = self.resolve_thread(task_id).await?;
        authorize(
            actor,
            &Resource::CommentThread { board: &board },
            Operation::Create,
        )?;

        let comment = Comment::new(task_id, actor, content, self.clock.as_ref())?;
        self.comments.store(&comment).await?;

        let author = self
            .users
            .find_by_id(actor)
            .await?
            .map_or_else(String::new, |user| user.fullname());
        Ok(CommentView { comment, author })
    }

    /// Deletes a comment from a task's thread.
    ///
    /// Author only; board and task owners get no override.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError::NotFound`] when the comment does not
    /// exist under the addressed task, or a [`PolicyDenial`] for non-authors.
    pub async fn delete(
        &self,
        actor: UserId,
        task_id: TaskId,
        comment_id: CommentId,
    ) -> CommentServiceResult<()> {
        self.resolve_thread(task_id).await?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.task() == task_id)
            .ok_or(CommentServiceError::NotFound(comment_id))?;

        authorize(actor, &Resource::Comment(&comment), Operation::Delete)?;
        self.comments.delete(comment_id).await?;
        Ok(())
    }

    async fn resolve_thread(&self, task_id: TaskId) -> CommentServiceResult<(Task, Board)> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(CommentServiceError::TaskNotFound(task_id))?;
        let board = self
            .boards
            .find_by_id(task.board())
            .await?
            .ok_or(CommentServiceError::BoardNotFound(task.board()))?;
        Ok((task, board))
    }
}
