//! Comment entity attached to tasks.

use super::{BoardDomainError, CommentId, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Authored note attached to a task.
///
/// Comments are immutable once created; the only lifecycle operation is
/// deletion, which is restricted to the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    task: TaskId,
    author: UserId,
    created_at: DateTime<Utc>,
    content: String,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted comment identifier.
    pub id: CommentId,
    /// Persisted task reference.
    pub task: TaskId,
    /// Persisted author reference.
    pub author: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted content.
    pub content: String,
}

impl Comment {
    /// Creates a new comment on a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyCommentContent`] when the content is
    /// blank after trimming.
    pub fn new(
        task: TaskId,
        author: UserId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(BoardDomainError::EmptyCommentContent);
        }

        Ok(Self {
            id: CommentId::new(),
            task,
            author,
            created_at: clock.utc(),
            content,
        })
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task: data.task,
            author: data.author,
            created_at: data.created_at,
            content: data.content,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the task this comment belongs to.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the author reference.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the comment content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
