//! Diesel row models for board, task, and comment persistence.

use super::schema::{board_members, boards, comments, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for board records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Internal board identifier.
    pub id: uuid::Uuid,
    /// Board title.
    pub title: String,
    /// Owning user.
    pub owner_id: uuid::Uuid,
}

/// Insert model for board records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = boards)]
pub struct NewBoardRow {
    /// Internal board identifier.
    pub id: uuid::Uuid,
    /// Board title.
    pub title: String,
    /// Owning user.
    pub owner_id: uuid::Uuid,
}

/// Row model for board membership entries.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = board_members)]
pub struct BoardMemberRow {
    /// Board the membership belongs to.
    pub board_id: uuid::Uuid,
    /// Member user.
    pub user_id: uuid::Uuid,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Priority storage value.
    pub priority: String,
    /// Status storage value.
    pub status: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Board the task belongs to.
    pub board_id: uuid::Uuid,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Optional reviewer.
    pub reviewer_id: Option<uuid::Uuid>,
    /// Creating user.
    pub owner_id: uuid::Uuid,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Priority storage value.
    pub priority: String,
    /// Status storage value.
    pub status: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Board the task belongs to.
    pub board_id: uuid::Uuid,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Optional reviewer.
    pub reviewer_id: Option<uuid::Uuid>,
    /// Creating user.
    pub owner_id: uuid::Uuid,
}

/// Query result row for comment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Internal comment identifier.
    pub id: uuid::Uuid,
    /// Task the comment belongs to.
    pub task_id: uuid::Uuid,
    /// Authoring user.
    pub author_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Comment content.
    pub content: String,
}

/// Insert model for comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow {
    /// Internal comment identifier.
    pub id: uuid::Uuid,
    /// Task the comment belongs to.
    pub task_id: uuid::Uuid,
    /// Authoring user.
    pub author_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Comment content.
    pub content: String,
}
