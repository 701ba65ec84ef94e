//! Request bodies and response payloads for the API surface.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::board::domain::{BoardId, CommentId, TaskId, TaskPriority, TaskStatus};
use crate::board::services::{BoardDetail, BoardSummary, BoardUpdate, CommentView, TaskOverview};
use crate::identity::domain::{User, UserId};
use crate::identity::ports::credentials::AccessToken;
use crate::identity::services::AuthSession;

/// Compact user representation embedded in other payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMini {
    /// User identifier.
    pub id: UserId,
    /// Email address; absent for guest accounts.
    pub email: Option<String>,
    /// Display name with username fallback.
    pub fullname: String,
}

impl UserMini {
    /// Builds the compact representation from a user record.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().map(|email| email.as_str().to_owned()),
            fullname: user.fullname(),
        }
    }
}

/// Response to registration and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: AccessToken,
    /// Display name of the account.
    pub fullname: String,
    /// Email address of the account.
    pub email: Option<String>,
    /// User identifier.
    pub user_id: UserId,
}

impl AuthResponse {
    /// Builds the response from an authenticated session.
    #[must_use]
    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            fullname: session.user.fullname(),
            email: session
                .user
                .email()
                .map(|email| email.as_str().to_owned()),
            user_id: session.user.id(),
        }
    }
}

/// Response to guest login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestLoginResponse {
    /// Bearer token for subsequent requests.
    pub token: AccessToken,
    /// Generated guest username.
    pub username: String,
    /// User identifier.
    pub user_id: UserId,
}

impl GuestLoginResponse {
    /// Builds the response from a guest session.
    #[must_use]
    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            username: session.user.username().to_string(),
            user_id: session.user.id(),
        }
    }
}

/// Board list entry with aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummaryPayload {
    /// Board identifier.
    pub id: BoardId,
    /// Board title.
    pub title: String,
    /// Number of members.
    pub member_count: usize,
    /// Total number of tasks.
    pub ticket_count: usize,
    /// Tasks still in the to-do column.
    pub tasks_to_do_count: usize,
    /// Tasks whose status reads "high"; see the service for the caveat.
    pub tasks_high_prio_count: usize,
    /// Owner identifier.
    pub owner_id: UserId,
}

impl From<BoardSummary> for BoardSummaryPayload {
    fn from(summary: BoardSummary) -> Self {
        Self {
            id: summary.board.id(),
            title: summary.board.title().to_string(),
            member_count: summary.member_count,
            ticket_count: summary.ticket_count,
            tasks_to_do_count: summary.tasks_to_do_count,
            tasks_high_prio_count: summary.tasks_high_prio_count,
            owner_id: summary.board.owner(),
        }
    }
}

/// Task entry nested inside a board detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTaskPayload {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Resolved assignee, if any.
    pub assignee: Option<UserMini>,
    /// Resolved reviewer, if any.
    pub reviewer: Option<UserMini>,
    /// Due date, if set.
    pub due_date: Option<NaiveDate>,
    /// Number of comments on the task.
    pub comments_count: usize,
}

impl From<TaskOverview> for BoardTaskPayload {
    fn from(overview: TaskOverview) -> Self {
        Self {
            id: overview.task.id(),
            title: overview.task.title().to_string(),
            description: overview.task.description().to_owned(),
            status: overview.task.status(),
            priority: overview.task.priority(),
            assignee: overview.assignee.as_ref().map(UserMini::from_user),
            reviewer: overview.reviewer.as_ref().map(UserMini::from_user),
            due_date: overview.task.due_date(),
            comments_count: overview.comments_count,
        }
    }
}

/// Full board view with members and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDetailPayload {
    /// Board identifier.
    pub id: BoardId,
    /// Board title.
    pub title: String,
    /// Owner identifier.
    pub owner_id: UserId,
    /// Resolved member accounts.
    pub members: Vec<UserMini>,
    /// Tasks on the board.
    pub tasks: Vec<BoardTaskPayload>,
}

impl From<BoardDetail> for BoardDetailPayload {
    fn from(detail: BoardDetail) -> Self {
        Self {
            id: detail.board.id(),
            title: detail.board.title().to_string(),
            owner_id: detail.board.owner(),
            members: detail.members.iter().map(UserMini::from_user).collect(),
            tasks: detail.tasks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response to a board update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUpdatePayload {
    /// Board identifier.
    pub id: BoardId,
    /// New title.
    pub title: String,
    /// Resolved owner account.
    pub owner_data: UserMini,
    /// Resolved member accounts.
    pub members_data: Vec<UserMini>,
}

impl From<BoardUpdate> for BoardUpdatePayload {
    fn from(update: BoardUpdate) -> Self {
        Self {
            id: update.board.id(),
            title: update.board.title().to_string(),
            owner_data: UserMini::from_user(&update.owner),
            members_data: update.members.iter().map(UserMini::from_user).collect(),
        }
    }
}

/// Task view returned by creation and the per-user task lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Task identifier.
    pub id: TaskId,
    /// Board the task belongs to.
    pub board: BoardId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Resolved assignee, if any.
    pub assignee: Option<UserMini>,
    /// Resolved reviewer, if any.
    pub reviewer: Option<UserMini>,
    /// Due date, if set.
    pub due_date: Option<NaiveDate>,
    /// Number of comments on the task.
    pub comments_count: usize,
}

impl From<TaskOverview> for TaskPayload {
    fn from(overview: TaskOverview) -> Self {
        Self {
            id: overview.task.id(),
            board: overview.task.board(),
            title: overview.task.title().to_string(),
            description: overview.task.description().to_owned(),
            status: overview.task.status(),
            priority: overview.task.priority(),
            assignee: overview.assignee.as_ref().map(UserMini::from_user),
            reviewer: overview.reviewer.as_ref().map(UserMini::from_user),
            due_date: overview.task.due_date(),
            comments_count: overview.comments_count,
        }
    }
}

/// Task view returned by partial updates; no board or comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetailPayload {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Resolved assignee, if any.
    pub assignee: Option<UserMini>,
    /// Resolved reviewer, if any.
    pub reviewer: Option<UserMini>,
    /// Due date, if set.
    pub due_date: Option<NaiveDate>,
}

impl From<TaskOverview> for TaskDetailPayload {
    fn from(overview: TaskOverview) -> Self {
        Self {
            id: overview.task.id(),
            title: overview.task.title().to_string(),
            description: overview.task.description().to_owned(),
            status: overview.task.status(),
            priority: overview.task.priority(),
            assignee: overview.assignee.as_ref().map(UserMini::from_user),
            reviewer: overview.reviewer.as_ref().map(UserMini::from_user),
            due_date: overview.task.due_date(),
        }
    }
}

/// Comment view with the author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    /// Comment identifier.
    pub id: CommentId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Author display name.
    pub author: String,
    /// Comment content.
    pub content: String,
}

impl From<CommentView> for CommentPayload {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id(),
            created_at: view.comment.created_at(),
            author: view.author,
            content: view.comment.content().to_owned(),
        }
    }
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationBody {
    /// Full name, first and last.
    pub fullname: String,
    /// Email address; doubles as the username.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password repetition.
    pub repeated_password: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginBody {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Board creation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardBody {
    /// Board title.
    pub title: String,
    /// Initial member identifiers.
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// Board update request body; both fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBoardBody {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement member set.
    #[serde(default)]
    pub members: Option<Vec<UserId>>,
}

/// Task creation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskBody {
    /// Target board.
    pub board: BoardId,
    /// Task title.
    pub title: String,
    /// Task description.
    #[serde(default)]
    pub description: String,
    /// Initial status; defaults to to-do.
    #[serde(default)]
    pub status: Option<String>,
    /// Priority; defaults to medium.
    #[serde(default)]
    pub priority: Option<String>,
    /// Assignee identifier.
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    /// Reviewer identifier.
    #[serde(default)]
    pub reviewer_id: Option<UserId>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Task update request body.
///
/// Absent fields leave the task untouched. The `board` field captures any
/// value, including null, so handlers can reject board moves outright.
/// Double-`Option` fields distinguish "absent" from "set to null".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskBody {
    /// Any attempt to address a board, rejected by the handler.
    #[serde(default, deserialize_with = "some")]
    pub board: Option<Option<serde_json::Value>>,
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement status.
    #[serde(default)]
    pub status: Option<String>,
    /// Replacement priority.
    #[serde(default)]
    pub priority: Option<String>,
    /// Replacement assignee; null clears it.
    #[serde(default, deserialize_with = "some")]
    pub assignee_id: Option<Option<UserId>>,
    /// Replacement reviewer; null clears it.
    #[serde(default, deserialize_with = "some")]
    pub reviewer_id: Option<Option<UserId>>,
    /// Replacement due date; null clears it.
    #[serde(default, deserialize_with = "some")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Comment creation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentBody {
    /// Comment content.
    pub content: String,
}

/// Wraps a present value in `Some` so `#[serde(default)]` marks absence.
fn some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
