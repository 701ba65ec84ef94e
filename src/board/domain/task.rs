//! Task aggregate root and its status/priority scales.

use super::{BoardId, ParseTaskPriorityError, ParseTaskStatusError, TaskId, Title};
use crate::identity::domain::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has not been started.
    #[default]
    ToDo,
    /// Task is being worked on.
    InProgress,
    /// Task is awaiting review.
    Review,
    /// Task has been completed.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "to-do" => Ok(Self::ToDo),
            "in-progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Priority scale of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Unit of work on a board.
///
/// The `board` reference is immutable after creation; assignee and reviewer
/// are weak user references, validated against the board at assignment time
/// and cleared (not cascaded) if the user disappears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: Title,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    board: BoardId,
    assignee: Option<UserId>,
    reviewer: Option<UserId>,
    owner: UserId,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted board reference.
    pub board: BoardId,
    /// Persisted assignee reference, if any.
    pub assignee: Option<UserId>,
    /// Persisted reviewer reference, if any.
    pub reviewer: Option<UserId>,
    /// Persisted creator reference.
    pub owner: UserId,
}

impl Task {
    /// Creates a new task on a board, owned by its creator.
    ///
    /// Status defaults to to-do and priority to medium; use the `with_`
    /// builders to change them.
    #[must_use]
    pub fn new(board: BoardId, owner: UserId, title: Title) -> Self {
        Self {
            id: TaskId::new(),
            title,
            description: String::new(),
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            due_date: None,
            board,
            assignee: None,
            reviewer: None,
            owner,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the reviewer.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer: UserId) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            board: data.board,
            assignee: data.assignee,
            reviewer: data.reviewer,
            owner: data.owner,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if set.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the board this task belongs to.
    #[must_use]
    pub const fn board(&self) -> BoardId {
        self.board
    }

    /// Returns the assignee reference, if set.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the reviewer reference, if set.
    #[must_use]
    pub const fn reviewer(&self) -> Option<UserId> {
        self.reviewer
    }

    /// Returns the creator reference.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: Title) {
        self.title = title;
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the priority.
    pub const fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
    }

    /// Replaces the status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Replaces the due date.
    pub const fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
    }

    /// Replaces the assignee reference.
    pub const fn set_assignee(&mut self, assignee: Option<UserId>) {
        self.assignee = assignee;
    }

    /// Replaces the reviewer reference.
    pub const fn set_reviewer(&mut self, reviewer: Option<UserId>) {
        self.reviewer = reviewer;
    }
}
