//! Task workflows: creation, per-user task lists, updates, and deletion.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::board::domain::{
    Board, BoardDomainError, BoardId, Task, TaskId, TaskPriority, TaskStatus, Title,
};
use crate::board::ports::{
    BoardRepository, BoardRepositoryError, CommentRepository, CommentRepositoryError,
    TaskRepository, TaskRepositoryError,
};
use crate::identity::domain::{User, UserId};
use crate::identity::ports::repository::{UserRepository, UserRepositoryError};
use crate::policy::{Operation, PolicyDenial, Resource, authorize};

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// A task joined with the user records and comment count its read views need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOverview {
    /// The task itself.
    pub task: Task,
    /// Resolved assignee, when set and still known.
    pub assignee: Option<User>,
    /// Resolved reviewer, when set and still known.
    pub reviewer: Option<User>,
    /// Number of comments attached to the task.
    pub comments_count: usize,
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    board: BoardId,
    title: Title,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assignee: Option<UserId>,
    reviewer: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with default status and priority and no optional
    /// fields.
    #[must_use]
    pub fn new(board: BoardId, title: Title) -> Self {
        Self {
            board,
            title,
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            assignee: None,
            reviewer: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
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
}

/// Partial update of a task.
///
/// `None` fields are left untouched; the double `Option` on due date,
/// assignee, and reviewer distinguishes "leave as is" from "clear".
/// `board_change_requested` records that the caller tried to move the task
/// to another board, which is always rejected.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<Title>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement due date; `Some(None)` clears it.
    pub due_date: Option<Option<NaiveDate>>,
    /// Replacement assignee; `Some(None)` clears it.
    pub assignee: Option<Option<UserId>>,
    /// Replacement reviewer; `Some(None)` clears it.
    pub reviewer: Option<Option<UserId>>,
    /// Whether the caller attempted to change the task's board.
    pub board_change_requested: bool,
}

/// Errors returned by task service operations.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// Domain validation failure.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The policy engine refused the operation.
    #[error(transparent)]
    Denied(#[from] PolicyDenial),

    /// The addressed board does not exist.
    #[error("Board not found.")]
    BoardNotFound(BoardId),

    /// The addressed task does not exist.
    #[error("Task not found.")]
    NotFound(TaskId),

    /// The requested assignee does not exist.
    #[error("User not found.")]
    AssigneeNotFound(UserId),

    /// The requested reviewer does not exist.
    #[error("User not found.")]
    ReviewerNotFound(UserId),

    /// The requested assignee has no access to the task's board.
    #[error("Assignee must be a member of the board.")]
    AssigneeNotOnBoard(UserId),

    /// The requested reviewer has no access to the task's board.
    #[error("Reviewer must be a member of the board.")]
    ReviewerNotOnBoard(UserId),

    /// The caller tried to move the task to another board.
    #[error("Modification of the board is not allowed.")]
    BoardChangeRejected,

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

/// Application service for task workflows.
#[derive(Debug)]
pub struct TaskService<T, B, C, U> {
    tasks: Arc<T>,
    boards: Arc<B>,
    comments: Arc<C>,
    users: Arc<U>,
}

impl<T, B, C, U> Clone for TaskService<T, B, C, U> {
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            boards: Arc::clone(&self.boards),
            comments: Arc::clone(&self.comments),
            users: Arc::clone(&self.users),
        }
    }
}

impl<T, B, C, U> TaskService<T, B, C, U>
where
    T: TaskRepository,
    B: BoardRepository,
    C: CommentRepository,
    U: UserRepository,
{
    /// Creates a task service over the given repositories.
    pub const fn new(tasks: Arc<T>, boards: Arc<B>, comments: Arc<C>, users: Arc<U>) -> Self {
        Self {
            tasks,
            boards,
            comments,
            users,
        }
    }

    /// Creates a task on a board.
    ///
    /// The actor must be owner or member of the target board. Assignee and
    /// reviewer, when given, must exist and themselves have access to the
    /// board; otherwise the task is not created.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::BoardNotFound`] for an unknown board,
    /// a [`PolicyDenial`] when the actor may not create tasks there, or the
    /// assignee/reviewer validation errors.
    pub async fn create(
        &self,
        actor: UserId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<TaskOverview> {
        let board = self.resolve_board(request.board).await?;
        authorize(
            actor,
            &Resource::TaskCollection { board: &board },
            Operation::Create,
        )?;

        if let Some(assignee) = request.assignee {
            self.validate_assignee(assignee, &board).await?;
        }
        if let Some(reviewer) = request.reviewer {
            self.validate_reviewer(reviewer, &board).await?;
        }

        let mut task = Task::new(board.id(), actor, request.title)
            .with_description(request.description)
            .with_status(request.status)
            .with_priority(request.priority);
        if let Some(due_date) = request.due_date {
            task = task.with_due_date(due_date);
        }
        if let Some(assignee) = request.assignee {
            task = task.with_assignee(assignee);
        }
        if let Some(reviewer) = request.reviewer {
            task = task.with_reviewer(reviewer);
        }

        self.tasks.store(&task).await?;
        task_overview(self.users.as_ref(), self.comments.as_ref(), task).await
    }

    /// Returns the tasks assigned to the actor.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the underlying repositories.
    pub async fn assigned_to_me(&self, actor: UserId) -> TaskServiceResult<Vec<TaskOverview>> {
        let tasks = self.tasks.list_assigned_to(actor).await?;
        self.overviews(tasks).await
    }

    /// Returns the tasks the actor is reviewing.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the underlying repositories.
    pub async fn reviewing(&self, actor: UserId) -> TaskServiceResult<Vec<TaskOverview>> {
        let tasks = self.tasks.list_reviewing(actor).await?;
        self.overviews(tasks).await
    }

    /// Applies a partial update to a task.
    ///
    /// A requested board change is rejected before anything else, including
    /// authorization; the task is left untouched. The actor must be a member
    /// or owner of the task's board.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::BoardChangeRejected`] when the caller
    /// tried to move the task, [`TaskServiceError::NotFound`] for an unknown
    /// task, a [`PolicyDenial`] for non-members, or assignee/reviewer
    /// validation errors.
    pub async fn update(
        &self,
        actor: UserId,
        id: TaskId,
        changes: TaskChanges,
    ) -> TaskServiceResult<TaskOverview> {
        if changes.board_change_requested {
            return Err(TaskServiceError::BoardChangeRejected);
        }

        let mut task = self.resolve_task(id).await?;
        let board = self.resolve_board(task.board()).await?;
        authorize(
            actor,
            &Resource::Task {
                task: &task,
                board: &board,
            },
            Operation::Update,
        )?;

        if let Some(Some(assignee)) = changes.assignee {
            self.validate_assignee(assignee, &board).await?;
        }
        if let Some(Some(reviewer)) = changes.reviewer {
            self.validate_reviewer(reviewer, &board).await?;
        }

        if let Some(title) = changes.title {
            task.set_title(title);
        }
        if let Some(description) = changes.description {
            task.set_description(description);
        }
        if let Some(status) = changes.status {
            task.set_status(status);
        }
        if let Some(priority) = changes.priority {
            task.set_priority(priority);
        }
        if let Some(due_date) = changes.due_date {
            task.set_due_date(due_date);
        }
        if let Some(assignee) = changes.assignee {
            task.set_assignee(assignee);
        }
        if let Some(reviewer) = changes.reviewer {
            task.set_reviewer(reviewer);
        }

        self.tasks.update(&task).await?;
        task_overview(self.users.as_ref(), self.comments.as_ref(), task).await
    }

    /// Deletes a task and its comments.
    ///
    /// Requires board membership first, then task or board ownership.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for an unknown task or a
    /// [`PolicyDenial`] when the two-stage ownership check fails.
    pub async fn delete(&self, actor: UserId, id: TaskId) -> TaskServiceResult<()> {
        let task = self.resolve_task(id).await?;
        let board = self.resolve_board(task.board()).await?;
        authorize(
            actor,
            &Resource::Task {
                task: &task,
                board: &board,
            },
            Operation::Delete,
        )?;
        self.tasks.delete(id).await?;
        Ok(())
    }

    async fn resolve_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    async fn resolve_board(&self, id: BoardId) -> TaskServiceResult<Board> {
        self.boards
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::BoardNotFound(id))
    }

    async fn validate_assignee(&self, assignee: UserId, board: &Board) -> TaskServiceResult<()> {
        if self.users.find_by_id(assignee).await?.is_none() {
            return Err(TaskServiceError::AssigneeNotFound(assignee));
        }
        if !board.grants_access(assignee) {
            return Err(TaskServiceError::AssigneeNotOnBoard(assignee));
        }
        Ok(())
    }

    async fn validate_reviewer(&self, reviewer: UserId, board: &Board) -> TaskServiceResult<()> {
        if self.users.find_by_id(reviewer).await?.is_none() {
            return Err(TaskServiceError::ReviewerNotFound(reviewer));
        }
        if !board.grants_access(reviewer) {
            return Err(TaskServiceError::ReviewerNotOnBoard(reviewer));
        }
        Ok(())
    }

    async fn overviews(&self, tasks: Vec<Task>) -> TaskServiceResult<Vec<TaskOverview>> {
        let mut overviews = Vec::with_capacity(tasks.len());
        for task in tasks {
            overviews.push(
                task_overview::<_, _, TaskServiceError>(
                    self.users.as_ref(),
                    self.comments.as_ref(),
                    task,
                )
                .await?,
            );
        }
        Ok(overviews)
    }
}

/// Joins a task with its assignee, reviewer, and comment count.
pub(crate) async fn task_overview<U, C, E>(
    users: &U,
    comments: &C,
    task: Task,
) -> Result<TaskOverview, E>
where
    U: UserRepository + ?Sized,
    C: CommentRepository + ?Sized,
    E: From<UserRepositoryError> + From<CommentRepositoryError>,
{
    let assignee = match task.assignee() {
        Some(id) => users.find_by_id(id).await?,
        None => None,
    };
    let reviewer = match task.reviewer() {
        Some(id) => users.find_by_id(id).await?,
        None => None,
    };
    let comments_count = comments.list_for_task(task.id()).await?.len();
    Ok(TaskOverview {
        task,
        assignee,
        reviewer,
        comments_count,
    })
}
