//! Handlers for task creation, per-user task lists, updates, and deletion.

use crate::api::error::{ApiError, ApiResult};
use crate::api::payloads::{CreateTaskBody, TaskDetailPayload, TaskPayload, UpdateTaskBody};
use crate::board::domain::{TaskId, TaskPriority, TaskStatus, Title};
use crate::board::ports::{BoardRepository, CommentRepository, TaskRepository};
use crate::board::services::{CreateTaskRequest, TaskChanges, TaskService};
use crate::identity::domain::UserId;
use crate::identity::ports::UserRepository;

/// Creates a task on a board.
///
/// # Errors
///
/// Returns 404 for an unknown board, 403 when the actor may not create
/// tasks there or the assignee/reviewer is not on the board, and
/// field-scoped 400s for bad input.
pub async fn create_task<T, B, C, U>(
    service: &TaskService<T, B, C, U>,
    actor: UserId,
    body: CreateTaskBody,
) -> ApiResult<TaskPayload>
where
    T: TaskRepository,
    B: BoardRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let title = Title::new(body.title).map_err(|err| ApiError::field("title", err.to_string()))?;
    let mut request =
        CreateTaskRequest::new(body.board, title).with_description(body.description);

    if let Some(status) = body.status.as_deref() {
        request = request.with_status(parse_status(status)?);
    }
    if let Some(priority) = body.priority.as_deref() {
        request = request.with_priority(parse_priority(priority)?);
    }
    if let Some(due_date) = body.due_date {
        request = request.with_due_date(due_date);
    }
    if let Some(assignee) = body.assignee_id {
        request = request.with_assignee(assignee);
    }
    if let Some(reviewer) = body.reviewer_id {
        request = request.with_reviewer(reviewer);
    }

    let overview = service.create(actor, request).await?;
    Ok(overview.into())
}

/// Lists the tasks assigned to the actor.
///
/// # Errors
///
/// Returns 500 when persistence fails.
pub async fn assigned_to_me<T, B, C, U>(
    service: &TaskService<T, B, C, U>,
    actor: UserId,
) -> ApiResult<Vec<TaskPayload>>
where
    T: TaskRepository,
    B: BoardRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let overviews = service.assigned_to_me(actor).await?;
    Ok(overviews.into_iter().map(Into::into).collect())
}

/// Lists the tasks the actor is reviewing.
///
/// # Errors
///
/// Returns 500 when persistence fails.
pub async fn reviewing<T, B, C, U>(
    service: &TaskService<T, B, C, U>,
    actor: UserId,
) -> ApiResult<Vec<TaskPayload>>
where
    T: TaskRepository,
    B: BoardRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let overviews = service.reviewing(actor).await?;
    Ok(overviews.into_iter().map(Into::into).collect())
}

/// Applies a partial update to a task.
///
/// Any `board` key in the body, whatever its value, yields 400 before
/// anything else is looked at.
///
/// # Errors
///
/// Returns 404 for unknown tasks, 403 for non-members, and field-scoped
/// 400s for bad input.
pub async fn update_task<T, B, C, U>(
    service: &TaskService<T, B, C, U>,
    actor: UserId,
    id: TaskId,
    body: UpdateTaskBody,
) -> ApiResult<TaskDetailPayload>
where
    T: TaskRepository,
    B: BoardRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let title = body
        .title
        .map(Title::new)
        .transpose()
        .map_err(|err| ApiError::field("title", err.to_string()))?;
    let status = body.status.as_deref().map(parse_status).transpose()?;
    let priority = body.priority.as_deref().map(parse_priority).transpose()?;

    let changes = TaskChanges {
        title,
        description: body.description,
        status,
        priority,
        due_date: body.due_date,
        assignee: body.assignee_id,
        reviewer: body.reviewer_id,
        board_change_requested: body.board.is_some(),
    };

    let overview = service.update(actor, id, changes).await?;
    Ok(overview.into())
}

/// Deletes a task and its comments.
///
/// # Errors
///
/// Returns 404 for unknown tasks and 403 when the membership or ownership
/// check fails.
pub async fn delete_task<T, B, C, U>(
    service: &TaskService<T, B, C, U>,
    actor: UserId,
    id: TaskId,
) -> ApiResult<()>
where
    T: TaskRepository,
    B: BoardRepository,
    C: CommentRepository,
    U: UserRepository,
{
    service.delete(actor, id).await?;
    Ok(())
}

fn parse_status(value: &str) -> ApiResult<TaskStatus> {
    TaskStatus::try_from(value).map_err(|err| ApiError::field("status", err.to_string()))
}

fn parse_priority(value: &str) -> ApiResult<TaskPriority> {
    TaskPriority::try_from(value).map_err(|err| ApiError::field("priority", err.to_string()))
}
