//! Handlers for a task's comment thread.

use mockable::Clock;

use crate::api::error::ApiResult;
use crate::api::payloads::{CommentPayload, CreateCommentBody};
use crate::board::domain::{CommentId, TaskId};
use crate::board::ports::{BoardRepository, CommentRepository, TaskRepository};
use crate::board::services::CommentService;
use crate::identity::domain::UserId;
use crate::identity::ports::UserRepository;

/// Lists a task's comments, oldest first.
///
/// # Errors
///
/// Returns 404 for unknown tasks and 403 for actors without board access.
pub async fn list_comments<C, T, B, U, K>(
    service: &CommentService<C, T, B, U, K>,
    actor: UserId,
    task: TaskId,
) -> ApiResult<Vec<CommentPayload>>
where
    C: CommentRepository,
    T: TaskRepository,
    B: BoardRepository,
    U: UserRepository,
    K: Clock,
{
    let views = service.list(actor, task).await?;
    Ok(views.into_iter().map(Into::into).collect())
}

/// Adds a comment to a task's thread.
///
/// # Errors
///
/// Returns 404 for unknown tasks, 403 for actors without board access, and
/// a field-scoped 400 for blank content.
pub async fn create_comment<C, T, B, U, K>(
    service: &CommentService<C, T, B, U, K>,
    actor: UserId,
    task: TaskId,
    body: CreateCommentBody,
) -> ApiResult<CommentPayload>
where
    C: CommentRepository,
    T: TaskRepository,
    B: BoardRepository,
    U: UserRepository,
    K: Clock,
{
    let view = service.create(actor, task, body.content).await?;
    Ok(view.into())
}

/// Deletes a comment from a task's thread.
///
/// # Errors
///
/// Returns 404 when the comment does not exist under the addressed task and
/// 403 for anyone but the author.
pub async fn delete_comment<C, T, B, U, K>(
    service: &CommentService<C, T, B, U, K>,
    actor: UserId,
    task: TaskId,
    comment: CommentId,
) -> ApiResult<()>
where
    C: CommentRepository,
    T: TaskRepository,
    B: BoardRepository,
    U: UserRepository,
    K: Clock,
{
    service.delete(actor, task, comment).await?;
    Ok(())
}
