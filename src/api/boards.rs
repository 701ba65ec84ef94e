//! Handlers for the board collection and individual boards.

use crate::api::error::{ApiError, ApiResult};
use crate::api::payloads::{
    BoardDetailPayload, BoardSummaryPayload, BoardUpdatePayload, CreateBoardBody, UpdateBoardBody,
};
use crate::board::domain::{BoardId, Title};
use crate::board::ports::{BoardRepository, CommentRepository, TaskRepository};
use crate::board::services::BoardService;
use crate::identity::domain::UserId;
use crate::identity::ports::UserRepository;

/// Lists the boards visible to the actor, with counts.
///
/// # Errors
///
/// Returns 500 when persistence fails.
pub async fn list_boards<B, T, C, U>(
    service: &BoardService<B, T, C, U>,
    actor: UserId,
) -> ApiResult<Vec<BoardSummaryPayload>>
where
    B: BoardRepository,
    T: TaskRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let summaries = service.list(actor).await?;
    Ok(summaries.into_iter().map(Into::into).collect())
}

/// Creates a board owned by the actor.
///
/// # Errors
///
/// Returns field-scoped 400s for a bad title or unknown members.
pub async fn create_board<B, T, C, U>(
    service: &BoardService<B, T, C, U>,
    actor: UserId,
    body: CreateBoardBody,
) -> ApiResult<BoardSummaryPayload>
where
    B: BoardRepository,
    T: TaskRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let title = Title::new(body.title).map_err(|err| ApiError::field("title", err.to_string()))?;
    let summary = service.create(actor, title, body.members).await?;
    Ok(summary.into())
}

/// Returns a board with its members and tasks.
///
/// # Errors
///
/// Returns 404 for unknown boards and 403 for outsiders.
pub async fn board_detail<B, T, C, U>(
    service: &BoardService<B, T, C, U>,
    actor: UserId,
    id: BoardId,
) -> ApiResult<BoardDetailPayload>
where
    B: BoardRepository,
    T: TaskRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let detail = service.detail(actor, id).await?;
    Ok(detail.into())
}

/// Updates a board's title and member set.
///
/// # Errors
///
/// Returns 404 for unknown boards, 403 for outsiders, and field-scoped 400s
/// for bad input.
pub async fn update_board<B, T, C, U>(
    service: &BoardService<B, T, C, U>,
    actor: UserId,
    id: BoardId,
    body: UpdateBoardBody,
) -> ApiResult<BoardUpdatePayload>
where
    B: BoardRepository,
    T: TaskRepository,
    C: CommentRepository,
    U: UserRepository,
{
    let title = body
        .title
        .map(Title::new)
        .transpose()
        .map_err(|err| ApiError::field("title", err.to_string()))?;
    let update = service.update(actor, id, title, body.members).await?;
    Ok(update.into())
}

/// Deletes a board, cascading to its tasks and comments.
///
/// # Errors
///
/// Returns 404 for unknown boards and 403 for anyone but the owner.
pub async fn delete_board<B, T, C, U>(
    service: &BoardService<B, T, C, U>,
    actor: UserId,
    id: BoardId,
) -> ApiResult<()>
where
    B: BoardRepository,
    T: TaskRepository,
    C: CommentRepository,
    U: UserRepository,
{
    service.delete(actor, id).await?;
    Ok(())
}
