//! `PostgreSQL` repository implementation for boards, tasks, and comments.
//!
//! Cascade deletes are performed explicitly inside a transaction so the
//! adapter does not depend on foreign-key actions being configured.

use super::{
    models::{BoardMemberRow, BoardRow, CommentRow, NewBoardRow, NewCommentRow, NewTaskRow, TaskRow},
    schema::{board_members, boards, comments, tasks},
};
use crate::board::{
    domain::{
        Board, BoardId, Comment, CommentId, PersistedBoardData, PersistedCommentData,
        PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, Title,
    },
    ports::{
        BoardRepository, BoardRepositoryError, BoardRepositoryResult, CommentRepository,
        CommentRepositoryError, CommentRepositoryResult, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};
use crate::identity::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};

/// `PostgreSQL` connection pool type used by board adapters.
pub type KanbanPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed store for the board aggregate family.
#[derive(Debug, Clone)]
pub struct PostgresKanbanRepository {
    pool: KanbanPgPool,
}

/// Error types that can absorb an arbitrary persistence failure.
trait PersistenceFailure {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for BoardRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for TaskRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for CommentRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PostgresKanbanRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: KanbanPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(|err| E::wrap(err))?;
            f(&mut connection)
        })
        .await
        .map_err(|err| E::wrap(err))?
    }
}

#[async_trait]
impl BoardRepository for PostgresKanbanRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let new_row = board_to_new_row(board);
        let member_rows = board_to_member_rows(board);

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|connection| {
                    diesel::insert_into(boards::table)
                        .values(&new_row)
                        .execute(connection)?;
                    diesel::insert_into(board_members::table)
                        .values(&member_rows)
                        .execute(connection)?;
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BoardRepositoryError::DuplicateBoard(board_id)
                    }
                    _ => BoardRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let title = board.title().as_str().to_owned();
        let member_rows = board_to_member_rows(board);

        self.run_blocking(move |connection| {
            // Title and membership replacement are one logical write; the
            // transaction keeps them atomic.
            let updated = connection
                .transaction::<_, DieselError, _>(|connection| {
                    let updated = diesel::update(boards::table.find(board_id.into_inner()))
                        .set(boards::title.eq(&title))
                        .execute(connection)?;
                    if updated == 0 {
                        return Ok(0);
                    }
                    diesel::delete(
                        board_members::table
                            .filter(board_members::board_id.eq(board_id.into_inner())),
                    )
                    .execute(connection)?;
                    diesel::insert_into(board_members::table)
                        .values(&member_rows)
                        .execute(connection)?;
                    Ok(updated)
                })
                .map_err(BoardRepositoryError::persistence)?;

            if updated == 0 {
                return Err(BoardRepositoryError::NotFound(board_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = connection
                .transaction::<_, DieselError, _>(|connection| {
                    let task_ids: Vec<uuid::Uuid> = tasks::table
                        .filter(tasks::board_id.eq(id.into_inner()))
                        .select(tasks::id)
                        .load(connection)?;
                    diesel::delete(comments::table.filter(comments::task_id.eq_any(&task_ids)))
                        .execute(connection)?;
                    diesel::delete(tasks::table.filter(tasks::board_id.eq(id.into_inner())))
                        .execute(connection)?;
                    diesel::delete(
                        board_members::table.filter(board_members::board_id.eq(id.into_inner())),
                    )
                    .execute(connection)?;
                    diesel::delete(boards::table.find(id.into_inner())).execute(connection)
                })
                .map_err(BoardRepositoryError::persistence)?;

            if deleted == 0 {
                return Err(BoardRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .find(id.into_inner())
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()
                .map_err(BoardRepositoryError::persistence)?;
            let Some(row) = row else {
                return Ok(None);
            };

            let member_ids: Vec<uuid::Uuid> = board_members::table
                .filter(board_members::board_id.eq(id.into_inner()))
                .select(board_members::user_id)
                .load(connection)
                .map_err(BoardRepositoryError::persistence)?;
            row_to_board(row, member_ids).map(Some)
        })
        .await
    }

    async fn list_for_user(&self, user: UserId) -> BoardRepositoryResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            let joined_ids: Vec<uuid::Uuid> = board_members::table
                .filter(board_members::user_id.eq(user.into_inner()))
                .select(board_members::board_id)
                .load(connection)
                .map_err(BoardRepositoryError::persistence)?;

            let rows: Vec<BoardRow> = boards::table
                .filter(
                    boards::owner_id
                        .eq(user.into_inner())
                        .or(boards::id.eq_any(&joined_ids)),
                )
                .order(boards::id.asc())
                .select(BoardRow::as_select())
                .load(connection)
                .map_err(BoardRepositoryError::persistence)?;

            let board_ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
            let memberships: Vec<BoardMemberRow> = board_members::table
                .filter(board_members::board_id.eq_any(&board_ids))
                .load(connection)
                .map_err(BoardRepositoryError::persistence)?;

            let mut members_by_board: HashMap<uuid::Uuid, Vec<uuid::Uuid>> = HashMap::new();
            for membership in memberships {
                members_by_board
                    .entry(membership.board_id)
                    .or_default()
                    .push(membership.user_id);
            }

            rows.into_iter()
                .map(|row| {
                    let member_ids = members_by_board.remove(&row.id).unwrap_or_default();
                    row_to_board(row, member_ids)
                })
                .collect()
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresKanbanRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = task_to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_new_row(task);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set((
                    tasks::title.eq(&row.title),
                    tasks::description.eq(&row.description),
                    tasks::priority.eq(&row.priority),
                    tasks::status.eq(&row.status),
                    tasks::due_date.eq(row.due_date),
                    tasks::assignee_id.eq(row.assignee_id),
                    tasks::reviewer_id.eq(row.reviewer_id),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;

            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = connection
                .transaction::<_, DieselError, _>(|connection| {
                    diesel::delete(comments::table.filter(comments::task_id.eq(id.into_inner())))
                        .execute(connection)?;
                    diesel::delete(tasks::table.find(id.into_inner())).execute(connection)
                })
                .map_err(TaskRepositoryError::persistence)?;

            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_board(&self, board: BoardId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows: Vec<TaskRow> = tasks::table
                .filter(tasks::board_id.eq(board.into_inner()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_assigned_to(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows: Vec<TaskRow> = tasks::table
                .filter(tasks::assignee_id.eq(user.into_inner()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_reviewing(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows: Vec<TaskRow> = tasks::table
                .filter(tasks::reviewer_id.eq(user.into_inner()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for PostgresKanbanRepository {
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let comment_id = comment.id();
        let new_row = comment_to_new_row(comment);

        self.run_blocking(move |connection| {
            diesel::insert_into(comments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CommentRepositoryError::DuplicateComment(comment_id)
                    }
                    _ => CommentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: CommentId) -> CommentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(comments::table.find(id.into_inner()))
                .execute(connection)
                .map_err(CommentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(CommentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>> {
        self.run_blocking(move |connection| {
            let row = comments::table
                .find(id.into_inner())
                .select(CommentRow::as_select())
                .first::<CommentRow>(connection)
                .optional()
                .map_err(CommentRepositoryError::persistence)?;
            Ok(row.map(row_to_comment))
        })
        .await
    }

    async fn list_for_task(&self, task: TaskId) -> CommentRepositoryResult<Vec<Comment>> {
        self.run_blocking(move |connection| {
            let rows: Vec<CommentRow> = comments::table
                .filter(comments::task_id.eq(task.into_inner()))
                .order(comments::created_at.asc())
                .select(CommentRow::as_select())
                .load(connection)
                .map_err(CommentRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_comment).collect())
        })
        .await
    }
}

fn board_to_new_row(board: &Board) -> NewBoardRow {
    NewBoardRow {
        id: board.id().into_inner(),
        title: board.title().as_str().to_owned(),
        owner_id: board.owner().into_inner(),
    }
}

fn board_to_member_rows(board: &Board) -> Vec<BoardMemberRow> {
    board
        .members()
        .iter()
        .map(|member| BoardMemberRow {
            board_id: board.id().into_inner(),
            user_id: member.into_inner(),
        })
        .collect()
}

fn row_to_board(row: BoardRow, member_ids: Vec<uuid::Uuid>) -> BoardRepositoryResult<Board> {
    let title = Title::new(row.title).map_err(BoardRepositoryError::invalid_persisted_data)?;
    let members: BTreeSet<UserId> = member_ids.into_iter().map(UserId::from_uuid).collect();

    Ok(Board::from_persisted(PersistedBoardData {
        id: BoardId::from_uuid(row.id),
        title,
        owner: UserId::from_uuid(row.owner_id),
        members,
    }))
}

fn task_to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        board_id: task.board().into_inner(),
        assignee_id: task.assignee().map(UserId::into_inner),
        reviewer_id: task.reviewer().map(UserId::into_inner),
        owner_id: task.owner().into_inner(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = Title::new(row.title).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = TaskPriority::try_from(row.priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let status = TaskStatus::try_from(row.status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description: row.description,
        priority,
        status,
        due_date: row.due_date,
        board: BoardId::from_uuid(row.board_id),
        assignee: row.assignee_id.map(UserId::from_uuid),
        reviewer: row.reviewer_id.map(UserId::from_uuid),
        owner: UserId::from_uuid(row.owner_id),
    }))
}

fn comment_to_new_row(comment: &Comment) -> NewCommentRow {
    NewCommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task().into_inner(),
        author_id: comment.author().into_inner(),
        created_at: comment.created_at(),
        content: comment.content().to_owned(),
    }
}

fn row_to_comment(row: CommentRow) -> Comment {
    Comment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        task: TaskId::from_uuid(row.task_id),
        author: UserId::from_uuid(row.author_id),
        created_at: row.created_at,
        content: row.content,
    })
}
