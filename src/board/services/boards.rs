//! Board workflows: membership-scoped listing, creation, detail assembly,
//! updates, and owner-only deletion.

use std::sync::Arc;

use thiserror::Error;

use crate::board::domain::{Board, BoardDomainError, BoardId, Task, TaskStatus, Title};
use crate::board::ports::{
    BoardRepository, BoardRepositoryError, CommentRepository, CommentRepositoryError,
    TaskRepository, TaskRepositoryError,
};
use crate::board::services::tasks::{TaskOverview, task_overview};
use crate::identity::domain::{User, UserId};
use crate::identity::ports::repository::{UserRepository, UserRepositoryError};
use crate::policy::{Operation, PolicyDenial, Resource, authorize};

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// A board with the aggregate counts its list view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    /// The board itself.
    pub board: Board,
    /// Number of members, excluding the owner unless listed.
    pub member_count: usize,
    /// Total number of tasks on the board.
    pub ticket_count: usize,
    /// Number of tasks still in the to-do column.
    pub tasks_to_do_count: usize,
    /// Number of tasks whose status reads "high".
    ///
    /// Status, not priority: no status renders as "high", so this stays at
    /// zero. The count is kept as published because clients already consume
    /// the field.
    pub tasks_high_prio_count: usize,
}

/// A board joined with its member records and task overviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDetail {
    /// The board itself.
    pub board: Board,
    /// Resolved member accounts.
    pub members: Vec<User>,
    /// Tasks on the board with their read-view joins.
    pub tasks: Vec<TaskOverview>,
}

/// Result of a board update: the new state with resolved user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    /// The updated board.
    pub board: Board,
    /// Resolved owner account.
    pub owner: User,
    /// Resolved member accounts.
    pub members: Vec<User>,
}

/// Errors returned by board service operations.
#[derive(Debug, Clone, Error)]
pub enum BoardServiceError {
    /// Domain validation failure.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The policy engine refused the operation.
    #[error(transparent)]
    Denied(#[from] PolicyDenial),

    /// The addressed board does not exist.
    #[error("Board not found.")]
    NotFound(BoardId),

    /// A requested member does not exist.
    #[error("User not found.")]
    UnknownMember(UserId),

    /// The board's owner record is missing from the user store.
    #[error("board owner record missing: {0}")]
    OwnerMissing(UserId),

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

/// Application service for board workflows.
#[derive(Debug)]
pub struct BoardService<B, T, C, U> {
    boards: Arc<B>,
    tasks: Arc<T>,
    comments: Arc<C>,
    users: Arc<U>,
}

impl<B, T, C, U> Clone for BoardService<B, T, C, U> {
    fn clone(&self) -> Self {
        Self {
            boards: Arc::clone(&self.boards),
            tasks: Arc::clone(&self.tasks),
            comments: Arc::clone(&self.comments),
            users: Arc::clone(&self.users),
        }
    }
}

impl<B, T, C, U> BoardService<B, T, C, U>
where
    B: BoardRepository,
    T: TaskRepository,
    C: CommentRepository,
    U: UserRepository,
{
    /// Creates a board service over the given repositories.
    pub const fn new(boards: Arc<B>, tasks: Arc<T>, comments: Arc<C>, users: Arc<U>) -> Self {
        Self {
            boards,
            tasks,
            comments,
            users,
        }
    }

    /// Lists the boards the actor owns or belongs to, with counts.
    ///
    /// Visibility is decided entirely by the repository scope; no per-item
    /// authorization follows.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the underlying repositories.
    pub async fn list(&self, actor: UserId) -> BoardServiceResult<Vec<BoardSummary>> {
        let boards = self.boards.list_for_user(actor).await?;
        let mut summaries = Vec::with_capacity(boards.len());
        for board in boards {
            summaries.push(self.summarize(board).await?);
        }
        Ok(summaries)
    }

    /// Creates a board owned by the actor.
    ///
    /// Every requested member must exist; any authenticated user may create
    /// boards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::UnknownMember`] when a member identifier
    /// does not resolve to a user.
    pub async fn create(
        &self,
        actor: UserId,
        title: Title,
        members: Vec<UserId>,
    ) -> BoardServiceResult<BoardSummary> {
        self.require_users(&members).await?;
        let board = Board::new(title, actor, members);
        self.boards.store(&board).await?;
        self.summarize(board).await
    }

    /// Returns a board with its members and task overviews.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NotFound`] for an unknown board or a
    /// [`PolicyDenial`] when the actor is neither owner nor member.
    pub async fn detail(&self, actor: UserId, id: BoardId) -> BoardServiceResult<BoardDetail> {
        let board = self.resolve(id).await?;
        authorize(actor, &Resource::Board(&board), Operation::Read)?;

        let member_ids: Vec<UserId> = board.members().iter().copied().collect();
        let members = self.users.find_many(&member_ids).await?;

        let tasks = self.tasks.list_for_board(id).await?;
        let mut overviews = Vec::with_capacity(tasks.len());
        for task in tasks {
            overviews.push(
                task_overview::<_, _, BoardServiceError>(
                    self.users.as_ref(),
                    self.comments.as_ref(),
                    task,
                )
                .await?,
            );
        }

        Ok(BoardDetail {
            board,
            members,
            tasks: overviews,
        })
    }

    /// Updates a board's title and member set.
    ///
    /// Owner and members may update; both fields are optional and applied
    /// as one logical write.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NotFound`] for an unknown board, a
    /// [`PolicyDenial`] for outsiders, or
    /// [`BoardServiceError::UnknownMember`] when a requested member does not
    /// exist.
    pub async fn update(
        &self,
        actor: UserId,
        id: BoardId,
        title: Option<Title>,
        members: Option<Vec<UserId>>,
    ) -> BoardServiceResult<BoardUpdate> {
        let mut board = self.resolve(id).await?;
        authorize(actor, &Resource::Board(&board), Operation::Update)?;

        if let Some(members) = &members {
            self.require_users(members).await?;
        }

        if let Some(title) = title {
            board.rename(title);
        }
        if let Some(members) = members {
            board.replace_members(members);
        }
        self.boards.update(&board).await?;

        let owner = self
            .users
            .find_by_id(board.owner())
            .await?
            .ok_or(BoardServiceError::OwnerMissing(board.owner()))?;
        let member_ids: Vec<UserId> = board.members().iter().copied().collect();
        let members = self.users.find_many(&member_ids).await?;

        Ok(BoardUpdate {
            board,
            owner,
            members,
        })
    }

    /// Deletes a board, cascading to tasks and comments.
    ///
    /// Owner only; members are denied.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NotFound`] for an unknown board or a
    /// [`PolicyDenial`] for non-owners.
    pub async fn delete(&self, actor: UserId, id: BoardId) -> BoardServiceResult<()> {
        let board = self.resolve(id).await?;
        authorize(actor, &Resource::Board(&board), Operation::Delete)?;
        self.boards.delete(id).await?;
        Ok(())
    }

    async fn resolve(&self, id: BoardId) -> BoardServiceResult<Board> {
        self.boards
            .find_by_id(id)
            .await?
            .ok_or(BoardServiceError::NotFound(id))
    }

    async fn require_users(&self, ids: &[UserId]) -> BoardServiceResult<()> {
        let found = self.users.find_many(ids).await?;
        let known: std::collections::BTreeSet<UserId> =
            found.iter().map(User::id).collect();
        if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
            return Err(BoardServiceError::UnknownMember(*missing));
        }
        Ok(())
    }

    async fn summarize(&self, board: Board) -> BoardServiceResult<BoardSummary> {
        let tasks = self.tasks.list_for_board(board.id()).await?;
        let member_count = board.members().len();
        let ticket_count = tasks.len();
        let tasks_to_do_count = tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::ToDo)
            .count();
        let tasks_high_prio_count = tasks
            .iter()
            .filter(|task| is_high_status(task))
            .count();

        Ok(BoardSummary {
            board,
            member_count,
            ticket_count,
            tasks_to_do_count,
            tasks_high_prio_count,
        })
    }
}

/// The published count filters on status, not priority, and no status value
/// renders as "high".
fn is_high_status(task: &Task) -> bool {
    task.status().as_str() == "high"
}
