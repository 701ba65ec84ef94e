//! Rule chains and the decision procedure behind [`authorize`].

use thiserror::Error;

use crate::board::domain::{Board, Comment, Task};
use crate::identity::domain::UserId;

/// Operation an actor wants to perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read a resource or list a collection scoped to it.
    Read,
    /// Create a new entity under the resource.
    Create,
    /// Modify an existing entity.
    Update,
    /// Remove an entity.
    Delete,
}

/// Resource addressed by a request, borrowed together with the relations the
/// rules need.
///
/// Tasks carry their board because task rules are decided by board
/// membership; comments addressed for deletion need only the comment itself.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// A board as a whole.
    Board(&'a Board),
    /// The task collection of a board, targeted by task creation.
    TaskCollection {
        /// Board the new task would belong to.
        board: &'a Board,
    },
    /// A single task, with the board it belongs to.
    Task {
        /// The addressed task.
        task: &'a Task,
        /// Board the task belongs to.
        board: &'a Board,
    },
    /// The comment thread of a task, targeted by comment reads and creation.
    CommentThread {
        /// Board of the task the thread hangs off.
        board: &'a Board,
    },
    /// A single comment.
    Comment(&'a Comment),
}

/// Reason an operation was denied.
///
/// Each variant keeps its own message so callers can surface denials
/// verbatim and tests can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyDenial {
    /// Actor is neither owner nor member of the board.
    #[error("You do not have access to this board.")]
    BoardAccess,
    /// Board deletion is reserved for the owner.
    #[error("Only the board owner may delete the board.")]
    BoardDeleteOwnerOnly,
    /// Actor may not create tasks on a board they do not belong to.
    #[error("You are not allowed to create tasks for this board.")]
    TaskCreateMembership,
    /// Actor is not a member of the board a task belongs to.
    ///
    /// Distinct from the other task denials: membership is the gate for any
    /// task modification, so this failure ends rule evaluation outright.
    #[error("You must be a member of this board to modify its tasks.")]
    NotBoardMember,
    /// Task deletion is reserved for the task creator and the board owner.
    #[error("Only the task creator or the board owner may delete this task.")]
    TaskDeleteOwnerOnly,
    /// Actor may not read or write the comment thread of a foreign board.
    #[error("You do not have access to this board.")]
    CommentThreadAccess,
    /// Comment deletion is reserved for the author, with no owner override.
    #[error("Only the author may delete this comment.")]
    CommentDeleteAuthorOnly,
    /// No rule chain covers the resource/operation pair.
    #[error("This operation is not supported for the addressed resource.")]
    UnsupportedOperation,
}

/// Outcome of a single rule in a chain.
enum Decision {
    Allow,
    Deny(PolicyDenial),
    NotApplicable,
}

type Rule = fn(UserId, &Resource<'_>, Operation) -> Decision;

/// Decides whether `actor` may perform `operation` on `resource`.
///
/// Rules are evaluated in chain order; the first `Allow` or `Deny` wins. A
/// chain that produces neither, or a pair with no chain at all, denies with
/// [`PolicyDenial::UnsupportedOperation`].
///
/// # Errors
///
/// Returns the [`PolicyDenial`] describing why access was refused.
pub fn authorize(
    actor: UserId,
    resource: &Resource<'_>,
    operation: Operation,
) -> Result<(), PolicyDenial> {
    for rule in rule_chain(resource, operation) {
        match rule(actor, resource, operation) {
            Decision::Allow => return Ok(()),
            Decision::Deny(denial) => return Err(denial),
            Decision::NotApplicable => {}
        }
    }
    Err(PolicyDenial::UnsupportedOperation)
}

fn rule_chain(resource: &Resource<'_>, operation: Operation) -> &'static [Rule] {
    match (resource, operation) {
        (Resource::Board(_), Operation::Read | Operation::Update) => &[board_owner_or_member],
        (Resource::Board(_), Operation::Delete) => &[board_owner_only],
        (Resource::TaskCollection { .. }, Operation::Create) => &[task_creation_membership],
        (Resource::Task { .. }, Operation::Read | Operation::Update) => {
            &[require_board_membership, allow]
        }
        (Resource::Task { .. }, Operation::Delete) => {
            &[require_board_membership, task_or_board_owner]
        }
        (Resource::CommentThread { .. }, Operation::Read | Operation::Create) => {
            &[comment_thread_membership]
        }
        (Resource::Comment(_), Operation::Delete) => &[comment_author_only],
        _ => &[],
    }
}

fn board_owner_or_member(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::Board(board) = resource else {
        return Decision::NotApplicable;
    };
    if board.grants_access(actor) {
        Decision::Allow
    } else {
        Decision::Deny(PolicyDenial::BoardAccess)
    }
}

fn board_owner_only(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::Board(board) = resource else {
        return Decision::NotApplicable;
    };
    if board.is_owner(actor) {
        Decision::Allow
    } else {
        Decision::Deny(PolicyDenial::BoardDeleteOwnerOnly)
    }
}

fn task_creation_membership(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::TaskCollection { board } = resource else {
        return Decision::NotApplicable;
    };
    if board.grants_access(actor) {
        Decision::Allow
    } else {
        Decision::Deny(PolicyDenial::TaskCreateMembership)
    }
}

/// Gate rule: membership in the task's board is necessary for any task
/// operation but decides nothing on its own when it holds.
fn require_board_membership(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::Task { board, .. } = resource else {
        return Decision::NotApplicable;
    };
    if board.grants_access(actor) {
        Decision::NotApplicable
    } else {
        Decision::Deny(PolicyDenial::NotBoardMember)
    }
}

fn task_or_board_owner(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::Task { task, board } = resource else {
        return Decision::NotApplicable;
    };
    if task.owner() == actor || board.is_owner(actor) {
        Decision::Allow
    } else {
        Decision::Deny(PolicyDenial::TaskDeleteOwnerOnly)
    }
}

fn comment_thread_membership(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::CommentThread { board } = resource else {
        return Decision::NotApplicable;
    };
    if board.grants_access(actor) {
        Decision::Allow
    } else {
        Decision::Deny(PolicyDenial::CommentThreadAccess)
    }
}

fn comment_author_only(actor: UserId, resource: &Resource<'_>, _: Operation) -> Decision {
    let Resource::Comment(comment) = resource else {
        return Decision::NotApplicable;
    };
    if comment.author() == actor {
        Decision::Allow
    } else {
        Decision::Deny(PolicyDenial::CommentDeleteAuthorOnly)
    }
}

fn allow(_: UserId, _: &Resource<'_>, _: Operation) -> Decision {
    Decision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::domain::{Board, Comment, PersistedCommentData, Task, Title};
    use crate::board::domain::{CommentId, TaskId};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn owner() -> UserId {
        UserId::new()
    }

    #[fixture]
    fn member() -> UserId {
        UserId::new()
    }

    #[fixture]
    fn outsider() -> UserId {
        UserId::new()
    }

    fn board_with(owner: UserId, member: UserId) -> Board {
        Board::new(
            Title::new("Roadmap").expect("valid title"),
            owner,
            [member],
        )
    }

    fn comment_by(author: UserId) -> Comment {
        Comment::from_persisted(PersistedCommentData {
            id: CommentId::new(),
            task: TaskId::new(),
            author,
            created_at: Utc::now(),
            content: "Looks good.".into(),
        })
    }

    #[rstest]
    fn owner_and_member_read_board(owner: UserId, member: UserId, outsider: UserId) {
        let board = board_with(owner, member);
        assert!(authorize(owner, &Resource::Board(&board), Operation::Read).is_ok());
        assert!(authorize(member, &Resource::Board(&board), Operation::Read).is_ok());
        assert_eq!(
            authorize(outsider, &Resource::Board(&board), Operation::Read),
            Err(PolicyDenial::BoardAccess)
        );
    }

    #[rstest]
    fn only_owner_deletes_board(owner: UserId, member: UserId) {
        let board = board_with(owner, member);
        assert!(authorize(owner, &Resource::Board(&board), Operation::Delete).is_ok());
        assert_eq!(
            authorize(member, &Resource::Board(&board), Operation::Delete),
            Err(PolicyDenial::BoardDeleteOwnerOnly)
        );
    }

    #[rstest]
    fn task_creation_requires_board_access(owner: UserId, member: UserId, outsider: UserId) {
        let board = board_with(owner, member);
        let collection = Resource::TaskCollection { board: &board };
        assert!(authorize(member, &collection, Operation::Create).is_ok());
        assert_eq!(
            authorize(outsider, &collection, Operation::Create),
            Err(PolicyDenial::TaskCreateMembership)
        );
    }

    #[rstest]
    fn non_member_task_update_fails_with_membership_denial(
        owner: UserId,
        member: UserId,
        outsider: UserId,
    ) {
        let board = board_with(owner, member);
        let task = Task::new(board.id(), member, Title::new("Ship it").expect("valid title"));
        let resource = Resource::Task {
            task: &task,
            board: &board,
        };
        assert!(authorize(member, &resource, Operation::Update).is_ok());
        assert_eq!(
            authorize(outsider, &resource, Operation::Update),
            Err(PolicyDenial::NotBoardMember)
        );
    }

    #[rstest]
    fn task_deletion_needs_membership_then_ownership(
        owner: UserId,
        member: UserId,
        outsider: UserId,
    ) {
        let other_member = UserId::new();
        let mut board = board_with(owner, member);
        board.replace_members([member, other_member]);
        let task = Task::new(board.id(), member, Title::new("Ship it").expect("valid title"));
        let resource = Resource::Task {
            task: &task,
            board: &board,
        };

        assert!(authorize(member, &resource, Operation::Delete).is_ok());
        assert!(authorize(owner, &resource, Operation::Delete).is_ok());
        assert_eq!(
            authorize(other_member, &resource, Operation::Delete),
            Err(PolicyDenial::TaskDeleteOwnerOnly)
        );
        assert_eq!(
            authorize(outsider, &resource, Operation::Delete),
            Err(PolicyDenial::NotBoardMember)
        );
    }

    #[rstest]
    fn comment_deletion_is_author_scoped(owner: UserId, member: UserId) {
        let comment = comment_by(member);
        assert!(authorize(member, &Resource::Comment(&comment), Operation::Delete).is_ok());
        // Board or task ownership grants no override here.
        assert_eq!(
            authorize(owner, &Resource::Comment(&comment), Operation::Delete),
            Err(PolicyDenial::CommentDeleteAuthorOnly)
        );
    }

    #[rstest]
    fn uncovered_pairs_are_denied(owner: UserId, member: UserId) {
        let board = board_with(owner, member);
        assert_eq!(
            authorize(owner, &Resource::TaskCollection { board: &board }, Operation::Delete),
            Err(PolicyDenial::UnsupportedOperation)
        );
    }

    #[rstest]
    fn repeated_calls_return_the_same_decision(owner: UserId, member: UserId, outsider: UserId) {
        let board = board_with(owner, member);
        let first = authorize(outsider, &Resource::Board(&board), Operation::Update);
        let second = authorize(outsider, &Resource::Board(&board), Operation::Update);
        assert_eq!(first, second);
        assert!(authorize(owner, &Resource::Board(&board), Operation::Update).is_ok());
        assert!(authorize(owner, &Resource::Board(&board), Operation::Update).is_ok());
    }
}
