//! Board aggregate root.

use super::{BoardId, Title};
use crate::identity::domain::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Shared workspace owning tasks, with one owner and a member set.
///
/// The owner is fixed at creation and always has full access, whether or not
/// they also appear in `members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    title: Title,
    owner: UserId,
    members: BTreeSet<UserId>,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted board identifier.
    pub id: BoardId,
    /// Persisted title.
    pub title: Title,
    /// Persisted owner reference.
    pub owner: UserId,
    /// Persisted member set.
    pub members: BTreeSet<UserId>,
}

impl Board {
    /// Creates a new board owned by the given user.
    #[must_use]
    pub fn new(title: Title, owner: UserId, members: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            id: BoardId::new(),
            title,
            owner,
            members: members.into_iter().collect(),
        }
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            owner: data.owner,
            members: data.members,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the owner reference.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the member set.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }

    /// Returns whether the user owns this board.
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns whether the user is a non-owner member of this board.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Returns whether the user may act on this board: owner or member.
    #[must_use]
    pub fn grants_access(&self, user: UserId) -> bool {
        self.is_owner(user) || self.is_member(user)
    }

    /// Replaces the board title.
    pub fn rename(&mut self, title: Title) {
        self.title = title;
    }

    /// Replaces the member set.
    pub fn replace_members(&mut self, members: impl IntoIterator<Item = UserId>) {
        self.members = members.into_iter().collect();
    }
}
