//! Shared harness for API handler tests over the in-memory adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;

use taskboard::api::error::ApiError;
use taskboard::api::payloads::{AuthResponse, RegistrationBody};
use taskboard::api::{auth, boards};
use taskboard::board::adapters::memory::InMemoryKanbanStore;
use taskboard::board::domain::BoardId;
use taskboard::board::services::{BoardService, CommentService, TaskService};
use taskboard::identity::adapters::memory::{InMemoryCredentialStore, InMemoryUserRepository};
use taskboard::identity::domain::UserId;
use taskboard::identity::services::IdentityService;

/// Identity service over the in-memory adapters.
pub type Identity = IdentityService<InMemoryUserRepository, InMemoryCredentialStore>;

/// Board service over the in-memory adapters.
pub type Boards = BoardService<
    InMemoryKanbanStore,
    InMemoryKanbanStore,
    InMemoryKanbanStore,
    InMemoryUserRepository,
>;

/// Task service over the in-memory adapters.
pub type Tasks = TaskService<
    InMemoryKanbanStore,
    InMemoryKanbanStore,
    InMemoryKanbanStore,
    InMemoryUserRepository,
>;

/// Comment service over the in-memory adapters.
pub type Comments = CommentService<
    InMemoryKanbanStore,
    InMemoryKanbanStore,
    InMemoryKanbanStore,
    InMemoryUserRepository,
    DefaultClock,
>;

/// The full application wired over shared in-memory state.
pub struct App {
    /// Identity service.
    pub identity: Identity,
    /// Board service.
    pub boards: Boards,
    /// Task service.
    pub tasks: Tasks,
    /// Comment service.
    pub comments: Comments,
}

/// Provides a fresh application for each test.
#[fixture]
pub fn app() -> App {
    let store = Arc::new(InMemoryKanbanStore::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let credentials = Arc::new(InMemoryCredentialStore::new());

    App {
        identity: IdentityService::new(Arc::clone(&users), credentials),
        boards: BoardService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&users),
        ),
        tasks: TaskService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&users),
        ),
        comments: CommentService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            store,
            users,
            Arc::new(DefaultClock),
        ),
    }
}

impl App {
    /// Registers an account through the handler and returns the session.
    pub async fn register(&self, fullname: &str, email: &str) -> AuthResponse {
        let body: RegistrationBody = serde_json::from_value(serde_json::json!({
            "fullname": fullname,
            "email": email,
            "password": "s3cret",
            "repeated_password": "s3cret",
        }))
        .expect("valid body");
        auth::register(&self.identity, body).await.expect("register")
    }

    /// Resolves a session's token to the acting user through the handler.
    pub async fn actor(&self, session: &AuthResponse) -> UserId {
        let header = format!("Token {}", session.token);
        auth::authenticate(&self.identity, Some(&header))
            .await
            .expect("authenticate")
    }

    /// Creates a board through the handler and returns its ID.
    pub async fn create_board(&self, actor: UserId, members: &[UserId]) -> BoardId {
        let body = serde_json::from_value(serde_json::json!({
            "title": "Roadmap",
            "members": members,
        }))
        .expect("valid body");
        let payload = boards::create_board(&self.boards, actor, body)
            .await
            .expect("create board");
        payload.id
    }
}

/// Returns the status code and JSON body an error surfaces as.
pub fn error_response(err: &ApiError) -> (u16, Value) {
    (err.status(), err.body())
}
