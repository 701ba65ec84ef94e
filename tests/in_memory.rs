//! End-to-end tests of the API handlers over the in-memory adapters.
//!
//! Tests are organized into modules by surface:
//! - `auth_tests`: Registration, login, guest login, token resolution
//! - `board_flow_tests`: Board listing, counts, updates, cascading deletion
//! - `task_flow_tests`: Task creation guards, updates, the board-change rule
//! - `comment_tests`: Comment threads and author-scoped deletion

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code indexes into payloads after length checks"
)]

mod in_memory {
    pub mod helpers;

    mod auth_tests;
    mod board_flow_tests;
    mod comment_tests;
    mod task_flow_tests;
}
