//! Handler tests for the board surface: listing with counts, detail
//! payloads, updates, and owner-only cascading deletion.

use rstest::rstest;
use serde_json::json;

use crate::in_memory::helpers::{App, app, error_response};
use taskboard::api::{boards, tasks};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_shows_only_owned_and_joined_boards(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let eve = app.register("eve evil", "eve@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let eve_id = app.actor(&eve).await;

    let owned = app.create_board(ada_id, &[]).await;
    let joined = app.create_board(bob_id, &[ada_id]).await;
    let foreign = app.create_board(eve_id, &[]).await;

    let listed = boards::list_boards(&app.boards, ada_id).await.expect("list");
    let ids: Vec<_> = listed.iter().map(|board| board.id).collect();
    assert!(ids.contains(&owned));
    assert!(ids.contains(&joined));
    assert!(!ids.contains(&foreign));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_payload_carries_counts_and_owner(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let ada_id = app.actor(&ada).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Ship the parser",
        "priority": "high",
    }))
    .expect("valid body");
    tasks::create_task(&app.tasks, ada_id, body).await.expect("create task");

    let listed = boards::list_boards(&app.boards, ada_id).await.expect("list");
    let payload = serde_json::to_value(&listed[0]).expect("serialize");

    assert_eq!(payload["title"], "Roadmap");
    assert_eq!(payload["member_count"], 0);
    assert_eq!(payload["ticket_count"], 1);
    assert_eq!(payload["tasks_to_do_count"], 1);
    // Counts by status, so a high-priority task does not register here.
    assert_eq!(payload["tasks_high_prio_count"], 0);
    assert_eq!(payload["owner_id"], serde_json::to_value(ada_id).expect("id"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_get_a_403_detail_on_board_access(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let eve = app.register("eve evil", "eve@example.com").await;
    let ada_id = app.actor(&ada).await;
    let eve_id = app.actor(&eve).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let err = boards::board_detail(&app.boards, eve_id, board_id)
        .await
        .expect_err("denied");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 403);
    assert_eq!(payload, json!({ "detail": "You do not have access to this board." }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_returns_owner_and_member_data(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let board_id = app.create_board(ada_id, &[bob_id]).await;

    let body = serde_json::from_value(json!({
        "title": "Renamed",
        "members": [bob_id],
    }))
    .expect("valid body");
    let update = boards::update_board(&app.boards, bob_id, board_id, body)
        .await
        .expect("update");

    let payload = serde_json::to_value(&update).expect("serialize");
    assert_eq!(payload["title"], "Renamed");
    assert_eq!(payload["owner_data"]["fullname"], "Ada Lovelace");
    assert_eq!(payload["members_data"][0]["fullname"], "Bob Beamer");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_members_fail_board_updates(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let ada_id = app.actor(&ada).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let body = serde_json::from_value(json!({
        "members": [uuid::Uuid::new_v4()],
    }))
    .expect("valid body");
    let err = boards::update_board(&app.boards, ada_id, board_id, body)
        .await
        .expect_err("unknown member");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "members": "User not found." }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_owner_may_delete_and_deletion_cascades(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let board_id = app.create_board(ada_id, &[bob_id]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Ship it",
    }))
    .expect("valid body");
    let task = tasks::create_task(&app.tasks, bob_id, body)
        .await
        .expect("create task");

    let err = boards::delete_board(&app.boards, bob_id, board_id)
        .await
        .expect_err("member may not delete");
    assert_eq!(err.status(), 403);

    boards::delete_board(&app.boards, ada_id, board_id)
        .await
        .expect("owner delete");

    let err = boards::board_detail(&app.boards, ada_id, board_id)
        .await
        .expect_err("board gone");
    assert_eq!(err.status(), 404);

    let err = tasks::delete_task(&app.tasks, ada_id, task.id)
        .await
        .expect_err("task gone with the board");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 404);
    assert_eq!(payload, json!({ "detail": "Task not found." }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn detail_nests_members_and_task_overviews(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let board_id = app.create_board(ada_id, &[bob_id]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Ship it",
        "assignee_id": bob_id,
    }))
    .expect("valid body");
    tasks::create_task(&app.tasks, ada_id, body).await.expect("create task");

    let detail = boards::board_detail(&app.boards, bob_id, board_id)
        .await
        .expect("detail");
    let payload = serde_json::to_value(&detail).expect("serialize");

    assert_eq!(payload["members"][0]["fullname"], "Bob Beamer");
    assert_eq!(payload["tasks"][0]["title"], "Ship it");
    assert_eq!(payload["tasks"][0]["status"], "to-do");
    assert_eq!(payload["tasks"][0]["assignee"]["fullname"], "Bob Beamer");
    assert_eq!(payload["tasks"][0]["comments_count"], 0);
}
