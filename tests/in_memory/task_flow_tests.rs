//! Handler tests for the task surface: creation guards, reference
//! validation, the board-change rejection, and two-stage deletion.

use rstest::rstest;
use serde_json::json;

use crate::in_memory::helpers::{App, app, error_response};
use taskboard::api::payloads::TaskPayload;
use taskboard::api::tasks;
use taskboard::board::domain::BoardId;
use taskboard::identity::domain::UserId;

async fn task_on_board(app: &App, board: BoardId, actor: UserId) -> TaskPayload {
    let body = serde_json::from_value(json!({
        "board": board,
        "title": "Ship it",
        "description": "Wire the final handler.",
        "status": "in-progress",
        "priority": "high",
    }))
    .expect("valid body");
    tasks::create_task(&app.tasks, actor, body)
        .await
        .expect("create task")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_payload_echoes_the_request(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let ada_id = app.actor(&ada).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let task = task_on_board(&app, board_id, ada_id).await;
    let payload = serde_json::to_value(&task).expect("serialize");

    assert_eq!(payload["board"], serde_json::to_value(board_id).expect("id"));
    assert_eq!(payload["title"], "Ship it");
    assert_eq!(payload["status"], "in-progress");
    assert_eq!(payload["priority"], "high");
    assert_eq!(payload["comments_count"], 0);
    assert!(payload["assignee"].is_null());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_may_not_create_tasks(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let eve = app.register("eve evil", "eve@example.com").await;
    let ada_id = app.actor(&ada).await;
    let eve_id = app.actor(&eve).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Sneaky",
    }))
    .expect("valid body");
    let err = tasks::create_task(&app.tasks, eve_id, body)
        .await
        .expect_err("denied");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 403);
    assert_eq!(
        payload,
        json!({ "detail": "You are not allowed to create tasks for this board." })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_outside_the_board_is_a_403(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let dave = app.register("dave drifter", "dave@example.com").await;
    let ada_id = app.actor(&ada).await;
    let dave_id = app.actor(&dave).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Ship it",
        "assignee_id": dave_id,
    }))
    .expect("valid body");
    let err = tasks::create_task(&app.tasks, ada_id, body)
        .await
        .expect_err("assignee not on board");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 403);
    assert_eq!(payload, json!({ "detail": "Assignee must be a member of the board." }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_reviewer_is_a_field_scoped_400(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let ada_id = app.actor(&ada).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Ship it",
        "reviewer_id": uuid::Uuid::new_v4(),
    }))
    .expect("valid body");
    let err = tasks::create_task(&app.tasks, ada_id, body)
        .await
        .expect_err("unknown reviewer");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "reviewer_id": "User not found." }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_is_a_field_scoped_400(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let ada_id = app.actor(&ada).await;
    let board_id = app.create_board(ada_id, &[]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "Ship it",
        "status": "blocked",
    }))
    .expect("valid body");
    let err = tasks::create_task(&app.tasks, ada_id, body)
        .await
        .expect_err("unknown status");

    assert_eq!(err.status(), 400);
    assert!(err.body().get("status").is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn any_board_key_in_a_patch_is_rejected(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let ada_id = app.actor(&ada).await;
    let board_id = app.create_board(ada_id, &[]).await;
    let task = task_on_board(&app, board_id, ada_id).await;

    for board_value in [json!(uuid::Uuid::new_v4()), json!(null), json!(board_id)] {
        let body = serde_json::from_value(json!({
            "board": board_value,
            "title": "Renamed",
        }))
        .expect("valid body");
        let err = tasks::update_task(&app.tasks, ada_id, task.id, body)
            .await
            .expect_err("board change rejected");

        let (status, payload) = error_response(&err);
        assert_eq!(status, 400);
        assert_eq!(payload, json!({ "detail": "Modification of the board is not allowed." }));
    }

    // The task is untouched by the rejected patches.
    let body = serde_json::from_value(json!({})).expect("valid body");
    let unchanged = tasks::update_task(&app.tasks, ada_id, task.id, body)
        .await
        .expect("noop patch");
    assert_eq!(unchanged.title, "Ship it");
    assert_eq!(unchanged.status, taskboard::board::domain::TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn patches_without_a_board_key_apply(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let board_id = app.create_board(ada_id, &[bob_id]).await;
    let task = task_on_board(&app, board_id, ada_id).await;

    let body = serde_json::from_value(json!({
        "status": "done",
        "assignee_id": bob_id,
    }))
    .expect("valid body");
    let updated = tasks::update_task(&app.tasks, bob_id, task.id, body)
        .await
        .expect("update");

    let payload = serde_json::to_value(&updated).expect("serialize");
    assert_eq!(payload["status"], "done");
    assert_eq!(payload["assignee"]["fullname"], "Bob Beamer");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_members_hit_the_membership_gate(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let eve = app.register("eve evil", "eve@example.com").await;
    let ada_id = app.actor(&ada).await;
    let eve_id = app.actor(&eve).await;
    let board_id = app.create_board(ada_id, &[]).await;
    let task = task_on_board(&app, board_id, ada_id).await;

    let body = serde_json::from_value(json!({ "status": "done" })).expect("valid body");
    let err = tasks::update_task(&app.tasks, eve_id, task.id, body)
        .await
        .expect_err("gate");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 403);
    assert_eq!(
        payload,
        json!({ "detail": "You must be a member of this board to modify its tasks." })
    );

    let err = tasks::delete_task(&app.tasks, eve_id, task.id)
        .await
        .expect_err("gate");
    assert_eq!(err.status(), 403);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_is_for_task_or_board_owners(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let carol = app.register("carol coder", "carol@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let carol_id = app.actor(&carol).await;
    let board_id = app.create_board(ada_id, &[bob_id, carol_id]).await;
    let task = task_on_board(&app, board_id, bob_id).await;

    let err = tasks::delete_task(&app.tasks, carol_id, task.id)
        .await
        .expect_err("fellow member may not delete");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 403);
    assert_eq!(
        payload,
        json!({ "detail": "Only the task creator or the board owner may delete this task." })
    );

    tasks::delete_task(&app.tasks, bob_id, task.id)
        .await
        .expect("creator delete");

    let task = task_on_board(&app, board_id, bob_id).await;
    tasks::delete_task(&app.tasks, ada_id, task.id)
        .await
        .expect("board owner delete");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_and_reviewing_lists_follow_the_references(app: App) {
    let ada = app.register("ada lovelace", "ada@example.com").await;
    let bob = app.register("bob beamer", "bob@example.com").await;
    let ada_id = app.actor(&ada).await;
    let bob_id = app.actor(&bob).await;
    let board_id = app.create_board(ada_id, &[bob_id]).await;

    let body = serde_json::from_value(json!({
        "board": board_id,
        "title": "For Bob",
        "assignee_id": bob_id,
        "reviewer_id": ada_id,
    }))
    .expect("valid body");
    tasks::create_task(&app.tasks, ada_id, body).await.expect("create task");

    let assigned = tasks::assigned_to_me(&app.tasks, bob_id).await.expect("list");
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].title, "For Bob");

    let reviewing = tasks::reviewing(&app.tasks, ada_id).await.expect("list");
    assert_eq!(reviewing.len(), 1);

    assert!(tasks::assigned_to_me(&app.tasks, ada_id).await.expect("list").is_empty());
}
