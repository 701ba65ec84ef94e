//! Handler tests for comment threads: payload shape, board-scoped access,
//! and author-only deletion.

use rstest::rstest;
use serde_json::json;

use crate::in_memory::helpers::{App, app, error_response};
use taskboard::api::payloads::CreateCommentBody;
use taskboard::api::{comments, tasks};
use taskboard::board::domain::TaskId;
use taskboard::identity::domain::UserId;

async fn shared_task(app: &App) -> (TaskId, UserId, UserId) {
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
    let task = tasks::create_task(&app.tasks, ada_id, body)
        .await
        .expect("create task");
    (task.id, ada_id, bob_id)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_payload_names_the_author(app: App) {
    let (task_id, _, bob_id) = shared_task(&app).await;

    let body = CreateCommentBody {
        content: "Looks good to me.".to_owned(),
    };
    let created = comments::create_comment(&app.comments, bob_id, task_id, body)
        .await
        .expect("create comment");

    let payload = serde_json::to_value(&created).expect("serialize");
    assert_eq!(payload["author"], "Bob Beamer");
    assert_eq!(payload["content"], "Looks good to me.");
    assert!(payload["created_at"].as_str().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn threads_list_oldest_first_for_members(app: App) {
    let (task_id, ada_id, bob_id) = shared_task(&app).await;

    for (actor, content) in [(ada_id, "First!"), (bob_id, "Second.")] {
        let body = CreateCommentBody {
            content: content.to_owned(),
        };
        comments::create_comment(&app.comments, actor, task_id, body)
            .await
            .expect("create comment");
    }

    let thread = comments::list_comments(&app.comments, ada_id, task_id)
        .await
        .expect("list");
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].content, "First!");
    assert_eq!(thread[1].content, "Second.");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_may_not_touch_the_thread(app: App) {
    let (task_id, _, _) = shared_task(&app).await;
    let eve = app.register("eve evil", "eve@example.com").await;
    let eve_id = app.actor(&eve).await;

    let err = comments::list_comments(&app.comments, eve_id, task_id)
        .await
        .expect_err("denied");
    assert_eq!(err.status(), 403);

    let body = CreateCommentBody {
        content: "Hi".to_owned(),
    };
    let err = comments::create_comment(&app.comments, eve_id, task_id, body)
        .await
        .expect_err("denied");
    assert_eq!(err.status(), 403);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_comments_are_field_scoped_400s(app: App) {
    let (task_id, ada_id, _) = shared_task(&app).await;

    let body = CreateCommentBody {
        content: "   ".to_owned(),
    };
    let err = comments::create_comment(&app.comments, ada_id, task_id, body)
        .await
        .expect_err("blank content");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert!(payload.get("content").is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_is_author_only_even_for_the_board_owner(app: App) {
    let (task_id, ada_id, bob_id) = shared_task(&app).await;

    let body = CreateCommentBody {
        content: "Bob's note".to_owned(),
    };
    let created = comments::create_comment(&app.comments, bob_id, task_id, body)
        .await
        .expect("create comment");

    let err = comments::delete_comment(&app.comments, ada_id, task_id, created.id)
        .await
        .expect_err("board owner gets no override");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 403);
    assert_eq!(payload, json!({ "detail": "Only the author may delete this comment." }));

    comments::delete_comment(&app.comments, bob_id, task_id, created.id)
        .await
        .expect("author delete");

    let thread = comments::list_comments(&app.comments, bob_id, task_id)
        .await
        .expect("list");
    assert!(thread.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_not_reachable_through_other_tasks(app: App) {
    let (task_id, ada_id, _) = shared_task(&app).await;

    let other_board = app.create_board(ada_id, &[]).await;
    let body = serde_json::from_value(json!({
        "board": other_board,
        "title": "Other",
    }))
    .expect("valid body");
    let other_task = tasks::create_task(&app.tasks, ada_id, body)
        .await
        .expect("create task");

    let comment_body = CreateCommentBody {
        content: "On the first task".to_owned(),
    };
    let created = comments::create_comment(&app.comments, ada_id, task_id, comment_body)
        .await
        .expect("create comment");

    let err = comments::delete_comment(&app.comments, ada_id, other_task.id, created.id)
        .await
        .expect_err("wrong task");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 404);
    assert_eq!(payload, json!({ "detail": "Comment not found." }));
}
