mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use parley_server::db;
use parley_shared::constants::DELETED_MESSAGE_CONTENT;
use parley_server::models::{Member, MemberRole, Profile, Server};
use serde_json::{json, Value};

struct Fixture {
    server: TestServer,
    pool: sqlx::SqlitePool,
    srv: Server,
    alice: Profile,
    alice_member: Member,
    bob: Profile,
    bob_member: Member,
}

async fn setup() -> Fixture {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone());
    let server = TestServer::new(app).unwrap();

    let alice = common::create_test_user(&pool, "alice", "Alice").await;
    let bob = common::create_test_user(&pool, "bob", "Bob").await;
    let srv = common::create_test_server(&pool, &alice, "S").await;
    let alice_member = common::member_of(&pool, &srv, &alice).await;
    let bob_member = common::add_member(&pool, &srv, &bob, MemberRole::Guest).await;

    Fixture {
        server,
        pool,
        srv,
        alice,
        alice_member,
        bob,
        bob_member,
    }
}

async fn open_conversation(f: &Fixture, requester: &Profile, member_id: &str) -> axum_test::TestResponse {
    let (h, v) = common::session_cookie(requester);
    f.server
        .post("/api/conversations")
        .add_header(h, v)
        .json(&json!({"serverId": f.srv.id, "memberId": member_id}))
        .await
}

#[tokio::test]
async fn get_or_create_returns_same_conversation_from_both_sides() {
    let f = setup().await;

    let res = open_conversation(&f, &f.alice, &f.bob_member.id).await;
    res.assert_status_ok();
    let first: Value = res.json();
    assert!(first["memberOne"]["profile"]["id"].is_string());

    let again: Value = open_conversation(&f, &f.alice, &f.bob_member.id).await.json();
    let reverse: Value = open_conversation(&f, &f.bob, &f.alice_member.id).await.json();

    assert_eq!(first["id"], again["id"]);
    assert_eq!(first["id"], reverse["id"]);

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM conversations")
        .fetch_one(&f.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_get_or_create_yields_one_conversation() {
    // A file-backed pool so the callers really run on separate connections
    let (pool, path) = common::setup_file_db().await;
    let alice = common::create_test_user(&pool, "alice", "Alice").await;
    let bob = common::create_test_user(&pool, "bob", "Bob").await;
    let srv = common::create_test_server(&pool, &alice, "S").await;
    let alice_member = common::member_of(&pool, &srv, &alice).await;
    let bob_member = common::add_member(&pool, &srv, &bob, MemberRole::Guest).await;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        let (a, b) = if i % 2 == 0 {
            (alice_member.id.clone(), bob_member.id.clone())
        } else {
            (bob_member.id.clone(), alice_member.id.clone())
        };
        tasks.push(tokio::spawn(async move {
            db::conversations::get_or_create(&pool, &a, &b).await
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().id);
    }
    assert!(ids.windows(2).all(|w| w[0] == w[1]));

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM conversations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    common::remove_file_db(pool, &path).await;
}

#[tokio::test]
async fn conversation_with_self_is_rejected() {
    let f = setup().await;

    open_conversation(&f, &f.alice, &f.alice_member.id)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn conversation_target_must_share_server() {
    let f = setup().await;
    let carol = common::create_test_user(&f.pool, "carol", "Carol").await;
    let elsewhere = common::create_test_server(&f.pool, &carol, "Elsewhere").await;
    let carol_member = common::member_of(&f.pool, &elsewhere, &carol).await;

    open_conversation(&f, &f.alice, &carol_member.id)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Requester must belong to the named server
    open_conversation(&f, &carol, &f.bob_member.id)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn conversation_is_participants_only() {
    let f = setup().await;
    let created: Value = open_conversation(&f, &f.alice, &f.bob_member.id).await.json();
    let id = created["id"].as_str().unwrap();

    let (h, v) = common::session_cookie(&f.bob);
    f.server
        .get(&format!("/api/conversations/{}", id))
        .add_header(h, v)
        .await
        .assert_status_ok();

    let carol = common::create_test_user(&f.pool, "carol", "Carol").await;
    common::add_member(&f.pool, &f.srv, &carol, MemberRole::Guest).await;
    let (h, v) = common::session_cookie(&carol);
    f.server
        .get(&format!("/api/conversations/{}", id))
        .add_header(h, v)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (h, v) = common::session_cookie(&f.bob);
    f.server
        .get("/api/conversations/missing")
        .add_header(h, v)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn direct_message_lifecycle() {
    let f = setup().await;
    let created: Value = open_conversation(&f, &f.alice, &f.bob_member.id).await.json();
    let conversation_id = created["id"].as_str().unwrap().to_string();

    let (h, v) = common::session_cookie(&f.bob);
    let res = f
        .server
        .post("/api/socket/direct-messages")
        .add_query_param("conversationId", &conversation_id)
        .add_header(h, v)
        .json(&json!({"content": "hi alice"}))
        .await;
    res.assert_status_ok();
    let sent: Value = res.json();
    let dm_id = sent["id"].as_str().unwrap().to_string();
    assert_eq!(sent["conversationId"], conversation_id.as_str());
    assert_eq!(sent["member"]["profile"]["name"], "Bob");

    let (h, v) = common::session_cookie(&f.alice);
    let res = f
        .server
        .get("/api/direct-messages")
        .add_query_param("conversationId", &conversation_id)
        .add_header(h, v)
        .await;
    res.assert_status_ok();
    let page: Value = res.json();
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert!(page["nextCursor"].is_null());

    // Alice is not the author
    let (h, v) = common::session_cookie(&f.alice);
    f.server
        .patch(&format!("/api/socket/direct-messages/{}", dm_id))
        .add_header(h, v)
        .json(&json!({"content": "edited by alice"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (h, v) = common::session_cookie(&f.bob);
    let edited: Value = f
        .server
        .patch(&format!("/api/socket/direct-messages/{}", dm_id))
        .add_header(h, v)
        .json(&json!({"content": "hi again"}))
        .await
        .json();
    assert_eq!(edited["content"], "hi again");

    let (h, v) = common::session_cookie(&f.bob);
    let deleted: Value = f
        .server
        .delete(&format!("/api/socket/direct-messages/{}", dm_id))
        .add_header(h, v)
        .await
        .json();
    assert_eq!(deleted["deleted"], true);
    assert_eq!(deleted["content"], "This message has been deleted.");

    let (h, v) = common::session_cookie(&f.bob);
    f.server
        .delete(&format!("/api/socket/direct-messages/{}", dm_id))
        .add_header(h, v)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn direct_messages_hidden_from_outsiders() {
    let f = setup().await;
    let created: Value = open_conversation(&f, &f.alice, &f.bob_member.id).await.json();
    let conversation_id = created["id"].as_str().unwrap().to_string();

    let carol = common::create_test_user(&f.pool, "carol", "Carol").await;
    common::add_member(&f.pool, &f.srv, &carol, MemberRole::Moderator).await;

    let (h, v) = common::session_cookie(&carol);
    f.server
        .get("/api/direct-messages")
        .add_query_param("conversationId", &conversation_id)
        .add_header(h, v)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (h, v) = common::session_cookie(&carol);
    f.server
        .post("/api/socket/direct-messages")
        .add_query_param("conversationId", &conversation_id)
        .add_header(h, v)
        .json(&json!({"content": "eavesdrop"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (h, v) = common::session_cookie(&f.alice);
    f.server
        .get("/api/direct-messages")
        .add_header(h, v)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn direct_message_edit_after_soft_delete_keeps_placeholder() {
    let f = setup().await;
    let conversation =
        db::conversations::get_or_create(&f.pool, &f.alice_member.id, &f.bob_member.id)
            .await
            .unwrap();
    let message =
        db::direct_messages::insert(&f.pool, &conversation.id, &f.bob_member.id, "original", None)
            .await
            .unwrap();

    db::direct_messages::soft_delete(&f.pool, &message.id).await.unwrap();
    let edited = db::direct_messages::update_content(&f.pool, &message.id, "resurrected")
        .await
        .unwrap();
    assert!(edited.is_none());

    let stored = db::direct_messages::find(&f.pool, &message.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.deleted);
    assert_eq!(stored.content, DELETED_MESSAGE_CONTENT);
}
