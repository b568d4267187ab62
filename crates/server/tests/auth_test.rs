mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

async fn setup() -> (TestServer, sqlx::SqlitePool) {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone());
    (TestServer::new(app).unwrap(), pool)
}

fn cookie_for(uid: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("cookie"),
        format!("__session={}", uid).parse().unwrap(),
    )
}

#[tokio::test]
async fn login_creates_user_and_sets_session_cookie() {
    let (server, _pool) = setup().await;

    let res = server
        .post("/api/auth/login")
        .json(&json!({
            "uid": "user_alice",
            "name": "Alice",
            "email": "alice@test.com",
            "profilePic": "https://cdn.test/alice.png"
        }))
        .await;

    res.assert_status(StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["id"], "user_alice");
    assert_eq!(body["profilePic"], "https://cdn.test/alice.png");

    let cookie = res.header("set-cookie");
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("__session=user_alice"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
}

#[tokio::test]
async fn login_again_refreshes_user() {
    let (server, _pool) = setup().await;

    server
        .post("/api/auth/login")
        .json(&json!({"uid": "u1", "name": "Old", "email": "old@test.com"}))
        .await
        .assert_status(StatusCode::CREATED);

    let res = server
        .post("/api/auth/login")
        .json(&json!({"uid": "u1", "name": "New", "email": "new@test.com"}))
        .await;

    res.assert_status(StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["name"], "New");
    assert_eq!(body["email"], "new@test.com");
}

#[tokio::test]
async fn login_rejects_unsafe_uid() {
    let (server, _pool) = setup().await;

    let res = server
        .post("/api/auth/login")
        .json(&json!({"uid": "a; Path=/evil", "name": "X", "email": "x@test.com"}))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_requires_name() {
    let (server, _pool) = setup().await;

    let res = server
        .post("/api/auth/login")
        .json(&json!({"uid": "u2", "name": "  ", "email": "x@test.com"}))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_without_session_is_unauthorized() {
    let (server, _pool) = setup().await;

    let res = server.get("/api/profile").await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn profile_with_unknown_user_is_unauthorized() {
    let (server, _pool) = setup().await;

    let (h, v) = cookie_for("nobody");
    let res = server.get("/api/profile").add_header(h, v).await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_is_created_once_on_first_request() {
    let (server, pool) = setup().await;

    server
        .post("/api/auth/login")
        .json(&json!({"uid": "u3", "name": "Carol", "email": "carol@test.com"}))
        .await
        .assert_status(StatusCode::CREATED);

    let (h, v) = cookie_for("u3");
    let first = server.get("/api/profile").add_header(h, v).await;
    first.assert_status_ok();
    let first: Value = first.json();
    assert_eq!(first["userId"], "u3");
    assert_eq!(first["name"], "Carol");

    let (h, v) = cookie_for("u3");
    let second: Value = server.get("/api/profile").add_header(h, v).await.json();
    assert_eq!(first["id"], second["id"]);

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE user_id = 'u3'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn logout_expires_cookie() {
    let (server, _pool) = setup().await;

    let res = server.post("/api/auth/logout").await;
    res.assert_status(StatusCode::NO_CONTENT);

    let cookie = res.header("set-cookie");
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("__session=;"));
    assert!(cookie.contains("Max-Age=0"));
}
