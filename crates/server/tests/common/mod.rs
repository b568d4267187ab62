#![allow(dead_code)]

pub mod ws_helpers;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use parley_server::models::{LoginRequest, Member, MemberRole, Profile, Server};
use parley_server::{config::Config, db, routes, ws, AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Create an in-memory SQLite pool with schema applied.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid SQLite URL")
        .foreign_keys(true);

    // One connection: every connection to :memory: is a separate database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory SQLite pool");

    db::apply_schema(&pool).await.expect("Failed to apply schema");
    pool
}

/// A pool over a fresh database file, for tests that need more than one
/// connection. Pair with [`remove_file_db`].
pub async fn setup_file_db() -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("parley-test-{}.db", uuid::Uuid::new_v4()));
    let pool = db::init_pool(path.to_str().expect("temp path is not UTF-8"))
        .await
        .expect("Failed to create file-backed SQLite pool");
    (pool, path)
}

pub async fn remove_file_db(pool: SqlitePool, path: &Path) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path: ":memory:".into(),
        livekit_api_key: "".into(),
        livekit_api_secret: "".into(),
        livekit_url: "ws://localhost:7880".into(),
        session_max_age_secs: 86_400,
    }
}

pub fn create_test_state_with_config(pool: SqlitePool, config: Config) -> Arc<AppState> {
    Arc::new(AppState {
        db: pool,
        config,
        gateway: Arc::new(ws::gateway::GatewayState::new()),
    })
}

pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    create_test_state_with_config(pool, test_config())
}

/// Build a test Axum app with the given pool.
pub fn create_test_app(pool: SqlitePool) -> Router {
    routes::build_router(create_test_state(pool))
}

/// Create a user and its profile directly in the database.
pub async fn create_test_user(pool: &SqlitePool, uid: &str, name: &str) -> Profile {
    let user = db::profiles::upsert_user(
        pool,
        &LoginRequest {
            uid: uid.into(),
            name: name.into(),
            email: format!("{}@test.com", uid),
            profile_pic: None,
        },
    )
    .await
    .unwrap();

    db::profiles::get_or_create(pool, &user).await.unwrap()
}

/// `cookie` header carrying the session for `profile`.
pub fn session_cookie(profile: &Profile) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("cookie"),
        format!("__session={}", profile.user_id).parse().unwrap(),
    )
}

/// Create a server owned by `owner` with its default channel and ADMIN membership.
pub async fn create_test_server(pool: &SqlitePool, owner: &Profile, name: &str) -> Server {
    db::servers::create(pool, &owner.id, name, "img.png").await.unwrap()
}

pub async fn add_member(
    pool: &SqlitePool,
    server: &Server,
    profile: &Profile,
    role: MemberRole,
) -> Member {
    db::members::insert(pool, &server.id, &profile.id, role)
        .await
        .unwrap()
}

pub async fn member_of(pool: &SqlitePool, server: &Server, profile: &Profile) -> Member {
    db::members::find_for_profile(pool, &server.id, &profile.id)
        .await
        .unwrap()
        .expect("profile is not a member")
}

/// Id of the server's `General` channel.
pub async fn general_channel_id(pool: &SqlitePool, server: &Server) -> String {
    db::channels::list_for_server(pool, &server.id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "General")
        .expect("default channel missing")
        .id
}
