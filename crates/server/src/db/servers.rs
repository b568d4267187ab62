use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::{ChannelType, MemberRole, Server};

use parley_shared::constants::DEFAULT_CHANNEL_NAME;

pub fn new_invite_code() -> String {
    nanoid::nanoid!(10)
}

/// Create a server together with its default text channel and the owner's
/// ADMIN membership. All three rows commit or none do.
pub async fn create(
    db: &SqlitePool,
    profile_id: &str,
    name: &str,
    image_url: &str,
) -> Result<Server, sqlx::Error> {
    let now = super::now();
    let server = Server {
        id: super::new_id(),
        name: name.to_string(),
        image_url: image_url.to_string(),
        invite_code: new_invite_code(),
        profile_id: profile_id.to_string(),
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    let mut tx = db.begin().await?;

    sqlx::query(
        r#"INSERT INTO servers (id, name, image_url, invite_code, profile_id, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&server.id)
    .bind(&server.name)
    .bind(&server.image_url)
    .bind(&server.invite_code)
    .bind(&server.profile_id)
    .bind(&server.created_at)
    .bind(&server.updated_at)
    .execute(&mut *tx)
    .await?;

    super::channels::insert(
        &mut *tx,
        &server.id,
        profile_id,
        DEFAULT_CHANNEL_NAME,
        ChannelType::Text,
    )
    .await?;

    super::members::insert(&mut *tx, &server.id, profile_id, MemberRole::Admin).await?;

    tx.commit().await?;

    Ok(server)
}

pub async fn find<'e>(db: impl SqliteExecutor<'e>, server_id: &str) -> Result<Option<Server>, sqlx::Error> {
    sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE id = ?")
        .bind(server_id)
        .fetch_optional(db)
        .await
}

/// Look a server up only among those owned by `profile_id`.
pub async fn find_owned(
    db: &SqlitePool,
    server_id: &str,
    profile_id: &str,
) -> Result<Option<Server>, sqlx::Error> {
    sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE id = ? AND profile_id = ?")
        .bind(server_id)
        .bind(profile_id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_invite(db: &SqlitePool, invite_code: &str) -> Result<Option<Server>, sqlx::Error> {
    sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE invite_code = ?")
        .bind(invite_code)
        .fetch_optional(db)
        .await
}

/// Servers `profile_id` is a member of, oldest membership first.
pub async fn list_for_profile(db: &SqlitePool, profile_id: &str) -> Result<Vec<Server>, sqlx::Error> {
    sqlx::query_as::<_, Server>(
        r#"SELECT s.*
           FROM members m
           INNER JOIN servers s ON s.id = m.server_id
           WHERE m.profile_id = ? AND m.removed = 0
           ORDER BY m.created_at ASC"#,
    )
    .bind(profile_id)
    .fetch_all(db)
    .await
}

pub async fn update(
    db: &SqlitePool,
    server_id: &str,
    name: &str,
    image_url: &str,
) -> Result<Server, sqlx::Error> {
    sqlx::query("UPDATE servers SET name = ?, image_url = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(image_url)
        .bind(super::now())
        .bind(server_id)
        .execute(db)
        .await?;

    sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE id = ?")
        .bind(server_id)
        .fetch_one(db)
        .await
}

/// Replace the invite code in a single statement; the previous code stops
/// resolving immediately.
pub async fn rotate_invite(db: &SqlitePool, server_id: &str) -> Result<Server, sqlx::Error> {
    sqlx::query("UPDATE servers SET invite_code = ?, updated_at = ? WHERE id = ?")
        .bind(new_invite_code())
        .bind(super::now())
        .bind(server_id)
        .execute(db)
        .await?;

    sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE id = ?")
        .bind(server_id)
        .fetch_one(db)
        .await
}

pub async fn delete(db: &SqlitePool, server_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM servers WHERE id = ?")
        .bind(server_id)
        .execute(db)
        .await?;
    Ok(())
}
