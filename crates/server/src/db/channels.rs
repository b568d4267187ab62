use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::{Channel, ChannelType};

pub async fn insert<'e>(
    db: impl SqliteExecutor<'e>,
    server_id: &str,
    profile_id: &str,
    name: &str,
    channel_type: ChannelType,
) -> Result<Channel, sqlx::Error> {
    let now = super::now();
    let channel = Channel {
        id: super::new_id(),
        name: name.to_string(),
        channel_type,
        server_id: server_id.to_string(),
        profile_id: profile_id.to_string(),
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"INSERT INTO channels (id, name, type, server_id, profile_id, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&channel.id)
    .bind(&channel.name)
    .bind(channel.channel_type.as_str())
    .bind(&channel.server_id)
    .bind(&channel.profile_id)
    .bind(&channel.created_at)
    .bind(&channel.updated_at)
    .execute(db)
    .await?;

    Ok(channel)
}

pub async fn find(db: &SqlitePool, channel_id: &str) -> Result<Option<Channel>, sqlx::Error> {
    sqlx::query_as::<_, Channel>("SELECT * FROM channels WHERE id = ?")
        .bind(channel_id)
        .fetch_optional(db)
        .await
}

pub async fn find_in_server(
    db: &SqlitePool,
    channel_id: &str,
    server_id: &str,
) -> Result<Option<Channel>, sqlx::Error> {
    sqlx::query_as::<_, Channel>("SELECT * FROM channels WHERE id = ? AND server_id = ?")
        .bind(channel_id)
        .bind(server_id)
        .fetch_optional(db)
        .await
}

pub async fn list_for_server(db: &SqlitePool, server_id: &str) -> Result<Vec<Channel>, sqlx::Error> {
    sqlx::query_as::<_, Channel>(
        "SELECT * FROM channels WHERE server_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(server_id)
    .fetch_all(db)
    .await
}

pub async fn rename(db: &SqlitePool, channel_id: &str, name: &str) -> Result<Channel, sqlx::Error> {
    sqlx::query("UPDATE channels SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(super::now())
        .bind(channel_id)
        .execute(db)
        .await?;

    sqlx::query_as::<_, Channel>("SELECT * FROM channels WHERE id = ?")
        .bind(channel_id)
        .fetch_one(db)
        .await
}

pub async fn delete(db: &SqlitePool, channel_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM channels WHERE id = ?")
        .bind(channel_id)
        .execute(db)
        .await?;
    Ok(())
}
