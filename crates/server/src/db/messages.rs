use sqlx::SqlitePool;

use crate::models::{Message, PaginatedResponse};

use parley_shared::constants::{DELETED_MESSAGE_CONTENT, MESSAGE_BATCH_SIZE};

use super::pagination::{fetch_page, CHANNEL_MESSAGES};

pub async fn insert(
    db: &SqlitePool,
    channel_id: &str,
    member_id: &str,
    content: &str,
    file_url: Option<&str>,
) -> Result<Message, sqlx::Error> {
    let now = super::now();
    let message = Message {
        id: super::new_id(),
        content: content.to_string(),
        file_url: file_url.map(str::to_string),
        channel_id: channel_id.to_string(),
        member_id: member_id.to_string(),
        deleted: false,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"INSERT INTO messages (id, content, file_url, channel_id, member_id, deleted, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, 0, ?, ?)"#,
    )
    .bind(&message.id)
    .bind(&message.content)
    .bind(&message.file_url)
    .bind(&message.channel_id)
    .bind(&message.member_id)
    .bind(&message.created_at)
    .bind(&message.updated_at)
    .execute(db)
    .await?;

    Ok(message)
}

pub async fn find(db: &SqlitePool, message_id: &str) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
        .bind(message_id)
        .fetch_optional(db)
        .await
}

/// Replace the content of a live message. Returns `None` when the row is
/// missing or was soft-deleted first, leaving the placeholder untouched.
pub async fn update_content(
    db: &SqlitePool,
    message_id: &str,
    content: &str,
) -> Result<Option<Message>, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE messages SET content = ?, updated_at = ? WHERE id = ? AND deleted = 0",
    )
    .bind(content)
    .bind(super::now())
    .bind(message_id)
    .execute(db)
    .await?;

    if updated.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
        .bind(message_id)
        .fetch_optional(db)
        .await
}

/// Redact a message in place. The row keeps its id and `created_at`, so its
/// position in the history does not move.
pub async fn soft_delete(db: &SqlitePool, message_id: &str) -> Result<Message, sqlx::Error> {
    sqlx::query(
        "UPDATE messages SET content = ?, file_url = NULL, deleted = 1, updated_at = ? WHERE id = ?",
    )
    .bind(DELETED_MESSAGE_CONTENT)
    .bind(super::now())
    .bind(message_id)
    .execute(db)
    .await?;

    sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
        .bind(message_id)
        .fetch_one(db)
        .await
}

pub async fn page(
    db: &SqlitePool,
    channel_id: &str,
    cursor: Option<&str>,
) -> Result<Option<PaginatedResponse<Message>>, sqlx::Error> {
    fetch_page(db, CHANNEL_MESSAGES, channel_id, cursor, MESSAGE_BATCH_SIZE).await
}
