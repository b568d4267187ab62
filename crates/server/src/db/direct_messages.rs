use sqlx::SqlitePool;

use crate::models::{DirectMessage, PaginatedResponse};

use parley_shared::constants::{DELETED_MESSAGE_CONTENT, MESSAGE_BATCH_SIZE};

use super::pagination::{fetch_page, DIRECT_MESSAGES};

pub async fn insert(
    db: &SqlitePool,
    conversation_id: &str,
    member_id: &str,
    content: &str,
    file_url: Option<&str>,
) -> Result<DirectMessage, sqlx::Error> {
    let now = super::now();
    let message = DirectMessage {
        id: super::new_id(),
        content: content.to_string(),
        file_url: file_url.map(str::to_string),
        conversation_id: conversation_id.to_string(),
        member_id: member_id.to_string(),
        deleted: false,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"INSERT INTO direct_messages (id, content, file_url, conversation_id, member_id, deleted, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, 0, ?, ?)"#,
    )
    .bind(&message.id)
    .bind(&message.content)
    .bind(&message.file_url)
    .bind(&message.conversation_id)
    .bind(&message.member_id)
    .bind(&message.created_at)
    .bind(&message.updated_at)
    .execute(db)
    .await?;

    Ok(message)
}

pub async fn find(db: &SqlitePool, message_id: &str) -> Result<Option<DirectMessage>, sqlx::Error> {
    sqlx::query_as::<_, DirectMessage>("SELECT * FROM direct_messages WHERE id = ?")
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
) -> Result<Option<DirectMessage>, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE direct_messages SET content = ?, updated_at = ? WHERE id = ? AND deleted = 0",
    )
    .bind(content)
    .bind(super::now())
    .bind(message_id)
    .execute(db)
    .await?;

    if updated.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query_as::<_, DirectMessage>("SELECT * FROM direct_messages WHERE id = ?")
        .bind(message_id)
        .fetch_optional(db)
        .await
}

/// Same redaction as channel messages.
pub async fn soft_delete(db: &SqlitePool, message_id: &str) -> Result<DirectMessage, sqlx::Error> {
    sqlx::query(
        "UPDATE direct_messages SET content = ?, file_url = NULL, deleted = 1, updated_at = ? WHERE id = ?",
    )
    .bind(DELETED_MESSAGE_CONTENT)
    .bind(super::now())
    .bind(message_id)
    .execute(db)
    .await?;

    sqlx::query_as::<_, DirectMessage>("SELECT * FROM direct_messages WHERE id = ?")
        .bind(message_id)
        .fetch_one(db)
        .await
}

pub async fn page(
    db: &SqlitePool,
    conversation_id: &str,
    cursor: Option<&str>,
) -> Result<Option<PaginatedResponse<DirectMessage>>, sqlx::Error> {
    fetch_page(db, DIRECT_MESSAGES, conversation_id, cursor, MESSAGE_BATCH_SIZE).await
}
