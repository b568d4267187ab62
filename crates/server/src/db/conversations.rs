use sqlx::SqlitePool;

use crate::models::Conversation;

pub async fn find(db: &SqlitePool, conversation_id: &str) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = ?")
        .bind(conversation_id)
        .fetch_optional(db)
        .await
}

/// Ids of every conversation `member_id` takes part in.
pub async fn ids_for_member(db: &SqlitePool, member_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM conversations WHERE member_one_id = ? OR member_two_id = ?")
        .bind(member_id)
        .bind(member_id)
        .fetch_all(db)
        .await
}

/// Ids of every conversation between members of `server_id`.
pub async fn ids_for_server(db: &SqlitePool, server_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT c.id FROM conversations c
           JOIN members m ON m.id = c.member_one_id
           WHERE m.server_id = ?"#,
    )
    .bind(server_id)
    .fetch_all(db)
    .await
}

/// The conversation between two members, whichever slot each one occupies.
pub async fn find_between(
    db: &SqlitePool,
    member_a: &str,
    member_b: &str,
) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(
        r#"SELECT * FROM conversations
           WHERE (member_one_id = ? AND member_two_id = ?)
              OR (member_one_id = ? AND member_two_id = ?)"#,
    )
    .bind(member_a)
    .bind(member_b)
    .bind(member_b)
    .bind(member_a)
    .fetch_optional(db)
    .await
}

/// Return the single conversation joining `member_a` and `member_b`,
/// creating it when absent.
///
/// The pair is stored in sorted order under a UNIQUE constraint and the
/// insert is `OR IGNORE`, so concurrent callers for the same pair all read
/// back the one row that won.
pub async fn get_or_create(
    db: &SqlitePool,
    member_a: &str,
    member_b: &str,
) -> Result<Conversation, sqlx::Error> {
    if let Some(existing) = find_between(db, member_a, member_b).await? {
        return Ok(existing);
    }

    let (one, two) = if member_a < member_b {
        (member_a, member_b)
    } else {
        (member_b, member_a)
    };

    let inserted = sqlx::query(
        r#"INSERT OR IGNORE INTO conversations (id, member_one_id, member_two_id, created_at)
           VALUES (?, ?, ?, ?)"#,
    )
    .bind(super::new_id())
    .bind(one)
    .bind(two)
    .bind(super::now())
    .execute(db)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::debug!("Created conversation between {} and {}", one, two);
    }

    find_between(db, member_a, member_b)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}
