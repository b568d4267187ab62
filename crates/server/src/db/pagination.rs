use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};

use crate::models::{Authored, PaginatedResponse};

/// A message table and the column that scopes it to one thread.
#[derive(Debug, Clone, Copy)]
pub struct Thread {
    pub table: &'static str,
    pub scope_column: &'static str,
}

pub const CHANNEL_MESSAGES: Thread = Thread {
    table: "messages",
    scope_column: "channel_id",
};

pub const DIRECT_MESSAGES: Thread = Thread {
    table: "direct_messages",
    scope_column: "conversation_id",
};

/// Fetch one batch of `thread` messages for `scope_id`, newest batch first,
/// returned oldest-first.
///
/// With a cursor, only messages strictly older than the cursor message are
/// considered (ties on `created_at` broken by id). `batch + 1` rows are read
/// so `next_cursor` is set exactly when older messages remain.
///
/// Returns `None` when the cursor does not name a message in this thread.
pub async fn fetch_page<T>(
    db: &SqlitePool,
    thread: Thread,
    scope_id: &str,
    cursor: Option<&str>,
    batch: i64,
) -> Result<Option<PaginatedResponse<T>>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Authored + serde::Serialize + Send + Unpin,
{
    let Thread { table, scope_column } = thread;

    let anchor = match cursor {
        Some(cursor_id) => {
            let row = sqlx::query_as::<_, (String, String)>(&format!(
                "SELECT created_at, id FROM {} WHERE id = ? AND {} = ?",
                table, scope_column
            ))
            .bind(cursor_id)
            .bind(scope_id)
            .fetch_optional(db)
            .await?;
            match row {
                Some(anchor) => Some(anchor),
                None => return Ok(None),
            }
        }
        None => None,
    };

    let mut items = match &anchor {
        Some((created_at, id)) => {
            sqlx::query_as::<_, T>(&format!(
                r#"SELECT * FROM {} WHERE {} = ?
                   AND (created_at < ? OR (created_at = ? AND id < ?))
                   ORDER BY created_at DESC, id DESC LIMIT ?"#,
                table, scope_column
            ))
            .bind(scope_id)
            .bind(created_at)
            .bind(created_at)
            .bind(id)
            .bind(batch + 1)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, T>(&format!(
                "SELECT * FROM {} WHERE {} = ? ORDER BY created_at DESC, id DESC LIMIT ?",
                table, scope_column
            ))
            .bind(scope_id)
            .bind(batch + 1)
            .fetch_all(db)
            .await?
        }
    };

    let has_more = items.len() as i64 > batch;
    if has_more {
        items.truncate(batch as usize);
    }
    let next_cursor = if has_more {
        items.last().map(|m| m.id().to_string())
    } else {
        None
    };
    items.reverse(); // chronological order

    Ok(Some(PaginatedResponse { items, next_cursor }))
}
