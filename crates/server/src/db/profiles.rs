use sqlx::SqlitePool;

use crate::models::{LoginRequest, Profile, User};

/// Insert the user record, or refresh its name/email/picture if the
/// provider uid is already known.
pub async fn upsert_user(db: &SqlitePool, req: &LoginRequest) -> Result<User, sqlx::Error> {
    let now = super::now();

    sqlx::query(
        r#"INSERT INTO users (id, name, email, profile_pic, created_at)
           VALUES (?, ?, ?, ?, ?)
           ON CONFLICT(id) DO UPDATE SET
               name = excluded.name,
               email = excluded.email,
               profile_pic = excluded.profile_pic"#,
    )
    .bind(&req.uid)
    .bind(req.name.trim())
    .bind(req.email.trim())
    .bind(&req.profile_pic)
    .bind(&now)
    .execute(db)
    .await?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&req.uid)
        .fetch_one(db)
        .await
}

pub async fn find_user(db: &SqlitePool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_user(db: &SqlitePool, user_id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Return the profile derived from `user`, creating it on first use.
/// Concurrent first requests converge on the same row.
pub async fn get_or_create(db: &SqlitePool, user: &User) -> Result<Profile, sqlx::Error> {
    if let Some(profile) = find_by_user(db, &user.id).await? {
        return Ok(profile);
    }

    let now = super::now();
    let inserted = sqlx::query(
        r#"INSERT OR IGNORE INTO profiles (id, user_id, name, email, image_url, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(super::new_id())
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.profile_pic)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Created profile for user {}", user.id);
    }

    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(&user.id)
        .fetch_one(db)
        .await
}

pub async fn list_by_ids(db: &SqlitePool, ids: &[&str]) -> Result<Vec<Profile>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT * FROM profiles WHERE id IN ({})",
        super::placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, Profile>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    query.fetch_all(db).await
}
