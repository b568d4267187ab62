use std::collections::HashMap;

use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::{Member, MemberRole, MemberWithProfile};

pub async fn insert<'e>(
    db: impl SqliteExecutor<'e>,
    server_id: &str,
    profile_id: &str,
    role: MemberRole,
) -> Result<Member, sqlx::Error> {
    let now = super::now();
    let member = Member {
        id: super::new_id(),
        role,
        profile_id: profile_id.to_string(),
        server_id: server_id.to_string(),
        removed: false,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"INSERT INTO members (id, role, profile_id, server_id, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&member.id)
    .bind(member.role.as_str())
    .bind(&member.profile_id)
    .bind(&member.server_id)
    .bind(&member.created_at)
    .bind(&member.updated_at)
    .execute(db)
    .await?;

    Ok(member)
}

/// Add `profile_id` to the server as a GUEST unless it is already a member.
/// A membership that was left or kicked is revived as GUEST, keeping its id
/// so earlier messages and conversations stay attached.
/// Returns the membership and whether it was created or revived.
pub async fn join(
    db: &SqlitePool,
    server_id: &str,
    profile_id: &str,
) -> Result<(Member, bool), sqlx::Error> {
    let now = super::now();
    let changed = sqlx::query(
        r#"INSERT INTO members (id, role, profile_id, server_id, removed, created_at, updated_at)
           VALUES (?, ?, ?, ?, 0, ?, ?)
           ON CONFLICT(profile_id, server_id) DO UPDATE SET
               role = excluded.role,
               removed = 0,
               updated_at = excluded.updated_at
           WHERE members.removed = 1"#,
    )
    .bind(super::new_id())
    .bind(MemberRole::Guest.as_str())
    .bind(profile_id)
    .bind(server_id)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    let member = sqlx::query_as::<_, Member>(
        "SELECT * FROM members WHERE server_id = ? AND profile_id = ?",
    )
    .bind(server_id)
    .bind(profile_id)
    .fetch_one(db)
    .await?;

    Ok((member, changed.rows_affected() > 0))
}

/// A current membership by id. Removed memberships are not returned.
pub async fn find(db: &SqlitePool, member_id: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ? AND removed = 0")
        .bind(member_id)
        .fetch_optional(db)
        .await
}

/// The membership of `profile_id` in `server_id`, if any.
pub async fn find_for_profile(
    db: &SqlitePool,
    server_id: &str,
    profile_id: &str,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT * FROM members WHERE server_id = ? AND profile_id = ? AND removed = 0",
    )
    .bind(server_id)
    .bind(profile_id)
    .fetch_optional(db)
    .await
}

/// Members of a server with their profiles, ADMIN first then by join time.
pub async fn list_for_server(
    db: &SqlitePool,
    server_id: &str,
) -> Result<Vec<MemberWithProfile>, sqlx::Error> {
    let members = sqlx::query_as::<_, Member>(
        r#"SELECT * FROM members WHERE server_id = ? AND removed = 0
           ORDER BY CASE role WHEN 'ADMIN' THEN 0 WHEN 'MODERATOR' THEN 1 ELSE 2 END, created_at ASC"#,
    )
    .bind(server_id)
    .fetch_all(db)
    .await?;

    attach_profiles(db, members).await
}

pub async fn update_role(
    db: &SqlitePool,
    member_id: &str,
    role: MemberRole,
) -> Result<Member, sqlx::Error> {
    sqlx::query("UPDATE members SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role.as_str())
        .bind(super::now())
        .bind(member_id)
        .execute(db)
        .await?;

    sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
        .bind(member_id)
        .fetch_one(db)
        .await
}

/// Take a member out of its server. The row stays behind as the author of
/// whatever it wrote; only server deletion removes member rows.
pub async fn remove(db: &SqlitePool, member_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE members SET removed = 1, updated_at = ? WHERE id = ?")
        .bind(super::now())
        .bind(member_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Batch-fetch members (with profiles) by id, keyed by member id. Removed
/// memberships are included so older messages keep their author.
pub async fn with_profiles(
    db: &SqlitePool,
    member_ids: &[&str],
) -> Result<HashMap<String, MemberWithProfile>, sqlx::Error> {
    if member_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!(
        "SELECT * FROM members WHERE id IN ({})",
        super::placeholders(member_ids.len())
    );
    let mut query = sqlx::query_as::<_, Member>(&sql);
    for id in member_ids {
        query = query.bind(*id);
    }
    let members = query.fetch_all(db).await?;

    Ok(attach_profiles(db, members)
        .await?
        .into_iter()
        .map(|m| (m.member.id.clone(), m))
        .collect())
}

async fn attach_profiles(
    db: &SqlitePool,
    members: Vec<Member>,
) -> Result<Vec<MemberWithProfile>, sqlx::Error> {
    let profile_ids: Vec<&str> = members.iter().map(|m| m.profile_id.as_str()).collect();
    let profiles: HashMap<String, _> = super::profiles::list_by_ids(db, &profile_ids)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    Ok(members
        .into_iter()
        .filter_map(|member| {
            let profile = profiles.get(&member.profile_id).cloned()?;
            Some(MemberWithProfile { member, profile })
        })
        .collect())
}
