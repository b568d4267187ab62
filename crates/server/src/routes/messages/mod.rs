use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{Authored, MessageQuery, PaginatedResponse, WithMember};
use crate::AppState;

/// Join every item of a page with its author's member and profile rows.
/// Every item is kept; authors who left the server are still resolved.
pub(crate) async fn attach_members<M: Authored + Serialize>(
    db: &SqlitePool,
    page: PaginatedResponse<M>,
) -> ApiResult<PaginatedResponse<WithMember<M>>> {
    let ids: Vec<&str> = page.items.iter().map(|m| m.member_id()).collect();
    let authors = db::members::with_profiles(db, &ids).await?;

    Ok(page.map(|message| {
        let member = authors.get(message.member_id()).cloned();
        WithMember { message, member }
    }))
}

pub(crate) async fn with_member<M: Authored + Serialize>(
    db: &SqlitePool,
    message: M,
) -> ApiResult<WithMember<M>> {
    let mut authors = db::members::with_profiles(db, &[message.member_id()]).await?;
    let member = authors
        .remove(message.member_id())
        .ok_or_else(|| ApiError::not_found("Member not found"))?;
    Ok(WithMember {
        message,
        member: Some(member),
    })
}

/// GET /api/messages?channelId=&cursor=
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<MessageQuery>,
) -> ApiResult<impl IntoResponse> {
    let channel_id = query
        .channel_id
        .ok_or_else(|| ApiError::bad_request("Channel ID missing"))?;
    let (channel, _member) = guards::channel_member(&state.db, &channel_id, &profile.id).await?;

    let page = db::messages::page(&state.db, &channel.id, query.cursor.as_deref())
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid cursor"))?;

    Ok(Json(attach_members(&state.db, page).await?))
}
