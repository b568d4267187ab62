//! Message mutations. Each handler persists first and then publishes the
//! stored row (with its author) to the thread's gateway topic.

mod direct;

pub use direct::*;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use parley_shared::validation::{validate_file_url, validate_message_content};

use crate::access;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{EditMessageRequest, Message, MessageQuery, SendMessageRequest};
use crate::routes::messages::with_member;
use crate::ws::Topic;
use crate::AppState;

/// Validate a send body, returning the attachment link if one was given.
pub(super) fn checked_body(body: &SendMessageRequest) -> ApiResult<Option<&str>> {
    validate_message_content(&body.content)?;
    match body.file_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            validate_file_url(url)?;
            Ok(Some(url))
        }
        _ => Ok(None),
    }
}

async fn live_message(state: &AppState, message_id: &str) -> ApiResult<Message> {
    db::messages::find(&state.db, message_id)
        .await?
        .filter(|m| !m.deleted)
        .ok_or_else(|| ApiError::not_found("Message not found"))
}

/// POST /api/socket/messages?channelId=
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<MessageQuery>,
    Json(body): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let channel_id = query
        .channel_id
        .ok_or_else(|| ApiError::bad_request("Channel ID missing"))?;
    let file_url = checked_body(&body)?;
    let (channel, member) = guards::channel_member(&state.db, &channel_id, &profile.id).await?;

    let message =
        db::messages::insert(&state.db, &channel.id, &member.id, body.content.trim(), file_url).await?;
    let message = with_member(&state.db, message).await?;

    state
        .gateway
        .publish(&Topic::created(channel.id.as_str()), &message)
        .await;

    Ok(Json(message))
}

/// PATCH /api/socket/messages/:messageId
pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(message_id): Path<String>,
    Json(body): Json<EditMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_message_content(&body.content)?;

    let message = live_message(&state, &message_id).await?;
    let (_, member) = guards::channel_member(&state.db, &message.channel_id, &profile.id).await?;
    access::can_edit_message(&message.member_id, &member)?;

    let updated = db::messages::update_content(&state.db, &message.id, body.content.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;
    let updated = with_member(&state.db, updated).await?;

    state
        .gateway
        .publish(&Topic::updated(message.channel_id.as_str()), &updated)
        .await;

    Ok(Json(updated))
}

/// DELETE /api/socket/messages/:messageId
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(message_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let message = live_message(&state, &message_id).await?;
    let (_, member) = guards::channel_member(&state.db, &message.channel_id, &profile.id).await?;
    access::can_delete_message(&message.member_id, &member)?;

    let deleted = db::messages::soft_delete(&state.db, &message.id).await?;
    let deleted = with_member(&state.db, deleted).await?;
    tracing::info!("Message {} deleted by member {}", message.id, member.id);

    state
        .gateway
        .publish(&Topic::updated(message.channel_id.as_str()), &deleted)
        .await;

    Ok(Json(deleted))
}
