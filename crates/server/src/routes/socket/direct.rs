use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use parley_shared::validation::validate_message_content;

use crate::access;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{DirectMessage, DirectMessageQuery, EditMessageRequest, SendMessageRequest};
use crate::routes::messages::with_member;
use crate::ws::Topic;
use crate::AppState;

use super::checked_body;

async fn live_direct_message(state: &AppState, message_id: &str) -> ApiResult<DirectMessage> {
    db::direct_messages::find(&state.db, message_id)
        .await?
        .filter(|m| !m.deleted)
        .ok_or_else(|| ApiError::not_found("Message not found"))
}

/// POST /api/socket/direct-messages?conversationId=
pub async fn send_direct_message(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<DirectMessageQuery>,
    Json(body): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let conversation_id = query
        .conversation_id
        .ok_or_else(|| ApiError::bad_request("Conversation ID missing"))?;
    let file_url = checked_body(&body)?;
    let (conversation, member) =
        guards::conversation_participant(&state.db, &conversation_id, &profile.id).await?;

    let message = db::direct_messages::insert(
        &state.db,
        &conversation.id,
        &member.id,
        body.content.trim(),
        file_url,
    )
    .await?;
    let message = with_member(&state.db, message).await?;

    state
        .gateway
        .publish(&Topic::created(conversation.id.as_str()), &message)
        .await;

    Ok(Json(message))
}

/// PATCH /api/socket/direct-messages/:directMessageId
pub async fn edit_direct_message(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(message_id): Path<String>,
    Json(body): Json<EditMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_message_content(&body.content)?;

    let message = live_direct_message(&state, &message_id).await?;
    let (_, member) =
        guards::conversation_participant(&state.db, &message.conversation_id, &profile.id).await?;
    access::can_edit_message(&message.member_id, &member)?;

    let updated = db::direct_messages::update_content(&state.db, &message.id, body.content.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;
    let updated = with_member(&state.db, updated).await?;

    state
        .gateway
        .publish(&Topic::updated(message.conversation_id.as_str()), &updated)
        .await;

    Ok(Json(updated))
}

/// DELETE /api/socket/direct-messages/:directMessageId
pub async fn delete_direct_message(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(message_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let message = live_direct_message(&state, &message_id).await?;
    let (_, member) =
        guards::conversation_participant(&state.db, &message.conversation_id, &profile.id).await?;
    access::can_delete_message(&message.member_id, &member)?;

    let deleted = db::direct_messages::soft_delete(&state.db, &message.id).await?;
    let deleted = with_member(&state.db, deleted).await?;

    state
        .gateway
        .publish(&Topic::updated(message.conversation_id.as_str()), &deleted)
        .await;

    Ok(Json(deleted))
}
