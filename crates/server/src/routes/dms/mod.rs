mod messages;

pub use messages::*;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::access;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{Conversation, ConversationWithMembers, CreateConversationRequest};
use crate::AppState;

async fn conversation_details(
    db: &SqlitePool,
    conversation: Conversation,
) -> ApiResult<ConversationWithMembers> {
    let mut members = db::members::with_profiles(
        db,
        &[conversation.member_one_id.as_str(), conversation.member_two_id.as_str()],
    )
    .await?;

    let member_one = members
        .remove(&conversation.member_one_id)
        .ok_or_else(|| ApiError::not_found("Member not found"))?;
    let member_two = members
        .remove(&conversation.member_two_id)
        .ok_or_else(|| ApiError::not_found("Member not found"))?;

    Ok(ConversationWithMembers {
        conversation,
        member_one,
        member_two,
    })
}

/// POST /api/conversations
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Json(body): Json<CreateConversationRequest>,
) -> ApiResult<impl IntoResponse> {
    let (server, own) = guards::server_with_member(&state.db, &body.server_id, &profile.id).await?;
    let own = access::require_member(own.as_ref())?;

    let other = db::members::find(&state.db, &body.member_id)
        .await?
        .filter(|m| m.server_id == server.id)
        .ok_or_else(|| ApiError::not_found("Member not found"))?;

    if other.id == own.id {
        return Err(ApiError::bad_request("Cannot start a conversation with yourself"));
    }

    let conversation = db::conversations::get_or_create(&state.db, &own.id, &other.id).await?;
    Ok(Json(conversation_details(&state.db, conversation).await?))
}

/// GET /api/conversations/:conversationId
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(conversation_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (conversation, _member) =
        guards::conversation_participant(&state.db, &conversation_id, &profile.id).await?;

    Ok(Json(conversation_details(&state.db, conversation).await?))
}
