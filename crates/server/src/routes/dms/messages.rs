use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::DirectMessageQuery;
use crate::routes::messages::attach_members;
use crate::AppState;

/// GET /api/direct-messages?conversationId=&cursor=
pub async fn list_direct_messages(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<DirectMessageQuery>,
) -> ApiResult<impl IntoResponse> {
    let conversation_id = query
        .conversation_id
        .ok_or_else(|| ApiError::bad_request("Conversation ID missing"))?;
    let (conversation, _member) =
        guards::conversation_participant(&state.db, &conversation_id, &profile.id).await?;

    let page = db::direct_messages::page(&state.db, &conversation.id, query.cursor.as_deref())
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid cursor"))?;

    Ok(Json(attach_members(&state.db, page).await?))
}
