use axum::{extract::State, response::IntoResponse, Json};
use livekit_api::access_token::{AccessToken, VideoGrants};
use serde::Deserialize;
use std::sync::Arc;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{ChannelType, Profile};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VoiceTokenRequest {
    pub room: String,
}

/// A room is an AUDIO/VIDEO channel or a conversation. Errors out unless the
/// requester may join it.
async fn check_room_access(state: &AppState, profile: &Profile, room: &str) -> ApiResult<()> {
    if let Some(channel) = db::channels::find(&state.db, room).await? {
        if channel.channel_type == ChannelType::Text {
            return Err(ApiError::bad_request("Not a voice channel"));
        }
        guards::channel_member(&state.db, &channel.id, &profile.id).await?;
        return Ok(());
    }

    if db::conversations::find(&state.db, room).await?.is_some() {
        guards::conversation_participant(&state.db, room, &profile.id).await?;
        return Ok(());
    }

    Err(ApiError::not_found("Room not found"))
}

/// POST /api/voice/token
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Json(body): Json<VoiceTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    check_room_access(&state, &profile, &body.room).await?;

    if state.config.livekit_api_key.is_empty() || state.config.livekit_api_secret.is_empty() {
        return Err(ApiError::Unavailable(
            "LiveKit not configured. Set LIVEKIT_API_KEY and LIVEKIT_API_SECRET in .env".into(),
        ));
    }

    let token = AccessToken::with_api_key(
        &state.config.livekit_api_key,
        &state.config.livekit_api_secret,
    )
    .with_identity(&profile.id)
    .with_name(&profile.name)
    .with_grants(VideoGrants {
        room_join: true,
        room: body.room.clone(),
        can_publish: true,
        can_subscribe: true,
        ..Default::default()
    })
    .to_jwt()
    .map_err(|e| {
        tracing::error!("Failed to sign LiveKit token: {}", e);
        ApiError::Internal("Failed to generate token".into())
    })?;

    Ok(Json(serde_json::json!({
        "token": token,
        "url": state.config.livekit_url,
    })))
}
