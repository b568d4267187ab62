use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use parley_shared::validation::{is_default_channel_name, validate_channel_name};

use crate::access;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{Channel, CreateChannelRequest, ServerQuery, UpdateChannelRequest};
use crate::AppState;

fn required_server_id(query: ServerQuery) -> ApiResult<String> {
    query
        .server_id
        .ok_or_else(|| ApiError::bad_request("Server ID missing"))
}

/// POST /api/channels/create?serverId=
pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<ServerQuery>,
    Json(body): Json<CreateChannelRequest>,
) -> ApiResult<impl IntoResponse> {
    let server_id = required_server_id(query)?;
    validate_channel_name(&body.name)?;

    let (server, member) = guards::server_with_member(&state.db, &server_id, &profile.id).await?;
    access::can_manage_channels(member.as_ref())?;

    let channel = db::channels::insert(
        &state.db,
        &server.id,
        &profile.id,
        body.name.trim(),
        body.channel_type,
    )
    .await?;

    Ok(Json(channel))
}

/// Channel in `server_id` that the requester may manage, excluding the
/// default channel which is fixed.
async fn managed_channel(
    state: &AppState,
    profile_id: &str,
    channel_id: &str,
    server_id: &str,
) -> ApiResult<Channel> {
    let (server, member) = guards::server_with_member(&state.db, server_id, profile_id).await?;
    access::can_manage_channels(member.as_ref())?;

    let channel = db::channels::find_in_server(&state.db, channel_id, &server.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Channel not found"))?;

    if is_default_channel_name(&channel.name) {
        return Err(ApiError::bad_request("The default channel cannot be changed"));
    }
    Ok(channel)
}

/// PATCH /api/channels/:channelId?serverId=
pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(channel_id): Path<String>,
    Query(query): Query<ServerQuery>,
    Json(body): Json<UpdateChannelRequest>,
) -> ApiResult<impl IntoResponse> {
    let server_id = required_server_id(query)?;
    validate_channel_name(&body.name)?;

    let channel = managed_channel(&state, &profile.id, &channel_id, &server_id).await?;
    let updated = db::channels::rename(&state.db, &channel.id, body.name.trim()).await?;

    Ok(Json(updated))
}

/// DELETE /api/channels/:channelId?serverId=
pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(channel_id): Path<String>,
    Query(query): Query<ServerQuery>,
) -> ApiResult<impl IntoResponse> {
    let server_id = required_server_id(query)?;

    let channel = managed_channel(&state, &profile.id, &channel_id, &server_id).await?;
    db::channels::delete(&state.db, &channel.id).await?;
    state.gateway.close_threads(std::slice::from_ref(&channel.id)).await;
    tracing::info!("Channel {} deleted from server {}", channel.id, channel.server_id);

    Ok(StatusCode::NO_CONTENT)
}
