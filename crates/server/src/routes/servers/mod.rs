mod channels;
mod members;

pub use channels::*;
pub use members::*;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use parley_shared::validation::{validate_file_url, validate_server_name};

use crate::access;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{CreateServerRequest, Member, Server, ServerDetails, UpdateServerRequest};
use crate::AppState;

/// Tombstone a membership and cut its live subscriptions to the server's
/// channels and to its conversations.
pub(super) async fn remove_member(state: &AppState, member: &Member) -> ApiResult<()> {
    db::members::remove(&state.db, &member.id).await?;

    let mut thread_ids: Vec<String> = db::channels::list_for_server(&state.db, &member.server_id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    thread_ids.extend(db::conversations::ids_for_member(&state.db, &member.id).await?);
    state.gateway.revoke(&member.profile_id, &thread_ids).await;

    Ok(())
}

pub(super) async fn server_details(db: &SqlitePool, server: Server) -> ApiResult<ServerDetails> {
    let channels = db::channels::list_for_server(db, &server.id).await?;
    let members = db::members::list_for_server(db, &server.id).await?;
    Ok(ServerDetails {
        server,
        channels,
        members,
    })
}

/// POST /api/servers/create
pub async fn create_server(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Json(body): Json<CreateServerRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_server_name(&body.server_name)?;
    validate_file_url(&body.image_url)?;

    let server = db::servers::create(
        &state.db,
        &profile.id,
        body.server_name.trim(),
        body.image_url.trim(),
    )
    .await?;

    tracing::info!("Profile {} created server {}", profile.id, server.id);

    Ok(Json(server_details(&state.db, server).await?))
}

/// GET /api/servers
pub async fn list_servers(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
) -> ApiResult<impl IntoResponse> {
    let servers = db::servers::list_for_profile(&state.db, &profile.id).await?;
    Ok(Json(servers))
}

/// GET /api/servers/:serverId
pub async fn get_server(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(server_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (server, member) = guards::server_with_member(&state.db, &server_id, &profile.id).await?;
    access::require_member(member.as_ref())?;

    Ok(Json(server_details(&state.db, server).await?))
}

/// PATCH /api/servers/:serverId
pub async fn update_server(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(server_id): Path<String>,
    Json(body): Json<UpdateServerRequest>,
) -> ApiResult<impl IntoResponse> {
    let server = guards::load_server(&state.db, &server_id).await?;
    access::require_owner(&server, &profile.id)?;

    if body.server_name.is_none() && body.image_url.is_none() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let name = match body.server_name {
        Some(ref name) => {
            validate_server_name(name)?;
            name.trim().to_string()
        }
        None => server.name.clone(),
    };
    let image_url = match body.image_url {
        Some(ref url) => {
            validate_file_url(url)?;
            url.trim().to_string()
        }
        None => server.image_url.clone(),
    };

    let updated = db::servers::update(&state.db, &server.id, &name, &image_url).await?;
    Ok(Json(updated))
}

/// DELETE /api/servers/:serverId
pub async fn delete_server(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(server_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let server = guards::load_server(&state.db, &server_id).await?;
    access::require_owner(&server, &profile.id)?;

    let mut thread_ids: Vec<String> = db::channels::list_for_server(&state.db, &server.id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    thread_ids.extend(db::conversations::ids_for_server(&state.db, &server.id).await?);

    db::servers::delete(&state.db, &server.id).await?;
    state.gateway.close_threads(&thread_ids).await;
    tracing::info!("Profile {} deleted server {}", profile.id, server.id);

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/servers/:serverId/invite
pub async fn rotate_invite(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(server_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // Scoped to the requester's own servers: anyone else just sees 404.
    let server = db::servers::find_owned(&state.db, &server_id, &profile.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Server not found"))?;

    let updated = db::servers::rotate_invite(&state.db, &server.id).await?;
    Ok(Json(updated))
}

/// POST /api/invite/:inviteCode
pub async fn join_server(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(invite_code): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let server = db::servers::find_by_invite(&state.db, &invite_code)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid invite code"))?;

    let (member, created) = db::members::join(&state.db, &server.id, &profile.id).await?;
    if created {
        tracing::info!("Profile {} joined server {} as {}", profile.id, server.id, member.role.as_str());
    }

    Ok(Json(server_details(&state.db, server).await?))
}

/// POST /api/servers/:serverId/leave
pub async fn leave_server(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(server_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (server, member) = guards::server_with_member(&state.db, &server_id, &profile.id).await?;
    let member = access::can_leave(&server, member.as_ref(), &profile.id)?;

    remove_member(&state, member).await?;
    tracing::info!("Profile {} left server {}", profile.id, server.id);

    Ok(Json(server))
}
