use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::access;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::{Member, MemberRole, Server, ServerQuery, UpdateMemberRoleRequest};
use crate::AppState;

use super::server_details;

/// Load the server named by `?serverId=` and the target member inside it,
/// then check the requester may manage that member.
async fn managed_member(
    state: &AppState,
    profile_id: &str,
    member_id: &str,
    query: ServerQuery,
) -> ApiResult<(Server, Member)> {
    let server_id = query
        .server_id
        .ok_or_else(|| ApiError::bad_request("Server ID missing"))?;
    let server = guards::load_server(&state.db, &server_id).await?;

    let target = db::members::find(&state.db, member_id)
        .await?
        .filter(|m| m.server_id == server.id)
        .ok_or_else(|| ApiError::not_found("Member not found"))?;

    access::can_manage_member(&server, profile_id, &target)?;
    Ok((server, target))
}

/// PATCH /api/members/:memberId?serverId=
pub async fn update_member_role(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(member_id): Path<String>,
    Query(query): Query<ServerQuery>,
    Json(body): Json<UpdateMemberRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let (server, target) = managed_member(&state, &profile.id, &member_id, query).await?;

    if body.role == MemberRole::Admin {
        return Err(ApiError::bad_request("Role must be MODERATOR or GUEST"));
    }

    db::members::update_role(&state.db, &target.id, body.role).await?;
    tracing::info!(
        "Member {} of server {} is now {}",
        target.id,
        server.id,
        body.role.as_str()
    );

    Ok(Json(server_details(&state.db, server).await?))
}

/// DELETE /api/members/:memberId?serverId=
pub async fn kick_member(
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
    Path(member_id): Path<String>,
    Query(query): Query<ServerQuery>,
) -> ApiResult<impl IntoResponse> {
    let (server, target) = managed_member(&state, &profile.id, &member_id, query).await?;

    super::remove_member(&state, &target).await?;
    tracing::info!("Member {} removed from server {}", target.id, server.id);

    Ok(Json(server_details(&state.db, server).await?))
}
