//! Load-then-check helpers shared by route handlers and the gateway.
//! Every call reads the current rows; see `access` for the predicates.

use sqlx::SqlitePool;

use crate::access;
use crate::db;
use crate::error::ApiError;
use crate::models::{Channel, Conversation, Member, Server};

pub async fn load_server(db: &SqlitePool, server_id: &str) -> Result<Server, ApiError> {
    db::servers::find(db, server_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Server not found"))
}

/// The server and the requester's membership in it, if any.
pub async fn server_with_member(
    db: &SqlitePool,
    server_id: &str,
    profile_id: &str,
) -> Result<(Server, Option<Member>), ApiError> {
    let server = load_server(db, server_id).await?;
    let member = db::members::find_for_profile(db, &server.id, profile_id).await?;
    Ok((server, member))
}

/// A channel the requester can read and write: it exists and they are a
/// member of its server.
pub async fn channel_member(
    db: &SqlitePool,
    channel_id: &str,
    profile_id: &str,
) -> Result<(Channel, Member), ApiError> {
    let channel = db::channels::find(db, channel_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Channel not found"))?;
    let member = db::members::find_for_profile(db, &channel.server_id, profile_id).await?;
    let member = access::require_member(member.as_ref())?.clone();
    Ok((channel, member))
}

/// A conversation the requester takes part in, with the requester's side.
pub async fn conversation_participant(
    db: &SqlitePool,
    conversation_id: &str,
    profile_id: &str,
) -> Result<(Conversation, Member), ApiError> {
    let conversation = db::conversations::find(db, conversation_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Conversation not found"))?;
    let one = db::members::find(db, &conversation.member_one_id).await?;
    let two = db::members::find(db, &conversation.member_two_id).await?;
    let member = access::participant(&conversation, [one.as_ref(), two.as_ref()], profile_id)?.clone();
    Ok((conversation, member))
}

/// Check read access to a thread id that may name either a channel or a
/// conversation.
pub async fn thread_reader(
    db: &SqlitePool,
    thread_id: &str,
    profile_id: &str,
) -> Result<Member, ApiError> {
    if db::channels::find(db, thread_id).await?.is_some() {
        return channel_member(db, thread_id, profile_id).await.map(|(_, m)| m);
    }
    conversation_participant(db, thread_id, profile_id)
        .await
        .map(|(_, m)| m)
}
