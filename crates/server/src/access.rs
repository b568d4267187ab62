//! Authorization predicates.
//!
//! Each check takes records the caller has just loaded from the store and
//! decides whether the requester may proceed. Nothing here is cached.

use crate::error::ApiError;
use crate::models::{Conversation, Member, Server};

/// Only members with ADMIN or MODERATOR may create, rename or delete channels.
pub fn can_manage_channels(member: Option<&Member>) -> Result<&Member, ApiError> {
    match member {
        Some(m) if m.role.can_moderate() => Ok(m),
        Some(_) => Err(ApiError::forbidden("Insufficient permissions")),
        None => Err(ApiError::forbidden("Not a member of this server")),
    }
}

pub fn require_owner(server: &Server, profile_id: &str) -> Result<(), ApiError> {
    if server.profile_id == profile_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Only the server owner can do this"))
    }
}

pub fn require_member(member: Option<&Member>) -> Result<&Member, ApiError> {
    member.ok_or_else(|| ApiError::forbidden("Not a member of this server"))
}

/// Any member except the owner may leave.
pub fn can_leave<'a>(
    server: &Server,
    member: Option<&'a Member>,
    profile_id: &str,
) -> Result<&'a Member, ApiError> {
    let member = require_member(member)?;
    if server.profile_id == profile_id {
        return Err(ApiError::forbidden("Server owner cannot leave"));
    }
    Ok(member)
}

/// Owner-only, and never against the owner's own membership.
pub fn can_manage_member(server: &Server, profile_id: &str, target: &Member) -> Result<(), ApiError> {
    require_owner(server, profile_id)?;
    if target.profile_id == profile_id {
        return Err(ApiError::bad_request("Cannot change your own membership"));
    }
    Ok(())
}

pub fn can_edit_message(author_member_id: &str, requester: &Member) -> Result<(), ApiError> {
    if author_member_id == requester.id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Only the author can edit this message"))
    }
}

/// The author, an ADMIN or a MODERATOR may delete.
pub fn can_delete_message(author_member_id: &str, requester: &Member) -> Result<(), ApiError> {
    if author_member_id == requester.id || requester.role.can_moderate() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Insufficient permissions"))
    }
}

/// Resolve which side of the conversation the requester is on. `members` are
/// the conversation's two members as currently stored.
pub fn participant<'a>(
    conversation: &Conversation,
    members: [Option<&'a Member>; 2],
    profile_id: &str,
) -> Result<&'a Member, ApiError> {
    members
        .into_iter()
        .flatten()
        .find(|m| conversation.involves(&m.id) && m.profile_id == profile_id)
        .ok_or_else(|| ApiError::forbidden("Not a participant"))
}
