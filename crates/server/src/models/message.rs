use serde::{Deserialize, Serialize};

use super::MemberWithProfile;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub file_url: Option<String>,
    pub channel_id: String,
    pub member_id: String,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: String,
    pub content: String,
    pub file_url: Option<String>,
    pub conversation_id: String,
    pub member_id: String,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Anything written by a member into a thread (channel or conversation).
pub trait Authored {
    fn id(&self) -> &str;
    fn member_id(&self) -> &str;
    fn created_at(&self) -> &str;
}

impl Authored for Message {
    fn id(&self) -> &str {
        &self.id
    }
    fn member_id(&self) -> &str {
        &self.member_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Authored for DirectMessage {
    fn id(&self) -> &str {
        &self.id
    }
    fn member_id(&self) -> &str {
        &self.member_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

/// A message together with the member (and profile) that wrote it, as
/// listed and broadcast to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithMember<M: Serialize> {
    #[serde(flatten)]
    pub message: M,
    /// `null` only when the author's profile no longer exists.
    pub member: Option<MemberWithProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub member_one_id: String,
    pub member_two_id: String,
    pub created_at: String,
}

impl Conversation {
    pub fn involves(&self, member_id: &str) -> bool {
        self.member_one_id == member_id || self.member_two_id == member_id
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationWithMembers {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub member_one: MemberWithProfile,
    pub member_two: MemberWithProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    pub file_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub server_id: String,
    pub member_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub channel_id: Option<String>,
    pub cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageQuery {
    pub conversation_id: Option<String>,
    pub cursor: Option<String>,
}
