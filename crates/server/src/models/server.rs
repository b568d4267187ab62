use serde::{Deserialize, Serialize};

use super::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
    Admin,
    Moderator,
    Guest,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "ADMIN",
            MemberRole::Moderator => "MODERATOR",
            MemberRole::Guest => "GUEST",
        }
    }

    /// Admins and moderators manage channels and other members' messages.
    pub fn can_moderate(&self) -> bool {
        matches!(self, MemberRole::Admin | MemberRole::Moderator)
    }
}

impl TryFrom<String> for MemberRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "ADMIN" => Ok(MemberRole::Admin),
            "MODERATOR" => Ok(MemberRole::Moderator),
            "GUEST" => Ok(MemberRole::Guest),
            other => Err(format!("unknown member role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelType {
    #[default]
    Text,
    Audio,
    Video,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Text => "TEXT",
            ChannelType::Audio => "AUDIO",
            ChannelType::Video => "VIDEO",
        }
    }
}

impl TryFrom<String> for ChannelType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "TEXT" => Ok(ChannelType::Text),
            "AUDIO" => Ok(ChannelType::Audio),
            "VIDEO" => Ok(ChannelType::Video),
            other => Err(format!("unknown channel type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub invite_code: String,
    pub profile_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub channel_type: ChannelType,
    pub server_id: String,
    pub profile_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[sqlx(try_from = "String")]
    pub role: MemberRole,
    pub profile_id: String,
    pub server_id: String,
    /// Set once the member leaves or is kicked.
    pub removed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithProfile {
    #[serde(flatten)]
    pub member: Member,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDetails {
    #[serde(flatten)]
    pub server: Server,
    pub channels: Vec<Channel>,
    pub members: Vec<MemberWithProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServerRequest {
    pub server_name: String,
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServerRequest {
    pub server_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChannelRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: MemberRole,
}

#[derive(Debug, Deserialize)]
pub struct ServerQuery {
    #[serde(rename = "serverId")]
    pub server_id: Option<String>,
}
