pub mod auth;
pub mod dms;
pub mod messages;
pub mod servers;
pub mod socket;
pub mod voice;

use crate::ws;
use crate::AppState;
use axum::{routing::{get, post, patch, delete}, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let api_routes = Router::new()
        .route("/profile", get(auth::get_profile))
        // Servers
        .route("/servers", get(servers::list_servers))
        .route("/servers/create", post(servers::create_server))
        .route("/servers/{serverId}", get(servers::get_server))
        .route("/servers/{serverId}", patch(servers::update_server))
        .route("/servers/{serverId}", delete(servers::delete_server))
        .route("/servers/{serverId}/invite", patch(servers::rotate_invite))
        .route("/servers/{serverId}/leave", post(servers::leave_server))
        .route("/invite/{inviteCode}", post(servers::join_server))
        // Members
        .route("/members/{memberId}", patch(servers::update_member_role))
        .route("/members/{memberId}", delete(servers::kick_member))
        // Channels
        .route("/channels/create", post(servers::create_channel))
        .route("/channels/{channelId}", patch(servers::update_channel))
        .route("/channels/{channelId}", delete(servers::delete_channel))
        // History
        .route("/messages", get(messages::list_messages))
        .route("/direct-messages", get(dms::list_direct_messages))
        // Conversations
        .route("/conversations", post(dms::create_conversation))
        .route("/conversations/{conversationId}", get(dms::get_conversation))
        // Mutations + gateway
        .route("/socket/io", get(ws::handler::ws_handler))
        .route("/socket/messages", post(socket::send_message))
        .route("/socket/messages/{messageId}", patch(socket::edit_message))
        .route("/socket/messages/{messageId}", delete(socket::delete_message))
        .route("/socket/direct-messages", post(socket::send_direct_message))
        .route(
            "/socket/direct-messages/{directMessageId}",
            patch(socket::edit_direct_message),
        )
        .route(
            "/socket/direct-messages/{directMessageId}",
            delete(socket::delete_direct_message),
        )
        // Voice
        .route("/voice/token", post(voice::get_token));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .with_state(state)
}
