use axum::{
    extract::{State, WebSocketUpgrade, ws::{Message, WebSocket}},
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::guards;
use crate::middleware::CurrentProfile;
use crate::models::Profile;
use crate::ws::events::{ClientEvent, ServerEvent};
use crate::ws::gateway::ClientId;
use crate::ws::Topic;
use crate::AppState;

/// GET /api/socket/io
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    CurrentProfile(profile): CurrentProfile,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, profile))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, profile: Profile) {
    let client_id = state.gateway.next_client_id().await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state
        .gateway
        .register(client_id, profile.id.clone(), tx)
        .await;
    tracing::debug!("Client {} connected as profile {}", client_id, profile.id);

    // Task to forward messages from mpsc to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Receive loop
    let state_clone = state.clone();
    let profile_id = profile.id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    let text_str: &str = &text;
                    match serde_json::from_str::<ClientEvent>(text_str) {
                        Ok(event) => {
                            handle_client_event(&state_clone, client_id, &profile_id, event).await
                        }
                        Err(_) => {
                            state_clone
                                .gateway
                                .send_to(
                                    client_id,
                                    &ServerEvent::Error {
                                        message: "Invalid event".into(),
                                    },
                                )
                                .await
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.gateway.unregister(client_id).await;
    tracing::debug!("Client {} disconnected", client_id);
}

async fn handle_client_event(
    state: &AppState,
    client_id: ClientId,
    profile_id: &str,
    event: ClientEvent,
) {
    match event {
        ClientEvent::Subscribe { topic } => {
            let parsed = match Topic::parse(&topic) {
                Some(t) => t,
                None => {
                    state
                        .gateway
                        .send_to(client_id, &ServerEvent::Error { message: format!("Unknown topic '{}'", topic) })
                        .await;
                    return;
                }
            };

            if let Err(e) = guards::thread_reader(&state.db, &parsed.thread_id, profile_id).await {
                state
                    .gateway
                    .send_to(client_id, &ServerEvent::Error { message: e.to_string() })
                    .await;
                return;
            }

            let topic = parsed.to_string();
            state.gateway.subscribe(client_id, &topic).await;
            state
                .gateway
                .send_to(client_id, &ServerEvent::Subscribed { topic })
                .await;
        }
        ClientEvent::Unsubscribe { topic } => {
            state.gateway.unsubscribe(client_id, &topic).await;
            state
                .gateway
                .send_to(client_id, &ServerEvent::Unsubscribed { topic })
                .await;
        }
        ClientEvent::Ping => {
            state.gateway.send_to(client_id, &ServerEvent::Pong).await;
        }
    }
}
