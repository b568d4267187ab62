#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use parley_server::models::Profile;
use parley_server::{routes, AppState};
use serde_json::Value;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;

pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Serve `state` on a random TCP port and return the base URL. The same
/// state can back an `axum_test::TestServer` so HTTP mutations reach the
/// gateway these sockets connect to.
pub async fn start_server(state: Arc<AppState>) -> String {
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://127.0.0.1:{}", addr.port());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    base
}

/// Connect to the gateway with `profile`'s session cookie.
pub async fn ws_connect(base: &str, profile: &Profile) -> WsStream {
    let url = format!("{}/api/socket/io", base.replace("http://", "ws://"));
    let mut request = url.into_client_request().unwrap();
    request.headers_mut().insert(
        "cookie",
        format!("__session={}", profile.user_id).parse().unwrap(),
    );
    let (ws, _) = tokio_tungstenite::connect_async(request).await.unwrap();
    ws
}

/// Read next text message parsed as JSON, with timeout.
pub async fn recv_json(ws: &mut WsStream) -> Option<Value> {
    let timeout = tokio::time::timeout(std::time::Duration::from_secs(3), ws.next()).await;
    match timeout {
        Ok(Some(Ok(Message::Text(text)))) => serde_json::from_str(&text).ok(),
        _ => None,
    }
}

/// Drain all pending messages until timeout.
pub async fn drain_messages(ws: &mut WsStream) -> Vec<Value> {
    let mut messages = Vec::new();
    loop {
        let timeout =
            tokio::time::timeout(std::time::Duration::from_millis(200), ws.next()).await;
        match timeout {
            Ok(Some(Ok(Message::Text(text)))) => {
                if let Ok(v) = serde_json::from_str::<Value>(&text) {
                    messages.push(v);
                }
            }
            _ => break,
        }
    }
    messages
}

/// Send a JSON message over WebSocket.
pub async fn send_json(ws: &mut WsStream, value: &Value) {
    ws.send(Message::Text(serde_json::to_string(value).unwrap().into()))
        .await
        .unwrap();
}
