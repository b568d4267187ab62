use serde::{Deserialize, Serialize};

// ── Client → Server Events ──

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Subscribe { topic: String },
    Unsubscribe { topic: String },
    Ping,
}

// ── Server → Client Events ──

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Event {
        topic: String,
        payload: serde_json::Value,
    },
    Subscribed {
        topic: String,
    },
    Unsubscribed {
        topic: String,
    },
    Pong,
    Error {
        message: String,
    },
}
