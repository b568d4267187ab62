use serde::Serialize;

use super::{ClientId, GatewayState};
use crate::ws::events::ServerEvent;
use crate::ws::Topic;

impl GatewayState {
    /// Hand `payload` to every client currently subscribed to `topic`.
    /// Returns how many client queues accepted it.
    pub async fn publish<T: Serialize>(&self, topic: &Topic, payload: &T) -> usize {
        let topic = topic.to_string();
        let payload = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Failed to serialize payload for {}: {}", topic, e);
                return 0;
            }
        };
        let event = ServerEvent::Event {
            topic: topic.clone(),
            payload,
        };
        let msg = match serde_json::to_string(&event) {
            Ok(m) => m,
            Err(_) => return 0,
        };

        let subs = self.topic_subs.read().await;
        let clients = self.clients.read().await;

        let mut delivered = 0;
        if let Some(subscriber_ids) = subs.get(&topic) {
            for cid in subscriber_ids {
                if let Some(client) = clients.get(cid) {
                    if client.tx.send(msg.clone()).is_ok() {
                        delivered += 1;
                    }
                }
            }
        }
        tracing::debug!("Published to {} ({} subscribers)", topic, delivered);
        delivered
    }

    pub async fn send_to(&self, client_id: ClientId, event: &ServerEvent) {
        let msg = match serde_json::to_string(event) {
            Ok(m) => m,
            Err(_) => return,
        };

        let clients = self.clients.read().await;
        if let Some(client) = clients.get(&client_id) {
            let _ = client.tx.send(msg);
        }
    }
}
