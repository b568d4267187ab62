mod broadcast;

use std::collections::{HashMap, HashSet};
use tokio::sync::{mpsc, RwLock};

use crate::ws::Topic;

pub type ClientId = u64;

pub struct ConnectedClient {
    pub profile_id: String,
    pub tx: mpsc::UnboundedSender<String>,
    pub topics: HashSet<String>,
}

/// In-process topic bus for connected WebSocket clients.
///
/// Route handlers persist first and then `publish`; delivery is best-effort
/// to whoever is subscribed at that moment. Nothing is buffered for clients
/// that connect later.
pub struct GatewayState {
    next_id: RwLock<u64>,
    pub clients: RwLock<HashMap<ClientId, ConnectedClient>>,
    pub topic_subs: RwLock<HashMap<String, HashSet<ClientId>>>,
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayState {
    pub fn new() -> Self {
        Self {
            next_id: RwLock::new(1),
            clients: RwLock::new(HashMap::new()),
            topic_subs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn next_client_id(&self) -> ClientId {
        let mut id = self.next_id.write().await;
        let current = *id;
        *id += 1;
        current
    }

    pub async fn register(
        &self,
        client_id: ClientId,
        profile_id: String,
        tx: mpsc::UnboundedSender<String>,
    ) {
        let client = ConnectedClient {
            profile_id,
            tx,
            topics: HashSet::new(),
        };
        self.clients.write().await.insert(client_id, client);
    }

    pub async fn unregister(&self, client_id: ClientId) -> Option<ConnectedClient> {
        let client = self.clients.write().await.remove(&client_id)?;

        let mut subs = self.topic_subs.write().await;
        for topic in &client.topics {
            if let Some(set) = subs.get_mut(topic) {
                set.remove(&client_id);
                if set.is_empty() {
                    subs.remove(topic);
                }
            }
        }

        Some(client)
    }

    pub async fn subscribe(&self, client_id: ClientId, topic: &str) {
        self.topic_subs
            .write()
            .await
            .entry(topic.to_string())
            .or_default()
            .insert(client_id);

        if let Some(client) = self.clients.write().await.get_mut(&client_id) {
            client.topics.insert(topic.to_string());
        }
    }

    pub async fn unsubscribe(&self, client_id: ClientId, topic: &str) {
        let mut subs = self.topic_subs.write().await;
        if let Some(set) = subs.get_mut(topic) {
            set.remove(&client_id);
            if set.is_empty() {
                subs.remove(topic);
            }
        }

        if let Some(client) = self.clients.write().await.get_mut(&client_id) {
            client.topics.remove(topic);
        }
    }

    /// Unsubscribe every client of `profile_id` from the topics of the given
    /// threads. Called when the profile loses access to them.
    pub async fn revoke(&self, profile_id: &str, thread_ids: &[String]) -> usize {
        let dropped = self.drop_thread_topics(thread_ids, Some(profile_id)).await;
        if dropped > 0 {
            tracing::debug!("Revoked {} subscriptions of profile {}", dropped, profile_id);
        }
        dropped
    }

    /// Unsubscribe everyone from the topics of threads that no longer exist.
    pub async fn close_threads(&self, thread_ids: &[String]) -> usize {
        self.drop_thread_topics(thread_ids, None).await
    }

    async fn drop_thread_topics(&self, thread_ids: &[String], only_profile: Option<&str>) -> usize {
        let topics: Vec<String> = thread_ids
            .iter()
            .flat_map(|id| {
                [
                    Topic::created(id.as_str()).to_string(),
                    Topic::updated(id.as_str()).to_string(),
                ]
            })
            .collect();

        let mut subs = self.topic_subs.write().await;
        let mut clients = self.clients.write().await;
        let mut dropped = 0;

        for topic in &topics {
            let Some(set) = subs.get_mut(topic) else {
                continue;
            };
            set.retain(|client_id| {
                let Some(client) = clients.get_mut(client_id) else {
                    return false;
                };
                if only_profile.is_some_and(|p| p != client.profile_id) {
                    return true;
                }
                client.topics.remove(topic);
                dropped += 1;
                false
            });
            if set.is_empty() {
                subs.remove(topic);
            }
        }

        dropped
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topic_subs
            .read()
            .await
            .get(topic)
            .map(HashSet::len)
            .unwrap_or(0)
    }
}
