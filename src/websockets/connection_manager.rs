use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Registry of live connections and their outbound channels.
///
/// A connection is live from `add_connection` until `remove_connection`;
/// room logic consults `is_alive` before trusting a member list.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, connection_id: &str);

    async fn is_alive(&self, connection_id: &str) -> bool;

    async fn send_to_player(&self, connection_id: &str, message: &str);

    async fn send_to_players(&self, connection_ids: &[String], message: &str);

    /// Sends to every live connection
    async fn broadcast(&self, message: &str);
}

pub struct InMemoryConnectionManager {
    // connection id -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(connection_id);
    }

    async fn is_alive(&self, connection_id: &str) -> bool {
        let connections = self.connections.read().await;
        connections
            .get(connection_id)
            .map(|sender| !sender.is_closed())
            .unwrap_or(false)
    }

    async fn send_to_player(&self, connection_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(connection_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn send_to_players(&self, connection_ids: &[String], message: &str) {
        let connections = self.connections.read().await;
        for connection_id in connection_ids {
            if let Some(sender) = connections.get(connection_id) {
                let _ = sender.send(message.to_string());
            }
        }
    }

    async fn broadcast(&self, message: &str) {
        let connections = self.connections.read().await;
        debug!(receivers = connections.len(), "Broadcasting to all connections");
        for sender in connections.values() {
            let _ = sender.send(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_is_alive_until_removed() {
        let manager = InMemoryConnectionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        assert!(!manager.is_alive("c1").await);
        manager.add_connection("c1".to_string(), tx).await;
        assert!(manager.is_alive("c1").await);

        manager.remove_connection("c1").await;
        assert!(!manager.is_alive("c1").await);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_not_alive() {
        let manager = InMemoryConnectionManager::new();
        let (tx, rx) = mpsc::unbounded_channel();
        manager.add_connection("c1".to_string(), tx).await;

        drop(rx);

        assert!(!manager.is_alive("c1").await);
    }

    #[tokio::test]
    async fn test_send_and_broadcast() {
        let manager = InMemoryConnectionManager::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        manager.add_connection("c1".to_string(), tx1).await;
        manager.add_connection("c2".to_string(), tx2).await;

        manager.send_to_player("c1", "direct").await;
        manager
            .send_to_players(&["c2".to_string(), "missing".to_string()], "some")
            .await;
        manager.broadcast("all").await;

        assert_eq!(rx1.recv().await.unwrap(), "direct");
        assert_eq!(rx1.recv().await.unwrap(), "all");
        assert_eq!(rx2.recv().await.unwrap(), "some");
        assert_eq!(rx2.recv().await.unwrap(), "all");
        assert_eq!(manager.connection_count().await, 2);
    }
}
