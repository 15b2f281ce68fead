//! Per-chat pending sessions bridging an upload and its description.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// The receipt a chat is currently describing.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReceipt {
    pub receipt_id: Uuid,
    pub amount: f64,
    pub merchant_name: String,
}

/// Shared map of chat id → pending receipt.
///
/// At most one session per chat. Opening a session for a chat that
/// already has one silently replaces it: last write wins, since the
/// newest upload is the one the user is looking at.
pub struct SessionMap {
    inner: Mutex<HashMap<i64, PendingReceipt>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Open (or replace) the session for a chat.
    pub async fn open(&self, chat_id: i64, pending: PendingReceipt) {
        let mut sessions = self.inner.lock().await;
        if let Some(previous) = sessions.insert(chat_id, pending) {
            debug!(
                chat_id,
                replaced_receipt = %previous.receipt_id,
                "Replaced pending receipt; last write wins"
            );
        }
    }

    /// Remove and return the session for a chat, if any.
    pub async fn take(&self, chat_id: i64) -> Option<PendingReceipt> {
        self.inner.lock().await.remove(&chat_id)
    }

    /// Whether the chat is awaiting a description.
    pub async fn is_awaiting(&self, chat_id: i64) -> bool {
        self.inner.lock().await.contains_key(&chat_id)
    }
}

impl Default for SessionMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(amount: f64) -> PendingReceipt {
        PendingReceipt {
            receipt_id: Uuid::new_v4(),
            amount,
            merchant_name: "SuperMart".to_string(),
        }
    }

    #[tokio::test]
    async fn open_then_take() {
        let sessions = SessionMap::new();
        sessions.open(7, pending(10.0)).await;
        assert!(sessions.is_awaiting(7).await);

        let taken = sessions.take(7).await.unwrap();
        assert_eq!(taken.amount, 10.0);
        assert!(!sessions.is_awaiting(7).await);
        assert!(sessions.take(7).await.is_none());
    }

    #[tokio::test]
    async fn second_open_replaces_first() {
        let sessions = SessionMap::new();
        sessions.open(7, pending(10.0)).await;
        sessions.open(7, pending(20.0)).await;

        let taken = sessions.take(7).await.unwrap();
        assert_eq!(taken.amount, 20.0);
    }

    #[tokio::test]
    async fn chats_are_independent() {
        let sessions = SessionMap::new();
        sessions.open(1, pending(10.0)).await;
        sessions.open(2, pending(20.0)).await;

        assert_eq!(sessions.take(1).await.unwrap().amount, 10.0);
        assert!(sessions.is_awaiting(2).await);
    }
}
