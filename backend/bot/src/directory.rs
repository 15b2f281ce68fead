//! In-memory user directory seeded from a JSON file.
//!
//! Employee provisioning happens out-of-band; this directory is the
//! development/test implementation of the [`UserDirectory`] boundary.

use std::path::Path;
use std::sync::RwLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use claimsnap_core::{RegisteredUser, SnapError};
use tracing::info;
use uuid::Uuid;

use crate::seams::UserDirectory;

pub struct InMemoryUserDirectory {
    users: RwLock<Vec<RegisteredUser>>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Vec<RegisteredUser>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Load the seed file: a JSON array of users.
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read user seed file: {}", path.display()))?;
        let users: Vec<RegisteredUser> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse user seed file: {}", path.display()))?;
        info!(count = users.len(), path = %path.display(), "Loaded user directory");
        Ok(Self::new(users))
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_chat(&self, chat_id: i64) -> Result<Option<RegisteredUser>, SnapError> {
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.chat_id == Some(chat_id)).cloned())
    }

    async fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<RegisteredUser>, SnapError> {
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.phone_number == phone_number).cloned())
    }

    async fn link_chat(&self, user_id: Uuid, chat_id: i64) -> Result<(), SnapError> {
        let mut users = self.users.write().unwrap();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.chat_id = Some(chat_id);
                info!(%user_id, chat_id, "Linked chat identity to user");
                Ok(())
            }
            None => Err(SnapError::NotFound(format!("user {user_id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(phone: &str) -> RegisteredUser {
        RegisteredUser {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: phone.to_string(),
            chat_id: None,
        }
    }

    #[tokio::test]
    async fn phone_lookup_and_chat_linking() {
        let user = employee("+15551234567");
        let user_id = user.id;
        let directory = InMemoryUserDirectory::new(vec![user]);

        assert!(directory.find_by_chat(42).await.unwrap().is_none());

        let found = directory.find_by_phone("+15551234567").await.unwrap().unwrap();
        assert_eq!(found.id, user_id);

        directory.link_chat(user_id, 42).await.unwrap();
        let by_chat = directory.find_by_chat(42).await.unwrap().unwrap();
        assert_eq!(by_chat.id, user_id);
    }

    #[tokio::test]
    async fn linking_unknown_user_is_not_found() {
        let directory = InMemoryUserDirectory::new(vec![]);
        let err = directory.link_chat(Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, SnapError::NotFound(_)));
    }

    #[tokio::test]
    async fn loads_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let seed = serde_json::json!([{
            "id": Uuid::new_v4(),
            "name": "Ada",
            "email": "ada@example.com",
            "phone_number": "+15551234567"
        }]);
        tokio::fs::write(&path, seed.to_string()).await.unwrap();

        let directory = InMemoryUserDirectory::from_json_file(&path).await.unwrap();
        assert!(directory.find_by_phone("+15551234567").await.unwrap().is_some());
    }
}
