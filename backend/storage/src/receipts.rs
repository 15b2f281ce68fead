//! Receipt record store: persisted receipt metadata behind a trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use claimsnap_core::ReceiptRecord;
use tracing::info;
use uuid::Uuid;

use crate::blob::StorageError;

/// Abstract interface for receipt record persistence.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Insert or update a record.
    async fn save(&self, record: ReceiptRecord) -> Result<(), StorageError>;

    /// Look up a record by id.
    async fn find(&self, id: Uuid) -> Result<Option<ReceiptRecord>, StorageError>;

    /// Delete a record by id. Deleting a missing record is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), StorageError>;
}

/// In-memory record store; the durable backend lives outside this system.
pub struct InMemoryReceiptStore {
    records: RwLock<HashMap<Uuid, ReceiptRecord>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryReceiptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn save(&self, record: ReceiptRecord) -> Result<(), StorageError> {
        self.records.write().unwrap().insert(record.id, record);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<ReceiptRecord>, StorageError> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        if self.records.write().unwrap().remove(&id).is_some() {
            info!(receipt_id = %id, "Receipt record deleted");
        }
        Ok(())
    }
}
