//! Storage boundaries: durable blobs and receipt records.
//!
//! Both are expressed as async traits; the process ships a filesystem
//! blob store and an in-memory record store, with durable backends out
//! of scope behind the same interfaces.

pub mod blob;
pub mod receipts;

pub use blob::{BlobGateway, FsBlobStore, StorageError};
pub use receipts::{InMemoryReceiptStore, ReceiptStore};
