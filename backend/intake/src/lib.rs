//! Intake orchestrator: one upload from raw bytes to a persisted record.
//!
//! The recognition step is deliberately synchronous: the conversational
//! caller needs the extracted amount immediately to continue the flow.

use std::sync::Arc;

use claimsnap_core::{ExtractedFields, OcrStatus, ReceiptRecord};
use claimsnap_ocr::ReceiptReader;
use claimsnap_storage::{BlobGateway, ReceiptStore, StorageError};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Hard failures out of [`IntakeOrchestrator::ingest`]. Recognition
/// failures are NOT here: the resilience wrapper absorbs them and they
/// surface as sentinel field values instead.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A successfully persisted upload and its extracted fields.
///
/// "Successfully persisted" does not mean "usable": the fields may be the
/// failure sentinels, and the caller decides whether to keep or discard
/// the record based on them.
#[derive(Debug, Clone)]
pub struct IntakeReceipt {
    pub receipt_id: Uuid,
    pub fields: ExtractedFields,
}

/// Sequences store → record → guarded recognition → persist.
pub struct IntakeOrchestrator {
    blobs: Arc<dyn BlobGateway>,
    receipts: Arc<dyn ReceiptStore>,
    reader: ReceiptReader,
}

impl IntakeOrchestrator {
    pub fn new(
        blobs: Arc<dyn BlobGateway>,
        receipts: Arc<dyn ReceiptStore>,
        reader: ReceiptReader,
    ) -> Self {
        Self {
            blobs,
            receipts,
            reader,
        }
    }

    /// Ingest one uploaded image.
    ///
    /// Storage failures propagate and leave nothing behind. Once the blob
    /// and the pending record exist, recognition runs synchronously; the
    /// record is marked `Completed` when text was recognized, `Failed`
    /// when the fallback sentinel was substituted, and the fields are
    /// returned either way.
    pub async fn ingest(
        &self,
        bytes: &[u8],
        filename_hint: &str,
    ) -> Result<IntakeReceipt, IntakeError> {
        let object_id = self.blobs.put(bytes, filename_hint).await?;

        let mut record = ReceiptRecord::pending(&object_id);
        let receipt_id = record.id;
        self.receipts.save(record.clone()).await?;

        let outcome = self.reader.read(&object_id).await;
        let status = if outcome.is_recognized() {
            OcrStatus::Completed
        } else {
            OcrStatus::Failed
        };
        let fields = outcome.into_fields();

        record.complete(&fields, status);
        self.receipts.save(record).await?;

        info!(
            receipt_id = %receipt_id,
            object_id = %object_id,
            merchant = %fields.merchant_name,
            amount = fields.amount,
            ?status,
            "Receipt intake finished"
        );

        Ok(IntakeReceipt { receipt_id, fields })
    }

    /// Delete a receipt record whose result the caller judged unusable.
    /// The system never keeps a persisted receipt with no usable
    /// financial data.
    pub async fn discard(&self, receipt_id: Uuid) {
        if let Err(err) = self.receipts.delete(receipt_id).await {
            tracing::error!(receipt_id = %receipt_id, error = %err, "Failed to delete receipt record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use claimsnap_core::OCR_FAILED_MERCHANT;
    use claimsnap_ocr::{OcrError, TextRecognizer};
    use claimsnap_resilience::CircuitBreaker;
    use claimsnap_storage::{FsBlobStore, InMemoryReceiptStore};

    struct FixedText(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedText {
        async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct NoText;

    #[async_trait]
    impl TextRecognizer for NoText {
        async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            Err(OcrError::NoText)
        }
    }

    struct DownBlobs;

    #[async_trait]
    impl BlobGateway for DownBlobs {
        async fn put(&self, _bytes: &[u8], _hint: &str) -> Result<String, StorageError> {
            Err(StorageError::PutFailed("disk full".into()))
        }
        async fn get(&self, object_id: &str) -> Result<Vec<u8>, StorageError> {
            Err(StorageError::Unavailable(object_id.to_string()))
        }
    }

    fn orchestrator(
        blobs: Arc<dyn BlobGateway>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> (IntakeOrchestrator, Arc<InMemoryReceiptStore>) {
        let receipts = Arc::new(InMemoryReceiptStore::new());
        let breaker = Arc::new(CircuitBreaker::new("ocr"));
        let reader = ReceiptReader::new(blobs.clone(), recognizer, breaker);
        (
            IntakeOrchestrator::new(blobs, receipts.clone(), reader),
            receipts,
        )
    }

    #[tokio::test]
    async fn ingest_persists_completed_record_with_fields() {
        let dir = tempfile::tempdir().unwrap();
        let blobs: Arc<dyn BlobGateway> = Arc::new(FsBlobStore::new(dir.path()));
        let (intake, receipts) =
            orchestrator(blobs, Arc::new(FixedText("SuperMart\nTOTAL: $45.00")));

        let result = intake.ingest(b"jpeg", "receipt.jpg").await.unwrap();
        assert_eq!(result.fields.merchant_name, "SuperMart");
        assert_eq!(result.fields.amount, 45.00);

        let record = receipts.find(result.receipt_id).await.unwrap().unwrap();
        assert_eq!(record.ocr_status, OcrStatus::Completed);
        assert_eq!(record.amount, Some(45.00));
        assert!(record.object_id.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn recognition_failure_marks_record_failed_with_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let blobs: Arc<dyn BlobGateway> = Arc::new(FsBlobStore::new(dir.path()));
        let (intake, receipts) = orchestrator(blobs, Arc::new(NoText));

        let result = intake.ingest(b"jpeg", "receipt.jpg").await.unwrap();
        assert_eq!(result.fields.merchant_name, OCR_FAILED_MERCHANT);
        assert!(!result.fields.has_usable_signal());

        let record = receipts.find(result.receipt_id).await.unwrap().unwrap();
        assert_eq!(record.ocr_status, OcrStatus::Failed);
    }

    #[tokio::test]
    async fn storage_failure_propagates_and_leaves_no_record() {
        let (intake, receipts) = orchestrator(Arc::new(DownBlobs), Arc::new(NoText));

        let err = intake.ingest(b"jpeg", "receipt.jpg").await.unwrap_err();
        assert!(matches!(err, IntakeError::Storage(_)));
        // The put failed before any record was created.
        assert!(receipts.is_empty());
    }

    #[tokio::test]
    async fn discard_deletes_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let blobs: Arc<dyn BlobGateway> = Arc::new(FsBlobStore::new(dir.path()));
        let (intake, receipts) = orchestrator(blobs, Arc::new(NoText));

        let result = intake.ingest(b"jpeg", "receipt.jpg").await.unwrap();
        intake.discard(result.receipt_id).await;
        assert!(receipts.find(result.receipt_id).await.unwrap().is_none());
    }
}
