//! Breaker-guarded receipt reading: blob fetch → recognition → extraction.

use std::sync::Arc;

use claimsnap_core::ExtractedFields;
use claimsnap_resilience::CircuitBreaker;
use claimsnap_storage::{BlobGateway, StorageError};
use thiserror::Error;
use tracing::warn;

use crate::client::{OcrError, TextRecognizer};

#[derive(Debug, Error)]
enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Ocr(#[from] OcrError),
}

/// What the guarded read produced.
///
/// Both variants carry fully-populated fields; `Fallback` means the
/// recognition call was rejected or failed and the sentinel values were
/// substituted. Callers that only care about the values can take
/// [`RecognitionOutcome::into_fields`] and check the sentinels.
#[derive(Debug, Clone)]
pub enum RecognitionOutcome {
    Recognized(ExtractedFields),
    Fallback(ExtractedFields),
}

impl RecognitionOutcome {
    pub fn fields(&self) -> &ExtractedFields {
        match self {
            RecognitionOutcome::Recognized(f) | RecognitionOutcome::Fallback(f) => f,
        }
    }

    pub fn into_fields(self) -> ExtractedFields {
        match self {
            RecognitionOutcome::Recognized(f) | RecognitionOutcome::Fallback(f) => f,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, RecognitionOutcome::Recognized(_))
    }
}

/// Runs the full recognition path for one stored receipt image under the
/// circuit breaker. Never fails: any rejection or error becomes the
/// sentinel field set.
pub struct ReceiptReader {
    blobs: Arc<dyn BlobGateway>,
    recognizer: Arc<dyn TextRecognizer>,
    breaker: Arc<CircuitBreaker>,
}

impl ReceiptReader {
    pub fn new(
        blobs: Arc<dyn BlobGateway>,
        recognizer: Arc<dyn TextRecognizer>,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            blobs,
            recognizer,
            breaker,
        }
    }

    pub async fn read(&self, object_id: &str) -> RecognitionOutcome {
        let guarded = self
            .breaker
            .call(|| async {
                let bytes = self.blobs.get(object_id).await.map_err(ReadError::from)?;
                let text = self.recognizer.recognize(&bytes).await?;
                Ok::<_, ReadError>(text)
            })
            .await;

        match guarded {
            Ok(text) => RecognitionOutcome::Recognized(claimsnap_extraction::extract(&text)),
            Err(err) => {
                warn!(object_id = %object_id, error = %err, "Recognition unavailable; substituting fallback fields");
                RecognitionOutcome::Fallback(ExtractedFields::fallback())
            }
        }
    }
}
