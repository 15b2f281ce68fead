//! Recognition: the outbound OCR call and its resilience wrapper.
//!
//! `OcrClient` performs one multipart request against the recognition
//! service. `ReceiptReader` runs blob fetch → recognition → extraction
//! under a circuit breaker, mapping every failure to the sentinel field
//! set so callers only ever check values, never a second error channel.

pub mod client;
pub mod reader;

pub use client::{OcrClient, OcrError, TextRecognizer};
pub use reader::{ReceiptReader, RecognitionOutcome};
