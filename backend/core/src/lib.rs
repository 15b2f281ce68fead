pub mod error;
pub mod types;

pub use error::SnapError;
pub use types::{
    ExtractedFields, OcrStatus, ReceiptRecord, RegisteredUser, ReimbursementDraft,
    OCR_FAILED_MERCHANT, UNKNOWN_MERCHANT,
};
