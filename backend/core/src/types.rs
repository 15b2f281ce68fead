use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Merchant value when no line in the recognized text qualifies.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Merchant value when the recognition call itself failed and the
/// sentinel fallback fields were substituted.
pub const OCR_FAILED_MERCHANT: &str = "OCR Extraction Failed";

/// Structured fields pulled out of recognized receipt text.
///
/// Always fully populated: the extraction heuristics substitute defaults
/// rather than leaving fields absent, so downstream code branches on
/// sentinel values, never on `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub merchant_name: String,
    pub amount: f64,
    pub transaction_date: DateTime<Utc>,
}

impl ExtractedFields {
    /// The sentinel field set substituted when the recognition call is
    /// rejected by the breaker or errors out.
    pub fn fallback() -> Self {
        Self {
            merchant_name: OCR_FAILED_MERCHANT.to_string(),
            amount: 0.0,
            transaction_date: Utc::now(),
        }
    }

    /// Whether the extraction found anything worth keeping.
    ///
    /// A result with the failure-sentinel merchant or a zero amount is
    /// unusable; callers delete the backing receipt record in that case.
    pub fn has_usable_signal(&self) -> bool {
        self.merchant_name != OCR_FAILED_MERCHANT && self.amount > 0.0
    }
}

/// Recognition progress for a stored receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrStatus {
    Pending,
    Completed,
    Failed,
}

/// A persisted receipt: the stored image plus whatever recognition produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub id: Uuid,
    /// Object id in the blob store (e.g. "3f2a….jpg").
    pub object_id: String,
    pub merchant_name: Option<String>,
    pub amount: Option<f64>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
    pub ocr_status: OcrStatus,
}

impl ReceiptRecord {
    /// Fresh record for a just-stored image, recognition not yet run.
    pub fn pending(object_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            object_id: object_id.into(),
            merchant_name: None,
            amount: None,
            transaction_date: None,
            uploaded_at: Utc::now(),
            ocr_status: OcrStatus::Pending,
        }
    }

    /// Fill in recognition results and mark the record accordingly.
    pub fn complete(&mut self, fields: &ExtractedFields, status: OcrStatus) {
        self.merchant_name = Some(fields.merchant_name.clone());
        self.amount = Some(fields.amount);
        self.transaction_date = Some(fields.transaction_date);
        self.ocr_status = status;
    }
}

/// An employee known to the system, optionally linked to a chat identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Canonical `+<digits>` form.
    pub phone_number: String,
    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// A reimbursement draft assembled from a pending session plus the
/// free-text description that completed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReimbursementDraft {
    pub receipt_id: Uuid,
    pub user_id: Uuid,
    pub requested_amount: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_fields_are_unusable() {
        let fields = ExtractedFields::fallback();
        assert_eq!(fields.merchant_name, OCR_FAILED_MERCHANT);
        assert_eq!(fields.amount, 0.0);
        assert!(!fields.has_usable_signal());
    }

    #[test]
    fn zero_amount_is_unusable_even_with_merchant() {
        let fields = ExtractedFields {
            merchant_name: "Corner Cafe".to_string(),
            amount: 0.0,
            transaction_date: Utc::now(),
        };
        assert!(!fields.has_usable_signal());
    }

    #[test]
    fn usable_fields_pass_the_check() {
        let fields = ExtractedFields {
            merchant_name: "Corner Cafe".to_string(),
            amount: 12.50,
            transaction_date: Utc::now(),
        };
        assert!(fields.has_usable_signal());
    }

    #[test]
    fn record_lifecycle() {
        let mut record = ReceiptRecord::pending("abc.jpg");
        assert_eq!(record.ocr_status, OcrStatus::Pending);
        assert!(record.amount.is_none());

        let fields = ExtractedFields {
            merchant_name: "SuperMart".to_string(),
            amount: 45.0,
            transaction_date: Utc::now(),
        };
        record.complete(&fields, OcrStatus::Completed);
        assert_eq!(record.ocr_status, OcrStatus::Completed);
        assert_eq!(record.merchant_name.as_deref(), Some("SuperMart"));
        assert_eq!(record.amount, Some(45.0));
    }

    #[test]
    fn record_serializes_round_trip() {
        let record = ReceiptRecord::pending("abc.jpg");
        let json = serde_json::to_string(&record).unwrap();
        let back: ReceiptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.ocr_status, OcrStatus::Pending);
    }
}
