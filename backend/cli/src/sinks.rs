//! Runtime implementations of the submission and notification seams.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use claimsnap_bot::{Notifier, OutboundTransport, SubmissionSink};
use claimsnap_core::{RegisteredUser, ReimbursementDraft, SnapError};

/// Appends each reimbursement draft as one JSON line. The approval
/// workflow consumes this journal out-of-band.
pub struct JsonlSubmissionSink {
    path: PathBuf,
}

impl JsonlSubmissionSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SubmissionSink for JsonlSubmissionSink {
    async fn submit(&self, draft: ReimbursementDraft) -> Result<(), SnapError> {
        let mut line = serde_json::to_string(&draft)
            .map_err(|err| SnapError::Submission(err.to_string()))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| SnapError::Submission(err.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|err| SnapError::Submission(err.to_string()))?;

        info!(receipt_id = %draft.receipt_id, amount = draft.requested_amount, "Recorded reimbursement request");
        Ok(())
    }
}

/// Tells the configured admin chats about each new reimbursement request.
pub struct AdminNotifier {
    transport: Arc<dyn OutboundTransport>,
    admin_chat_ids: Vec<i64>,
}

impl AdminNotifier {
    pub fn new(transport: Arc<dyn OutboundTransport>, admin_chat_ids: Vec<i64>) -> Self {
        Self {
            transport,
            admin_chat_ids,
        }
    }

    fn announcement(user: &RegisteredUser, draft: &ReimbursementDraft) -> String {
        format!(
            "New reimbursement request\n\n\
             Employee: {} ({})\n\
             Amount: ${:.2}\n\
             Description: {}\n\
             Receipt: {}",
            user.name, user.email, draft.requested_amount, draft.description, draft.receipt_id
        )
    }
}

#[async_trait]
impl Notifier for AdminNotifier {
    async fn submission_created(
        &self,
        user: &RegisteredUser,
        draft: &ReimbursementDraft,
    ) -> Result<(), SnapError> {
        let text = Self::announcement(user, draft);
        // One unreachable admin chat must not silence the rest.
        for chat_id in &self.admin_chat_ids {
            if let Err(err) = self.transport.send_text(*chat_id, &text).await {
                warn!(chat_id, error = %err, "Failed to notify admin chat");
            }
        }
        Ok(())
    }
}
