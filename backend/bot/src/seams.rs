//! Trait seams between the conversation layer and its collaborators.

use async_trait::async_trait;
use claimsnap_core::{RegisteredUser, ReimbursementDraft, SnapError};
use uuid::Uuid;

/// Lookup and linking of registered employees.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_chat(&self, chat_id: i64) -> Result<Option<RegisteredUser>, SnapError>;

    /// Lookup by canonical `+<digits>` phone number.
    async fn find_by_phone(&self, phone_number: &str)
        -> Result<Option<RegisteredUser>, SnapError>;

    async fn link_chat(&self, user_id: Uuid, chat_id: i64) -> Result<(), SnapError>;
}

/// Where completed reimbursement drafts go. The approval workflow behind
/// it is out of scope.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, draft: ReimbursementDraft) -> Result<(), SnapError>;
}

/// Outbound side of the conversation transport.
#[async_trait]
pub trait OutboundTransport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;

    /// Send text along with whatever affordance the transport has for
    /// sharing a contact. Defaults to a plain text send.
    async fn send_contact_request(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.send_text(chat_id, text).await
    }
}

/// Fire-and-forget notifications after a submission is created. Failures
/// here must never fail the submission itself.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn submission_created(
        &self,
        user: &RegisteredUser,
        draft: &ReimbursementDraft,
    ) -> Result<(), SnapError>;
}
