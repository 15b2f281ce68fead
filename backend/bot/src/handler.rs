//! The per-chat conversation state machine.
//!
//! States per chat identity: `Idle → AwaitingDescription → Idle`. The
//! session map is the only state; everything else is a stateless
//! reaction to one inbound event.

use std::sync::Arc;

use claimsnap_core::{RegisteredUser, ReimbursementDraft};
use claimsnap_intake::IntakeOrchestrator;
use tracing::{error, info, warn};

use crate::event::{InboundEvent, InboundKind};
use crate::phone::normalize_phone_number;
use crate::replies;
use crate::seams::{Notifier, OutboundTransport, SubmissionSink, UserDirectory};
use crate::session::{PendingReceipt, SessionMap};

pub struct ConversationHandler {
    intake: Arc<IntakeOrchestrator>,
    sessions: SessionMap,
    users: Arc<dyn UserDirectory>,
    submissions: Arc<dyn SubmissionSink>,
    notifier: Arc<dyn Notifier>,
    transport: Arc<dyn OutboundTransport>,
}

impl ConversationHandler {
    pub fn new(
        intake: Arc<IntakeOrchestrator>,
        users: Arc<dyn UserDirectory>,
        submissions: Arc<dyn SubmissionSink>,
        notifier: Arc<dyn Notifier>,
        transport: Arc<dyn OutboundTransport>,
    ) -> Self {
        Self {
            intake,
            sessions: SessionMap::new(),
            users,
            submissions,
            notifier,
            transport,
        }
    }

    /// React to one inbound event. Never fails: every outcome is a chat
    /// reply (or a logged send failure).
    pub async fn handle(&self, event: InboundEvent) {
        let chat_id = event.chat_id;
        let user = match self.users.find_by_chat(chat_id).await {
            Ok(user) => user,
            Err(err) => {
                error!(chat_id, error = %err, "User lookup failed");
                return;
            }
        };

        match user {
            Some(user) => self.handle_registered(user, event).await,
            None => self.handle_unregistered(event).await,
        }
    }

    async fn handle_registered(&self, user: RegisteredUser, event: InboundEvent) {
        let chat_id = event.chat_id;
        match event.kind {
            InboundKind::Photo {
                bytes,
                filename,
                part_of_album,
            } => {
                if part_of_album {
                    self.say(chat_id, replies::MULTIPLE_PHOTOS).await;
                    return;
                }
                self.handle_photo(chat_id, &bytes, &filename).await;
            }
            InboundKind::Text(text) => self.handle_text(&user, chat_id, text).await,
            InboundKind::Contact { .. } | InboundKind::Other => {
                self.say(chat_id, replies::UNSUPPORTED_MESSAGE).await;
            }
            InboundKind::UnsupportedMedia => {
                self.say(chat_id, replies::INVALID_FILE_TYPE).await;
            }
        }
    }

    async fn handle_photo(&self, chat_id: i64, bytes: &[u8], filename: &str) {
        let result = match self.intake.ingest(bytes, filename).await {
            Ok(result) => result,
            Err(err) => {
                // Internal detail stays in the log; the chat gets
                // generic guidance.
                error!(chat_id, error = %err, "Receipt upload failed");
                self.say(chat_id, replies::UPLOAD_ERROR).await;
                return;
            }
        };

        if !result.fields.has_usable_signal() {
            info!(chat_id, receipt_id = %result.receipt_id, "No usable signal; discarding receipt");
            self.intake.discard(result.receipt_id).await;
            self.say(chat_id, replies::PROCESSING_FAILED).await;
            return;
        }

        let pending = PendingReceipt {
            receipt_id: result.receipt_id,
            amount: result.fields.amount,
            merchant_name: result.fields.merchant_name.clone(),
        };
        self.sessions.open(chat_id, pending).await;
        self.say(
            chat_id,
            &replies::receipt_summary(&result.fields.merchant_name, result.fields.amount),
        )
        .await;
    }

    async fn handle_text(&self, user: &RegisteredUser, chat_id: i64, text: String) {
        let Some(pending) = self.sessions.take(chat_id).await else {
            if text == "/start" {
                self.say(chat_id, replies::WELCOME_HELP).await;
            } else {
                self.say(chat_id, replies::SEND_PHOTO_GUIDANCE).await;
            }
            return;
        };

        if text == "/start" || text == "/cancel" {
            self.say(chat_id, replies::CANCELLED).await;
            return;
        }

        let draft = ReimbursementDraft {
            receipt_id: pending.receipt_id,
            user_id: user.id,
            requested_amount: pending.amount,
            description: text,
        };

        // The session is already gone: no retry loop on failure.
        match self.submissions.submit(draft.clone()).await {
            Ok(()) => {
                self.say(
                    chat_id,
                    &replies::submitted_summary(
                        &pending.merchant_name,
                        pending.amount,
                        &draft.description,
                    ),
                )
                .await;
                self.notify(user.clone(), draft);
            }
            Err(err) => {
                warn!(chat_id, error = %err, "Submission failed");
                self.say(chat_id, replies::SUBMISSION_ERROR).await;
            }
        }
    }

    async fn handle_unregistered(&self, event: InboundEvent) {
        let chat_id = event.chat_id;
        let sender_name = event.sender_name;
        match event.kind {
            InboundKind::Contact {
                phone_number,
                is_own,
            } => {
                if !is_own {
                    self.request_contact(chat_id, replies::SHARE_OWN_CONTACT).await;
                    return;
                }
                self.handle_contact_shared(chat_id, &phone_number).await;
            }
            InboundKind::Text(text) if text == "/start" => {
                let name = sender_name.as_deref().unwrap_or("there");
                self.request_contact(chat_id, &replies::contact_request_welcome(name))
                    .await;
            }
            _ => {
                self.request_contact(chat_id, replies::CONTACT_REQUEST_REMINDER)
                    .await;
            }
        }
    }

    async fn handle_contact_shared(&self, chat_id: i64, phone_number: &str) {
        let phone = normalize_phone_number(phone_number);
        let user = match self.users.find_by_phone(&phone).await {
            Ok(user) => user,
            Err(err) => {
                error!(chat_id, error = %err, "Phone lookup failed");
                self.request_contact(chat_id, replies::CONTACT_REQUEST_REMINDER)
                    .await;
                return;
            }
        };

        let Some(user) = user else {
            self.say(chat_id, &replies::phone_not_found(&phone)).await;
            return;
        };

        if let Some(existing) = user.chat_id {
            if existing != chat_id {
                self.say(chat_id, replies::PHONE_ALREADY_LINKED).await;
                return;
            }
        }

        match self.users.link_chat(user.id, chat_id).await {
            Ok(()) => {
                info!(chat_id, user_id = %user.id, "Registered chat identity");
                self.say(chat_id, &replies::registration_success(&user)).await;
            }
            Err(err) => {
                error!(chat_id, error = %err, "Chat linking failed");
                self.request_contact(chat_id, replies::CONTACT_REQUEST_REMINDER)
                    .await;
            }
        }
    }

    /// Kick off the post-submission notification off the critical path.
    /// Its failure never surfaces to the submitting chat.
    fn notify(&self, user: RegisteredUser, draft: ReimbursementDraft) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.submission_created(&user, &draft).await {
                warn!(user_id = %user.id, error = %err, "Submission notification failed; ignoring");
            }
        });
    }

    async fn say(&self, chat_id: i64, text: &str) {
        if let Err(err) = self.transport.send_text(chat_id, text).await {
            error!(chat_id, error = %err, "Failed to send chat message");
        }
    }

    async fn request_contact(&self, chat_id: i64, text: &str) {
        if let Err(err) = self.transport.send_contact_request(chat_id, text).await {
            error!(chat_id, error = %err, "Failed to send contact request");
        }
    }
}
