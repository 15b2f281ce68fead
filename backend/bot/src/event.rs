//! Inbound conversation events, decoupled from any transport.

/// One inbound event from a remote chat identity.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub chat_id: i64,
    /// Sender's display name, when the transport provides one.
    pub sender_name: Option<String>,
    pub kind: InboundKind,
}

/// What arrived. Dispatch is an exhaustive match; adding a kind forces
/// every handler arm to be revisited.
#[derive(Debug, Clone)]
pub enum InboundKind {
    Photo {
        bytes: Vec<u8>,
        filename: String,
        /// Part of a multi-image batch; batches are rejected outright.
        part_of_album: bool,
    },
    Text(String),
    Contact {
        phone_number: String,
        /// Whether the shared contact belongs to the sender.
        is_own: bool,
    },
    /// Documents, video, audio, voice notes, stickers.
    UnsupportedMedia,
    /// Anything else the transport could not classify.
    Other,
}

impl InboundEvent {
    pub fn new(chat_id: i64, kind: InboundKind) -> Self {
        Self {
            chat_id,
            sender_name: None,
            kind,
        }
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }
}
