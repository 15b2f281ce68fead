//! Conversation layer: inbound event model, per-chat session state
//! machine, registration handshake, and the Telegram adapter.

pub mod directory;
pub mod event;
pub mod handler;
pub mod phone;
pub mod replies;
pub mod seams;
pub mod session;
pub mod telegram;

pub use directory::InMemoryUserDirectory;
pub use event::{InboundEvent, InboundKind};
pub use handler::ConversationHandler;
pub use seams::{Notifier, OutboundTransport, SubmissionSink, UserDirectory};
pub use session::{PendingReceipt, SessionMap};
pub use telegram::{TelegramChannel, TelegramTransport};
