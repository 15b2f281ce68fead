//! Telegram transport: maps Telegram updates to inbound events and
//! implements the outbound side with the Bot API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use teloxide::net::Download;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, KeyboardButton, KeyboardMarkup, Message, PhotoSize, ReplyMarkup, UserId,
};
use tracing::{info, warn};

use crate::event::{InboundEvent, InboundKind};
use crate::handler::ConversationHandler;
use crate::seams::OutboundTransport;

/// Outbound messages over the Telegram Bot API.
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl OutboundTransport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_contact_request(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let button =
            KeyboardButton::new("📱 Share Phone Number").request(ButtonRequest::Contact);
        let mut keyboard = KeyboardMarkup::new(vec![vec![button]]);
        keyboard.resize_keyboard = true;
        keyboard.one_time_keyboard = true;
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(ReplyMarkup::Keyboard(keyboard))
            .await?;
        Ok(())
    }
}

/// Long-polling Telegram listener feeding the conversation handler.
pub struct TelegramChannel {
    bot: Bot,
    handler: Arc<ConversationHandler>,
}

impl TelegramChannel {
    pub fn new(bot: Bot, handler: Arc<ConversationHandler>) -> Self {
        Self { bot, handler }
    }

    /// Run the dispatcher until shutdown (Ctrl-C).
    pub async fn run(self) {
        info!("Starting Telegram channel");

        let tree = Update::filter_message().endpoint(
            |bot: Bot, msg: Message, handler: Arc<ConversationHandler>| async move {
                match classify(&bot, &msg).await {
                    Ok(event) => handler.handle(event).await,
                    Err(err) => {
                        warn!(chat_id = msg.chat.id.0, error = %err, "Failed to read inbound message");
                    }
                }
                respond(())
            },
        );

        Dispatcher::builder(self.bot, tree)
            .dependencies(dptree::deps![self.handler])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

/// Map one Telegram message to a transport-neutral inbound event.
async fn classify(bot: &Bot, msg: &Message) -> anyhow::Result<InboundEvent> {
    let chat_id = msg.chat.id.0;

    let kind = if let Some(photos) = msg.photo() {
        let photo = largest(photos)
            .ok_or_else(|| anyhow::anyhow!("photo message carried no photo sizes"))?;
        let bytes = download(bot, photo).await?;
        InboundKind::Photo {
            bytes,
            filename: format!("receipt_{}.jpg", Utc::now().timestamp_millis()),
            part_of_album: msg.media_group_id().is_some(),
        }
    } else if let Some(contact) = msg.contact() {
        InboundKind::Contact {
            phone_number: contact.phone_number.clone(),
            // A private chat's id equals the sender's user id.
            is_own: contact.user_id == Some(UserId(chat_id as u64)),
        }
    } else if let Some(text) = msg.text() {
        InboundKind::Text(text.to_string())
    } else if msg.document().is_some()
        || msg.video().is_some()
        || msg.audio().is_some()
        || msg.voice().is_some()
        || msg.sticker().is_some()
        || msg.video_note().is_some()
    {
        InboundKind::UnsupportedMedia
    } else {
        InboundKind::Other
    };

    let mut event = InboundEvent::new(chat_id, kind);
    if let Some(name) = msg.chat.first_name() {
        event = event.with_sender_name(name);
    }
    Ok(event)
}

/// Telegram sends several downsampled sizes per photo; keep the largest.
fn largest(photos: &[PhotoSize]) -> Option<&PhotoSize> {
    photos.iter().max_by_key(|p| p.file.size)
}

async fn download(bot: &Bot, photo: &PhotoSize) -> anyhow::Result<Vec<u8>> {
    let file = bot.get_file(photo.file.id.clone()).await?;
    let mut bytes = Vec::with_capacity(file.meta.size as usize);
    bot.download_file(&file.path, &mut bytes).await?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::FileMeta;

    fn photo_size(id: &str, size: u32) -> PhotoSize {
        PhotoSize {
            file: FileMeta {
                id: id.to_string(),
                unique_id: format!("u-{id}"),
                size,
            },
            width: 100,
            height: 100,
        }
    }

    #[test]
    fn picks_the_largest_photo_size() {
        let photos = vec![
            photo_size("thumb", 1_000),
            photo_size("full", 90_000),
            photo_size("medium", 20_000),
        ];
        assert_eq!(largest(&photos).unwrap().file.id, "full");
    }

    #[test]
    fn no_sizes_yields_none() {
        assert!(largest(&[]).is_none());
    }
}
