// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram chat adapter for the Citabot booking bot.
//!
//! Wraps a teloxide [`Bot`] behind the core adapter traits: outbound
//! sends with inline keyboards, webhook registration, the identity
//! probe used by the resilience supervisor, and a long-polling loop for
//! deployments without a public URL.

pub mod convert;
pub mod polling;

use async_trait::async_trait;
use citabot_core::{ChatId, ChatTransport, CitabotError, DeliveryEndpoint, IdentityProbe, Reply};
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardButton, InlineKeyboardMarkup, Recipient};
use tracing::{debug, info};

/// Telegram adapter implementing the chat-side traits.
///
/// Cheap to clone; all clones share the underlying HTTP client.
#[derive(Clone)]
pub struct TelegramApi {
    bot: Bot,
}

impl TelegramApi {
    /// Creates the adapter from a bot token.
    pub fn new(token: &str) -> Result<Self, CitabotError> {
        if token.is_empty() {
            return Err(CitabotError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Maps a reply keyboard onto Telegram's inline-keyboard markup.
fn to_inline_keyboard(rows: Vec<Vec<citabot_core::Button>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
        row.into_iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.data))
            .collect::<Vec<_>>()
    }))
}

#[async_trait]
impl ChatTransport for TelegramApi {
    async fn send(&self, chat: ChatId, reply: Reply) -> Result<(), CitabotError> {
        let recipient = Recipient::Id(teloxide::types::ChatId(chat.0));
        let request = self.bot.send_message(recipient, reply.text);

        let result = match reply.keyboard {
            Some(rows) => request.reply_markup(to_inline_keyboard(rows)).await,
            None => request.await,
        };

        result.map_err(|e| CitabotError::Channel {
            message: format!("failed to send message to chat {chat}: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(())
    }

    async fn acknowledge_callback(&self, callback_id: &str) -> Result<(), CitabotError> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .await
            .map_err(|e| CitabotError::Channel {
                message: format!("failed to acknowledge callback: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

#[async_trait]
impl DeliveryEndpoint for TelegramApi {
    async fn register(&self, url: &str) -> Result<(), CitabotError> {
        let parsed: url::Url = url.parse().map_err(|e| {
            CitabotError::Config(format!("webhook URL {url} is not a valid URL: {e}"))
        })?;

        info!(%url, "registering Telegram webhook");
        self.bot
            .set_webhook(parsed)
            .await
            .map_err(|e| CitabotError::Channel {
                message: format!("failed to set webhook: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn unregister(&self, drop_pending: bool) -> Result<(), CitabotError> {
        debug!(drop_pending, "removing Telegram webhook");
        self.bot
            .delete_webhook()
            .drop_pending_updates(drop_pending)
            .await
            .map_err(|e| CitabotError::Channel {
                message: format!("failed to delete webhook: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProbe for TelegramApi {
    async fn identity(&self) -> Result<String, CitabotError> {
        let me = self.bot.get_me().await.map_err(|e| CitabotError::Channel {
            message: format!("identity probe failed: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(me.username().to_string())
    }
}
