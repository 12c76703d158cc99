//! Outbound messaging
//!
//! Handlers and the scheduler talk to users only through [`Messenger`].
//! [`TelegramMessenger`] is the production implementation on top of teloxide.

use std::collections::HashSet;
use async_trait::async_trait;
use teloxide::{
    ApiError, Bot, RequestError,
    payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters, SendMessageSetters},
    prelude::Requester,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode},
};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use crate::ui::{Keyboard, TextMode, View};
use crate::utils::errors::Result;

/// Where a reply goes: the chat, the message to replace and the button press to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub chat_id: i64,
    /// Message to edit in place; a new message is sent when absent
    pub message_id: Option<i32>,
    /// Pending button press, answered by notices
    pub callback_id: Option<String>,
}

impl ReplyTarget {
    /// Reply to a typed message: always sends a new message
    pub fn chat(chat_id: i64) -> Self {
        Self { chat_id, message_id: None, callback_id: None }
    }

    /// Reply to a button press on `message_id`
    pub fn callback(chat_id: i64, message_id: Option<i32>, callback_id: impl Into<String>) -> Self {
        Self { chat_id, message_id, callback_id: Some(callback_id.into()) }
    }

    /// Same chat, but any further render sends a new message
    pub fn detached(&self) -> Self {
        Self { chat_id: self.chat_id, message_id: None, callback_id: self.callback_id.clone() }
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Show a view, replacing the target message if there is one
    async fn render(&self, target: &ReplyTarget, view: View) -> Result<()>;

    /// Short transient notice; a popup when `alert` is set
    async fn notice(&self, target: &ReplyTarget, text: &str, alert: bool) -> Result<()>;

    /// Direct message to a user, independent of any dialog
    async fn send(&self, chat_id: i64, text: &str, mode: TextMode) -> Result<()>;

    /// Finish handling a button press that produced no notice
    async fn acknowledge(&self, _target: &ReplyTarget) -> Result<()> {
        Ok(())
    }
}

fn parse_mode(mode: TextMode) -> Option<ParseMode> {
    match mode {
        TextMode::Plain => None,
        TextMode::Html => Some(ParseMode::Html),
    }
}

fn to_markup(keyboard: Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.into_iter().map(|row| {
        row.into_iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.data))
            .collect::<Vec<_>>()
    }))
}

/// Telegram implementation of [`Messenger`]
pub struct TelegramMessenger {
    bot: Bot,
    /// Button presses already answered with a notice
    answered: Mutex<HashSet<String>>,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot, answered: Mutex::new(HashSet::new()) }
    }

    async fn send_view(&self, chat_id: ChatId, view: View) -> Result<()> {
        let mut request = self.bot.send_message(chat_id, view.text);
        if let Some(mode) = parse_mode(view.mode) {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = view.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        request.await?;
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn render(&self, target: &ReplyTarget, view: View) -> Result<()> {
        let chat_id = ChatId(target.chat_id);
        let Some(message_id) = target.message_id else {
            return self.send_view(chat_id, view).await;
        };

        let mut request = self.bot.edit_message_text(chat_id, MessageId(message_id), view.text.clone());
        if let Some(mode) = parse_mode(view.mode) {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = view.keyboard.clone() {
            request = request.reply_markup(to_markup(keyboard));
        }

        match request.await {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::MessageNotModified)) => {
                debug!(chat_id = target.chat_id, message_id = message_id, "Message not modified");
                Ok(())
            }
            Err(RequestError::Api(e)) => {
                // Photo messages and old messages cannot be edited into text
                warn!(chat_id = target.chat_id, message_id = message_id, error = %e, "Edit failed, sending a new message");
                self.send_view(chat_id, view).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn notice(&self, target: &ReplyTarget, text: &str, alert: bool) -> Result<()> {
        match &target.callback_id {
            Some(callback_id) => {
                self.answered.lock().await.insert(callback_id.clone());
                self.bot
                    .answer_callback_query(callback_id.clone())
                    .text(text)
                    .show_alert(alert)
                    .await?;
            }
            None => {
                self.bot.send_message(ChatId(target.chat_id), text).await?;
            }
        }
        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str, mode: TextMode) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(mode) = parse_mode(mode) {
            request = request.parse_mode(mode);
        }
        request.await?;
        Ok(())
    }

    async fn acknowledge(&self, target: &ReplyTarget) -> Result<()> {
        let Some(callback_id) = &target.callback_id else {
            return Ok(());
        };
        if self.answered.lock().await.remove(callback_id) {
            return Ok(());
        }
        self.bot.answer_callback_query(callback_id.clone()).await?;
        Ok(())
    }
}
