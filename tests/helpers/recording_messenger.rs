//! Messenger double that records outbound traffic

use std::collections::HashSet;
use std::sync::Mutex;
use async_trait::async_trait;
use HomeworkBuddy::services::{Messenger, ReplyTarget};
use HomeworkBuddy::ui::{TextMode, View};
use HomeworkBuddy::{HomeworkBuddyError, Result};

/// Something the bot tried to show a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Render { target: ReplyTarget, view: View },
    Notice { target: ReplyTarget, text: String, alert: bool },
    Send { chat_id: i64, text: String, mode: TextMode },
}

#[derive(Debug, Default)]
pub struct RecordingMessenger {
    log: Mutex<Vec<Outbound>>,
    failing_chats: Mutex<HashSet<i64>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every direct send to `chat_id` fail
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }

    pub fn all(&self) -> Vec<Outbound> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Most recent rendered view
    pub fn last_view(&self) -> Option<View> {
        self.last_render().map(|(_, view)| view)
    }

    /// Most recent render together with its target
    pub fn last_render(&self) -> Option<(ReplyTarget, View)> {
        self.log.lock().unwrap().iter().rev().find_map(|out| match out {
            Outbound::Render { target, view } => Some((target.clone(), view.clone())),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|out| match out {
                Outbound::Notice { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|out| match out {
                Outbound::Send { chat_id: to, text, .. } if *to == chat_id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn render(&self, target: &ReplyTarget, view: View) -> Result<()> {
        self.log.lock().unwrap().push(Outbound::Render { target: target.clone(), view });
        Ok(())
    }

    async fn notice(&self, target: &ReplyTarget, text: &str, alert: bool) -> Result<()> {
        self.log.lock().unwrap().push(Outbound::Notice {
            target: target.clone(),
            text: text.to_string(),
            alert,
        });
        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str, mode: TextMode) -> Result<()> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            return Err(HomeworkBuddyError::Delivery(format!("chat {} is unreachable", chat_id)));
        }
        self.log.lock().unwrap().push(Outbound::Send {
            chat_id,
            text: text.to_string(),
            mode,
        });
        Ok(())
    }
}
