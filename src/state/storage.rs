//! State storage implementation
//!
//! Dialog contexts are transient: they live in memory, keyed by
//! (user, chat), and expire after a period of inactivity.

use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};
use super::context::ConversationContext;

type ContextKey = (String, i64);

/// In-memory dialog state storage
#[derive(Debug, Default)]
pub struct StateStorage {
    contexts: Mutex<HashMap<ContextKey, ConversationContext>>,
}

impl StateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save conversation context; an inactive context is removed instead
    pub async fn save_context(&self, context: &ConversationContext) {
        let key = (context.user_id.clone(), context.chat_id);
        let mut contexts = self.contexts.lock().await;

        if context.is_active() {
            debug!(user_id = %context.user_id, chat_id = context.chat_id, scenario = ?context.scenario,
                   step = ?context.step, "Saving dialog context");
            contexts.insert(key, context.clone());
        } else if contexts.remove(&key).is_some() {
            debug!(user_id = %context.user_id, chat_id = context.chat_id, "Dialog context cleared");
        }
    }

    /// Load the dialog context of a user in a chat, or a fresh one
    pub async fn load_context(&self, user_id: &str, chat_id: i64) -> ConversationContext {
        let key = (user_id.to_string(), chat_id);
        let mut contexts = self.contexts.lock().await;

        match contexts.get(&key) {
            Some(context) if context.is_expired() => {
                debug!(user_id = user_id, chat_id = chat_id, expires_at = ?context.expires_at,
                       "Context has expired, removing");
                contexts.remove(&key);
                ConversationContext::new(user_id, chat_id)
            }
            Some(context) => context.clone(),
            None => ConversationContext::new(user_id, chat_id),
        }
    }

    /// Delete the dialog context of a user in a chat
    pub async fn delete_context(&self, user_id: &str, chat_id: i64) {
        self.contexts.lock().await.remove(&(user_id.to_string(), chat_id));
    }

    /// Clean up expired contexts
    pub async fn cleanup_expired_contexts(&self) -> usize {
        let mut contexts = self.contexts.lock().await;
        let before = contexts.len();
        contexts.retain(|_, context| !context.is_expired());
        let cleaned = before - contexts.len();

        if cleaned > 0 {
            info!("Cleaned up {} expired contexts", cleaned);
        }
        cleaned
    }

    /// Number of stored dialogs, expired ones included until they are cleaned up
    pub async fn stored_count(&self) -> usize {
        self.contexts.lock().await.len()
    }
}
