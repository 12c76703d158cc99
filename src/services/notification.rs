//! Notification service implementation
//!
//! Composes and delivers reminder messages and keeps delivery statistics.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use crate::models::Homework;
use crate::services::messenger::Messenger;
use crate::ui::{text, TextMode};
use crate::utils::errors::{HomeworkBuddyError, Result};

/// Notification statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
}

/// Notification service for reminder delivery
pub struct NotificationService {
    messenger: Arc<dyn Messenger>,
    sent: AtomicU64,
    failed: AtomicU64,
}

impl NotificationService {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self {
            messenger,
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Send one reminder listing `homework` to a user
    pub async fn send_reminder(
        &self,
        user_id: &str,
        homework: &[Homework],
        subjects: &BTreeMap<String, String>,
    ) -> Result<()> {
        let chat_id: i64 = user_id.parse().map_err(|_| {
            self.failed.fetch_add(1, Ordering::Relaxed);
            HomeworkBuddyError::Delivery(format!("User id {} is not a chat id", user_id))
        })?;

        let message = text::format_reminder(homework, subjects);
        match self.messenger.send(chat_id, &message, TextMode::Html).await {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                debug!(user_id = user_id, items = homework.len(), "Reminder sent");
                Ok(())
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                error!(user_id = user_id, error = %e, "Failed to send reminder");
                Err(e)
            }
        }
    }

    /// Get notification statistics
    pub fn get_stats(&self) -> NotificationStats {
        NotificationStats {
            total_sent: self.sent.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("stats", &self.get_stats())
            .finish_non_exhaustive()
    }
}
