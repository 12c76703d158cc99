//! Services module
//!
//! This module contains outbound messaging, reminder notifications and the
//! background scheduler

pub mod messenger;
pub mod notification;
pub mod scheduler;

// Re-export commonly used services
pub use messenger::{Messenger, ReplyTarget, TelegramMessenger};
pub use notification::{NotificationService, NotificationStats};
pub use scheduler::{ReminderReport, ReminderScheduler, Trigger, TriggerKind};
