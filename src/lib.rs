//! HomeworkBuddy Telegram Bot
//!
//! A Telegram bot for tracking homework. Users capture assignments from a
//! text or photo message, file them under a subject and a deadline, browse
//! them week by week and get daily reminders at a time of their choosing.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{HomeworkBuddyError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, DocumentStore};
pub use services::{Messenger, NotificationService, ReminderScheduler};
pub use state::{AppContext, ScenarioManager, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
