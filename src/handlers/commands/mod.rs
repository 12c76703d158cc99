//! Command handlers module
//!
//! This module contains handlers for the bot commands. The admin statistics
//! command has a configurable name and is matched by the message handler.

pub mod start;
pub mod help;
pub mod stats;

use std::sync::Arc;
use teloxide::{types::Message, utils::command::BotCommands};
use tracing::debug;
use crate::state::AppContext;
use crate::utils::errors::{HomeworkBuddyError, Result};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "HomeworkBuddy commands:")]
pub enum Command {
    #[command(description = "Open your homework for this week")]
    Start,
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(msg: Message, cmd: Command, ctx: Arc<AppContext>) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        HomeworkBuddyError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;

    debug!(user_id = user_id, chat_id = chat_id, command = ?cmd, "Processing command");
    match cmd {
        Command::Start => start::handle_start(&ctx, user_id, chat_id).await,
        Command::Help => help::handle_help(&ctx, chat_id).await,
    }
}
