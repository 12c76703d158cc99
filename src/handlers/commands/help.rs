//! Help command handler

use crate::state::AppContext;
use crate::ui::{text, TextMode};
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(ctx: &AppContext, chat_id: i64) -> Result<()> {
    ctx.messenger.send(chat_id, text::HELP_MESSAGE, TextMode::Html).await
}
