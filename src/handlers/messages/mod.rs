//! Message handlers module
//!
//! Turns incoming text and photo messages into dialog events.

use std::sync::Arc;
use teloxide::types::Message;
use tracing::debug;
use crate::handlers::commands::stats;
use crate::handlers::router::{dispatch, IncomingEvent};
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Handle incoming text and photo messages
pub async fn handle_message(msg: Message, ctx: Arc<AppContext>) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = msg.chat.id.0, "Ignoring message without sender");
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;

    if let Some(content) = msg.text() {
        if stats::is_admin_command(&ctx, content) {
            return stats::handle_stats(&ctx, user_id, chat_id).await;
        }
        if content.starts_with('/') {
            debug!(user_id = user_id, command = content, "Ignoring unknown command");
            return Ok(());
        }
        return dispatch(&ctx, IncomingEvent::text(user_id, chat_id, content)).await;
    }

    // Telegram lists photo sizes smallest first
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        let caption = msg.caption().map(str::to_string);
        let event = IncomingEvent::photo(user_id, chat_id, photo.file.id.to_string(), caption);
        return dispatch(&ctx, event).await;
    }

    debug!(user_id = user_id, "Ignoring unsupported message");
    Ok(())
}
