//! Start command handler

use tracing::info;
use crate::handlers::homework;
use crate::services::ReplyTarget;
use crate::state::AppContext;
use crate::ui::{text, TextMode};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// Handle /start: drop any dialog, register the user and show this week
pub async fn handle_start(ctx: &AppContext, user_id: i64, chat_id: i64) -> Result<()> {
    let key = user_id.to_string();
    ctx.state_storage.delete_context(&key, chat_id).await;

    if ctx.database.users.find(&key).await?.is_none() {
        ctx.database.users.get_or_create_user(&key).await?;
        info!(user_id = user_id, "New user registered");
        ctx.messenger.send(chat_id, text::WELCOME_MESSAGE, TextMode::Plain).await?;
    }

    log_user_action(&key, "start", None);
    homework::show_week(ctx, &ReplyTarget::chat(chat_id), &key, 0).await
}
