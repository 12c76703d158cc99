//! Admin statistics command

use tracing::warn;
use crate::state::AppContext;
use crate::ui::{text, TextMode};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// Whether `message` invokes the configured admin command, with or without a bot mention
pub fn is_admin_command(ctx: &AppContext, message: &str) -> bool {
    let command = message
        .split_whitespace()
        .next()
        .and_then(|word| word.split('@').next())
        .unwrap_or_default();
    !command.is_empty() && command == ctx.settings.bot.admin_command
}

/// Send user and homework totals to an admin
pub async fn handle_stats(ctx: &AppContext, user_id: i64, chat_id: i64) -> Result<()> {
    if !ctx.is_admin(user_id) {
        warn!(user_id = user_id, "Non-admin requested statistics");
        return ctx.messenger.send(chat_id, text::ACCESS_DENIED, TextMode::Plain).await;
    }

    let stats = ctx.database.get_system_stats().await?;
    let updated = ctx.clock.now().format("%d.%m.%Y %H:%M").to_string();
    log_user_action(&user_id.to_string(), "admin_stats", None);

    let message = text::admin_stats(stats.users, stats.homework, &updated);
    ctx.messenger.send(chat_id, &message, TextMode::Html).await
}
