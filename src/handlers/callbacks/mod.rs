//! Callback query handlers module
//!
//! Parses inline button payloads and routes them as dialog events.

use std::sync::Arc;
use teloxide::types::CallbackQuery;
use tracing::{debug, warn};
use crate::handlers::router::{dispatch, IncomingEvent};
use crate::services::ReplyTarget;
use crate::state::AppContext;
use crate::ui::CallbackAction;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(query: CallbackQuery, ctx: Arc<AppContext>) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query.message.as_ref().map(|m| m.chat().id.0).unwrap_or(user_id);
    let message_id = query.message.as_ref().map(|m| m.id().0);
    let target = ReplyTarget::callback(chat_id, message_id, query.id.to_string());

    debug!(user_id = user_id, callback_data = ?query.data, "Processing callback query");

    let Some(action) = query.data.as_deref().and_then(CallbackAction::parse) else {
        warn!(user_id = user_id, callback_data = ?query.data, "Unrecognised callback data");
        return ctx.messenger.acknowledge(&target).await;
    };

    dispatch(&ctx, IncomingEvent::action(user_id, target, action)).await
}
