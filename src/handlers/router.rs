//! Inbound event routing
//!
//! Every update the bot reacts to is reduced to an [`IncomingEvent`] and
//! routed in a fixed order: the step of the active dialog, the dialog's
//! fallbacks, dialog entry points, then plain navigation actions.

use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use crate::services::ReplyTarget;
use crate::state::scenarios::ids;
use crate::state::{AppContext, ConversationContext};
use crate::ui::{keyboards, text, CallbackAction, View};
use crate::utils::errors::{HomeworkBuddyError, Result};
use super::{homework, settings};

/// What the user sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Photo { file_ref: String, caption: Option<String> },
    Action(CallbackAction),
}

/// One user interaction, detached from the Telegram types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEvent {
    pub user_id: i64,
    pub target: ReplyTarget,
    pub input: Inbound,
}

impl IncomingEvent {
    pub fn text(user_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            user_id,
            target: ReplyTarget::chat(chat_id),
            input: Inbound::Text(text.into()),
        }
    }

    pub fn photo(user_id: i64, chat_id: i64, file_ref: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            user_id,
            target: ReplyTarget::chat(chat_id),
            input: Inbound::Photo { file_ref: file_ref.into(), caption },
        }
    }

    pub fn action(user_id: i64, target: ReplyTarget, action: CallbackAction) -> Self {
        Self {
            user_id,
            target,
            input: Inbound::Action(action),
        }
    }

    /// Storage key of the sender
    pub fn user_key(&self) -> String {
        self.user_id.to_string()
    }

    pub fn action_ref(&self) -> Option<&CallbackAction> {
        match &self.input {
            Inbound::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn text_ref(&self) -> Option<&str> {
        match &self.input {
            Inbound::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Route one event and persist the resulting dialog state
///
/// On failure the dialog is reset and the user gets a short notice; the
/// error is still returned so the caller can log it.
pub async fn dispatch(ctx: &AppContext, event: IncomingEvent) -> Result<()> {
    let user_id = event.user_key();
    let mut dialog = ctx.state_storage.load_context(&user_id, event.target.chat_id).await;

    let result = route(ctx, &event, &mut dialog).await;
    if let Err(e) = &result {
        error!(user_id = %user_id, error = %e, "Failed to handle update");
        dialog.cancel_scenario();
        notify(ctx, &event.target, text::SOMETHING_WENT_WRONG, false).await;
    }

    ctx.state_storage.save_context(&dialog).await;
    if let Err(e) = ctx.messenger.acknowledge(&event.target).await {
        warn!(user_id = %user_id, error = %e, "Failed to acknowledge button press");
    }
    result
}

async fn route(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<()> {
    if dialog.is_active() {
        let handled = match dialog.scenario.as_deref() {
            Some(ids::HOMEWORK_CREATION | ids::SUBJECT_INLINE | ids::HOMEWORK_ACTION) => {
                homework::handle_step(ctx, event, dialog).await?
            }
            Some(ids::SUBJECT_CREATE | ids::REMINDER_TIME) => settings::handle_step(ctx, event, dialog).await?,
            other => {
                warn!(scenario = ?other, "Dropping dialog of unknown scenario");
                dialog.cancel_scenario();
                false
            }
        };
        if handled {
            return Ok(());
        }
    }

    match &event.input {
        Inbound::Action(CallbackAction::AddSubject) => settings::start_add_subject(ctx, event, dialog).await,
        Inbound::Action(CallbackAction::EditReminderTime) => settings::start_reminder_time(ctx, event, dialog).await,
        Inbound::Action(CallbackAction::AddHomework) => homework::start_creation(ctx, event, dialog, None, None).await,
        Inbound::Action(CallbackAction::StartAction { action, week_offset }) => {
            homework::start_action(ctx, event, dialog, *action, *week_offset).await
        }
        Inbound::Text(_) | Inbound::Photo { .. } if dialog.is_active() => {
            debug!(user_id = event.user_id, state = ?dialog.current_state(), "Unexpected message during dialog");
            notify(ctx, &event.target, text::FINISH_OR_CANCEL, false).await;
            Ok(())
        }
        Inbound::Text(content) => {
            homework::start_creation(ctx, event, dialog, Some(content.clone()), None).await
        }
        Inbound::Photo { file_ref, caption } => {
            homework::start_creation(ctx, event, dialog, caption.clone(), Some(file_ref.clone())).await
        }
        Inbound::Action(action) => plain_action(ctx, event, dialog, action).await,
    }
}

async fn plain_action(
    ctx: &AppContext,
    event: &IncomingEvent,
    dialog: &mut ConversationContext,
    action: &CallbackAction,
) -> Result<()> {
    let user_id = event.user_key();
    let target = &event.target;

    match action {
        CallbackAction::NavigateWeek(week_offset) => {
            discard(dialog);
            homework::show_week(ctx, target, &user_id, *week_offset).await
        }
        CallbackAction::BackToMainMenu => {
            discard(dialog);
            homework::show_week(ctx, target, &user_id, 0).await
        }
        CallbackAction::ShowSettings => {
            discard(dialog);
            settings::show_settings(ctx, target, &user_id).await
        }
        CallbackAction::ToggleSetting(key) => {
            discard(dialog);
            settings::toggle_setting(ctx, target, &user_id, *key).await
        }
        CallbackAction::ManageSubjects => {
            discard(dialog);
            settings::show_subjects(ctx, target, &user_id, None).await
        }
        CallbackAction::DeleteSubject(subject_id) => {
            discard(dialog);
            settings::delete_subject(ctx, target, &user_id, subject_id).await
        }
        CallbackAction::SubjectInfo(subject_id) => {
            discard(dialog);
            settings::subject_info(ctx, target, &user_id, subject_id).await
        }
        CallbackAction::Cancel => {
            discard(dialog);
            ctx.messenger
                .render(target, View::plain(text::ACTION_CANCELLED).with_keyboard(keyboards::main_menu_keyboard()))
                .await
        }
        other => {
            // Dialog buttons pressed after their dialog ended
            debug!(user_id = %user_id, action = %other, "Stale dialog button");
            notify(ctx, target, text::STALE_BUTTON, false).await;
            Ok(())
        }
    }
}

/// Drop whatever dialog is active
pub(crate) fn discard(dialog: &mut ConversationContext) {
    if let (Some(scenario), step) = dialog.current_state() {
        info!(user_id = %dialog.user_id, scenario = scenario, step = ?step, "Discarding active dialog");
    }
    dialog.cancel_scenario();
}

/// Transient notice whose delivery failure is only logged
pub(crate) async fn notify(ctx: &AppContext, target: &ReplyTarget, message: &str, alert: bool) {
    if let Err(e) = ctx.messenger.notice(target, message, alert).await {
        warn!(chat_id = target.chat_id, error = %e, "Failed to deliver notice");
    }
}

/// Dialog data that an earlier step must have stored
pub(crate) fn required<T: DeserializeOwned>(dialog: &ConversationContext, key: &str) -> Result<T> {
    dialog
        .get_data::<T>(key)?
        .ok_or_else(|| HomeworkBuddyError::InvalidInput(format!("Missing dialog data: {}", key)))
}
