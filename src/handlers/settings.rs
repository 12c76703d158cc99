//! Settings view, subject management and the settings dialogs

use tracing::debug;
use crate::models::{NotificationTime, SettingKey, SettingValue};
use crate::services::ReplyTarget;
use crate::state::scenarios::{ids, steps};
use crate::state::{AppContext, ConversationContext};
use crate::ui::{keyboards, text, Button, CallbackAction, Keyboard, View};
use crate::utils::errors::Result;
use crate::utils::logging::{log_dialog_transition, log_user_action};
use super::router::{discard, notify, Inbound, IncomingEvent};

pub async fn show_settings(ctx: &AppContext, target: &ReplyTarget, user_id: &str) -> Result<()> {
    let settings = ctx.database.users.get_settings(user_id).await?;
    ctx.messenger
        .render(target, View::plain(text::SETTINGS_TITLE).with_keyboard(keyboards::settings_keyboard(&settings)))
        .await
}

async fn render_settings_with(ctx: &AppContext, target: &ReplyTarget, user_id: &str, body: &str) -> Result<()> {
    let settings = ctx.database.users.get_settings(user_id).await?;
    ctx.messenger
        .render(target, View::plain(body).with_keyboard(keyboards::settings_keyboard(&settings)))
        .await
}

pub async fn toggle_setting(ctx: &AppContext, target: &ReplyTarget, user_id: &str, key: SettingKey) -> Result<()> {
    let value = ctx.database.users.toggle_setting(user_id, key).await?;
    log_user_action(user_id, "setting_toggled", Some(&format!("{}={}", key.as_str(), value)));
    show_settings(ctx, target, user_id).await
}

/// Subject management list, optionally under a status line
pub async fn show_subjects(ctx: &AppContext, target: &ReplyTarget, user_id: &str, header: Option<&str>) -> Result<()> {
    let subjects = ctx.database.subjects.get_subjects(user_id).await?;
    let body = match header {
        Some(header) => format!("{}\n\n{}", header, text::MY_SUBJECTS),
        None => text::MY_SUBJECTS.to_string(),
    };
    ctx.messenger
        .render(target, View::plain(body).with_keyboard(keyboards::subjects_management_keyboard(&subjects)))
        .await
}

/// Delete a subject together with its homework
pub async fn delete_subject(ctx: &AppContext, target: &ReplyTarget, user_id: &str, subject_id: &str) -> Result<()> {
    if ctx.database.subjects.delete_subject(user_id, subject_id).await? {
        log_user_action(user_id, "subject_deleted", Some(subject_id));
        show_subjects(ctx, target, user_id, Some(text::SUBJECT_DELETED)).await
    } else {
        notify(ctx, target, text::SUBJECT_NOT_FOUND, false).await;
        show_subjects(ctx, target, user_id, None).await
    }
}

pub async fn subject_info(ctx: &AppContext, target: &ReplyTarget, user_id: &str, subject_id: &str) -> Result<()> {
    let Some(subject) = ctx.database.subjects.find(user_id, subject_id).await? else {
        notify(ctx, target, text::SUBJECT_NOT_FOUND, false).await;
        return show_subjects(ctx, target, user_id, None).await;
    };

    let count = ctx.database.subjects.homework_count(user_id, subject_id).await?;
    let keyboard = Keyboard::new(vec![
        vec![Button::new("🗑️ Delete", CallbackAction::DeleteSubject(subject.id.clone()))],
        vec![Button::new("◀️ Back", CallbackAction::ManageSubjects)],
    ]);
    ctx.messenger
        .render(target, View::html(text::subject_info(&subject.name, count)).with_keyboard(keyboard))
        .await
}

pub async fn start_add_subject(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<()> {
    let user_id = event.user_key();
    discard(dialog);
    ctx.scenario_manager.start_scenario(dialog, ids::SUBJECT_CREATE)?;
    log_dialog_transition(&user_id, ids::SUBJECT_CREATE, None, Some(steps::CREATING_SUBJECT));

    ctx.messenger
        .render(&event.target, View::plain(text::ENTER_SUBJECT_NAME).with_keyboard(keyboards::cancel_keyboard()))
        .await
}

pub async fn start_reminder_time(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<()> {
    let user_id = event.user_key();
    discard(dialog);
    ctx.scenario_manager.start_scenario(dialog, ids::REMINDER_TIME)?;
    log_dialog_transition(&user_id, ids::REMINDER_TIME, None, Some(steps::EDITING_REMINDER_TIME));

    let keyboard = keyboards::time_selection_keyboard(CallbackAction::SetDefaultTime, false);
    ctx.messenger
        .render(&event.target, View::plain(text::CHOOSE_DEFAULT_TIME).with_keyboard(keyboard))
        .await
}

/// Handle input for an active settings dialog; `false` when the input is not for it
pub async fn handle_step(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<bool> {
    let user_id = event.user_key();
    let target = &event.target;
    let scenario = dialog.scenario.clone().unwrap_or_default();

    if matches!(event.action_ref(), Some(CallbackAction::Cancel)) {
        let from = dialog.step.clone();
        dialog.cancel_scenario();
        log_dialog_transition(&user_id, &scenario, from.as_deref(), None);
        render_settings_with(ctx, target, &user_id, text::ACTION_CANCELLED).await?;
        return Ok(true);
    }

    match (scenario.as_str(), &event.input) {
        (ids::SUBJECT_CREATE, Inbound::Text(name)) => {
            if ctx.scenario_manager.validate_input(dialog, name).is_err() {
                ctx.messenger
                    .render(target, View::plain(text::EMPTY_SUBJECT_NAME).with_keyboard(keyboards::cancel_keyboard()))
                    .await?;
                return Ok(true);
            }

            let subject = ctx.database.subjects.add_subject(&user_id, name).await?;
            dialog.complete_scenario();
            log_dialog_transition(&user_id, ids::SUBJECT_CREATE, Some(steps::CREATING_SUBJECT), None);
            log_user_action(&user_id, "subject_added", Some(&subject.name));
            show_subjects(ctx, target, &user_id, Some(text::subject_added(&subject.name).as_str())).await?;
            Ok(true)
        }
        (ids::REMINDER_TIME, Inbound::Action(CallbackAction::SetDefaultTime(raw))) => {
            if let Err(e) = ctx.scenario_manager.validate_input(dialog, raw) {
                debug!(user_id = %user_id, error = %e, "Rejected default reminder time");
                notify(ctx, target, &e.to_string(), false).await;
                return Ok(true);
            }

            let slot: NotificationTime = raw.parse()?;
            ctx.database
                .users
                .update_setting(&user_id, SettingKey::DefaultNotificationTime, SettingValue::Time(slot))
                .await?;
            dialog.complete_scenario();
            log_dialog_transition(&user_id, ids::REMINDER_TIME, Some(steps::EDITING_REMINDER_TIME), None);
            log_user_action(&user_id, "default_time_set", Some(raw));
            render_settings_with(ctx, target, &user_id, &text::default_time_set(&slot.to_string())).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
