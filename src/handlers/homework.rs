//! Homework dialogs
//!
//! Creation walks subject, week, day and optionally reminder time, with a
//! nested dialog for creating a subject on the way. Actions (done, edit,
//! delete) select an item from the active homework of the displayed week.

use chrono::NaiveDate;
use tracing::{debug, info};
use crate::models::{CreateHomeworkRequest, Homework, NotificationTime};
use crate::services::ReplyTarget;
use crate::state::scenarios::{ids, steps};
use crate::state::{AppContext, ConversationContext};
use crate::ui::actions::SKIP;
use crate::ui::{keyboards, text, CallbackAction, HomeworkAction, View};
use crate::utils::errors::{HomeworkBuddyError, Result};
use crate::utils::helpers::{week_bounds, week_offset_of, week_start};
use crate::utils::logging::{log_dialog_transition, log_user_action};
use super::router::{discard, notify, required, IncomingEvent};

/// Dialog data keys
mod keys {
    pub const TEXT: &str = "text";
    pub const PHOTO: &str = "photo_ref";
    pub const SUBJECT: &str = "subject_id";
    pub const WEEK_START: &str = "week_start";
    pub const DEADLINE: &str = "deadline_date";
    pub const HOMEWORK: &str = "homework_id";
    pub const WEEK_OFFSET: &str = "week_offset";
}

/// Week text and the active items of that week in selection order
async fn week_view(ctx: &AppContext, user_id: &str, week_offset: i64) -> Result<(String, Vec<Homework>)> {
    let (start, _) = week_bounds(ctx.clock.today(), week_offset)?;
    let homework = ctx.database.homework.get_homework_for_week(user_id, week_offset).await?;
    let subjects = ctx.database.subject_names(user_id).await?;

    let body = text::format_homework_list(start, &homework, &subjects);
    let active = homework.into_iter().filter(Homework::is_active).collect();
    Ok((body, active))
}

/// Render the week view at `week_offset` weeks from the current one
pub async fn show_week(ctx: &AppContext, target: &ReplyTarget, user_id: &str, week_offset: i64) -> Result<()> {
    let (body, active) = week_view(ctx, user_id, week_offset).await?;
    debug!(user_id = user_id, week_offset = week_offset, active = active.len(), "Showing week");

    let keyboard = keyboards::homework_management_keyboard(!active.is_empty(), week_offset);
    ctx.messenger.render(target, View::html(body).with_keyboard(keyboard)).await
}

async fn show_subject_choice(ctx: &AppContext, target: &ReplyTarget, user_id: &str, header: Option<&str>) -> Result<()> {
    let subjects = ctx.database.subjects.get_subjects(user_id).await?;
    let body = match header {
        Some(header) => format!("{}\n\n{}", header, text::CHOOSE_SUBJECT),
        None => text::CHOOSE_SUBJECT.to_string(),
    };
    ctx.messenger
        .render(target, View::plain(body).with_keyboard(keyboards::subjects_keyboard(&subjects)))
        .await
}

async fn show_week_choice(ctx: &AppContext, target: &ReplyTarget) -> Result<()> {
    let keyboard = keyboards::week_selection_keyboard(ctx.clock.today());
    ctx.messenger.render(target, View::plain(text::CHOOSE_WEEK).with_keyboard(keyboard)).await
}

/// Start homework creation from a message carrying text and/or a photo
pub async fn start_creation(
    ctx: &AppContext,
    event: &IncomingEvent,
    dialog: &mut ConversationContext,
    homework_text: Option<String>,
    photo_ref: Option<String>,
) -> Result<()> {
    let user_id = event.user_key();
    ctx.database.users.get_or_create_user(&user_id).await?;

    discard(dialog);
    ctx.scenario_manager.start_scenario(dialog, ids::HOMEWORK_CREATION)?;
    if let Some(content) = homework_text.filter(|t| !t.trim().is_empty()) {
        dialog.set_data(keys::TEXT, content)?;
    }
    if let Some(photo_ref) = photo_ref {
        dialog.set_data(keys::PHOTO, photo_ref)?;
    }

    log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, None, Some(steps::SELECTING_SUBJECT));
    show_subject_choice(ctx, &event.target, &user_id, None).await
}

/// Start a done/edit/delete action over the active homework of a week
///
/// With nothing active the action ends right away with a notice.
pub async fn start_action(
    ctx: &AppContext,
    event: &IncomingEvent,
    dialog: &mut ConversationContext,
    action: HomeworkAction,
    week_offset: i64,
) -> Result<()> {
    let user_id = event.user_key();
    let (body, active) = week_view(ctx, &user_id, week_offset).await?;
    if active.is_empty() {
        notify(ctx, &event.target, text::NO_ACTIVE_HOMEWORK, true).await;
        return Ok(());
    }

    discard(dialog);
    ctx.scenario_manager.start_scenario(dialog, ids::HOMEWORK_ACTION)?;
    dialog.set_data(keys::WEEK_OFFSET, week_offset)?;
    log_dialog_transition(&user_id, ids::HOMEWORK_ACTION, None, Some(steps::SELECTING_HOMEWORK));

    let prompt = format!("{}\n\n{}", body, text::action_prompt(action));
    let keyboard = keyboards::homework_selection_keyboard(&active, action, week_offset);
    ctx.messenger.render(&event.target, View::html(prompt).with_keyboard(keyboard)).await
}

/// Handle input for an active homework dialog; `false` when the input is not for it
pub async fn handle_step(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<bool> {
    let scenario = dialog.scenario.clone().unwrap_or_default();
    let step = dialog.step.clone().unwrap_or_default();

    match (scenario.as_str(), step.as_str()) {
        (ids::HOMEWORK_CREATION, _) => creation_step(ctx, event, dialog, &step).await,
        (ids::SUBJECT_INLINE, steps::CREATING_SUBJECT) => inline_subject_step(ctx, event, dialog).await,
        (ids::HOMEWORK_ACTION, steps::SELECTING_HOMEWORK) => selection_step(ctx, event, dialog).await,
        (ids::HOMEWORK_ACTION, steps::EDITING_TEXT) => edit_text_step(ctx, event, dialog).await,
        _ => Ok(false),
    }
}

async fn creation_step(
    ctx: &AppContext,
    event: &IncomingEvent,
    dialog: &mut ConversationContext,
    step: &str,
) -> Result<bool> {
    let Some(action) = event.action_ref() else {
        return Ok(false);
    };
    let user_id = event.user_key();
    let target = &event.target;

    match (step, action) {
        (_, CallbackAction::Cancel) => {
            dialog.cancel_scenario();
            log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, Some(step), None);
            ctx.messenger
                .render(target, View::plain(text::ACTION_CANCELLED).with_keyboard(keyboards::main_menu_keyboard()))
                .await?;
        }
        (steps::SELECTING_SUBJECT, CallbackAction::SelectSubject(subject_id)) => {
            if ctx.database.subjects.find(&user_id, subject_id).await?.is_none() {
                notify(ctx, target, text::SUBJECT_NOT_FOUND, false).await;
                show_subject_choice(ctx, target, &user_id, None).await?;
                return Ok(true);
            }
            dialog.set_data(keys::SUBJECT, subject_id)?;
            ctx.scenario_manager.next_step(dialog, steps::SELECTING_DATE)?;
            log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, Some(step), Some(steps::SELECTING_DATE));
            show_week_choice(ctx, target).await?;
        }
        (steps::SELECTING_SUBJECT, CallbackAction::NewSubject) => {
            ctx.scenario_manager.enter_child(dialog, ids::SUBJECT_INLINE)?;
            log_dialog_transition(&user_id, ids::SUBJECT_INLINE, None, Some(steps::CREATING_SUBJECT));
            ctx.messenger
                .render(target, View::plain(text::ENTER_SUBJECT_NAME).with_keyboard(keyboards::cancel_keyboard()))
                .await?;
        }
        (steps::SELECTING_DATE, CallbackAction::SelectWeek(date)) => {
            let monday = week_start(*date);
            dialog.set_data(keys::WEEK_START, monday)?;
            ctx.scenario_manager.next_step(dialog, steps::SELECTING_DAY)?;
            log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, Some(step), Some(steps::SELECTING_DAY));
            ctx.messenger
                .render(target, View::plain(text::CHOOSE_DAY).with_keyboard(keyboards::day_of_week_keyboard(monday)))
                .await?;
        }
        (steps::SELECTING_DAY, CallbackAction::BackToWeekSelection) => {
            ctx.scenario_manager.next_step(dialog, steps::SELECTING_DATE)?;
            log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, Some(step), Some(steps::SELECTING_DATE));
            show_week_choice(ctx, target).await?;
        }
        (steps::SELECTING_DAY, CallbackAction::SelectDate(date)) => {
            dialog.set_data(keys::DEADLINE, date)?;
            let settings = ctx.database.users.get_settings(&user_id).await?;
            if settings.ask_for_notification_time {
                ctx.scenario_manager.next_step(dialog, steps::SELECTING_TIME)?;
                log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, Some(step), Some(steps::SELECTING_TIME));
                let keyboard = keyboards::time_selection_keyboard(CallbackAction::SelectHomeworkTime, true);
                ctx.messenger
                    .render(target, View::plain(text::CHOOSE_HOMEWORK_TIME).with_keyboard(keyboard))
                    .await?;
            } else {
                commit(ctx, event, dialog, settings.default_notification_time).await?;
            }
        }
        (steps::SELECTING_TIME, CallbackAction::SelectHomeworkTime(raw)) => {
            let slot = if raw == SKIP {
                ctx.database.users.get_settings(&user_id).await?.default_notification_time
            } else {
                if let Err(e) = ctx.scenario_manager.validate_input(dialog, raw) {
                    debug!(user_id = %user_id, error = %e, "Rejected reminder time");
                    notify(ctx, target, &e.to_string(), false).await;
                    return Ok(true);
                }
                raw.parse::<NotificationTime>()?
            };
            commit(ctx, event, dialog, slot).await?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Persist the homework collected by the creation dialog and show its week
async fn commit(
    ctx: &AppContext,
    event: &IncomingEvent,
    dialog: &mut ConversationContext,
    notification_time: NotificationTime,
) -> Result<()> {
    let user_id = event.user_key();
    let deadline: NaiveDate = required(dialog, keys::DEADLINE)?;
    let request = CreateHomeworkRequest {
        subject_id: required(dialog, keys::SUBJECT)?,
        deadline_date: deadline,
        text: dialog.get_string(keys::TEXT),
        photo_ref: dialog.get_string(keys::PHOTO),
        notification_time: Some(notification_time),
    };

    let homework = match ctx.database.homework.add_homework(&user_id, request).await {
        Ok(homework) => homework,
        Err(HomeworkBuddyError::SubjectNotFound { subject_id }) => {
            // Deleted from another chat after it was chosen here
            debug!(user_id = %user_id, subject_id = %subject_id, "Chosen subject no longer exists");
            let from = dialog.step.clone();
            dialog.remove_data(keys::SUBJECT);
            ctx.scenario_manager.next_step(dialog, steps::SELECTING_SUBJECT)?;
            log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, from.as_deref(), Some(steps::SELECTING_SUBJECT));
            notify(ctx, &event.target, text::SUBJECT_NOT_FOUND, false).await;
            return show_subject_choice(ctx, &event.target, &user_id, None).await;
        }
        Err(e) => return Err(e),
    };
    let from = dialog.step.clone();
    dialog.complete_scenario();
    log_dialog_transition(&user_id, ids::HOMEWORK_CREATION, from.as_deref(), None);
    log_user_action(&user_id, "homework_added", Some(&homework.id));

    notify(ctx, &event.target, text::HOMEWORK_SAVED, true).await;
    let week_offset = week_offset_of(ctx.clock.today(), deadline);
    show_week(ctx, &event.target, &user_id, week_offset).await
}

async fn inline_subject_step(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<bool> {
    let user_id = event.user_key();
    let target = &event.target;

    if matches!(event.action_ref(), Some(CallbackAction::Cancel)) {
        let resumed = ctx.scenario_manager.finish_child(dialog)?;
        log_dialog_transition(&user_id, ids::SUBJECT_INLINE, Some(steps::CREATING_SUBJECT), resumed.as_deref());
        show_subject_choice(ctx, target, &user_id, None).await?;
        return Ok(true);
    }

    let Some(name) = event.text_ref() else {
        return Ok(false);
    };
    if ctx.scenario_manager.validate_input(dialog, name).is_err() {
        ctx.messenger
            .render(target, View::plain(text::EMPTY_SUBJECT_NAME).with_keyboard(keyboards::cancel_keyboard()))
            .await?;
        return Ok(true);
    }

    let subject = ctx.database.subjects.add_subject(&user_id, name).await?;
    log_user_action(&user_id, "subject_added", Some(&subject.name));
    let resumed = ctx.scenario_manager.finish_child(dialog)?;
    log_dialog_transition(&user_id, ids::SUBJECT_INLINE, Some(steps::CREATING_SUBJECT), resumed.as_deref());

    show_subject_choice(ctx, target, &user_id, Some(text::subject_added(&subject.name).as_str())).await?;
    Ok(true)
}

async fn selection_step(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<bool> {
    let Some(action) = event.action_ref() else {
        return Ok(false);
    };
    let user_id = event.user_key();
    let target = &event.target;

    match action {
        CallbackAction::Cancel => {
            dialog.cancel_scenario();
            log_dialog_transition(&user_id, ids::HOMEWORK_ACTION, Some(steps::SELECTING_HOMEWORK), None);
            ctx.messenger
                .render(target, View::plain(text::ACTION_CANCELLED).with_keyboard(keyboards::main_menu_keyboard()))
                .await?;
        }
        CallbackAction::NavigateWeek(week_offset) => {
            dialog.complete_scenario();
            log_dialog_transition(&user_id, ids::HOMEWORK_ACTION, Some(steps::SELECTING_HOMEWORK), None);
            show_week(ctx, target, &user_id, *week_offset).await?;
        }
        CallbackAction::ApplyAction { action, week_offset, homework_id } => {
            apply_action(ctx, event, dialog, *action, *week_offset, homework_id).await?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

async fn apply_action(
    ctx: &AppContext,
    event: &IncomingEvent,
    dialog: &mut ConversationContext,
    action: HomeworkAction,
    week_offset: i64,
    homework_id: &str,
) -> Result<()> {
    let user_id = event.user_key();
    let target = &event.target;

    // A keyboard older than the data shows up as a missing id here
    debug!(user_id = %user_id, action = action.as_str(), homework_id = homework_id, "Homework selected");

    match action {
        HomeworkAction::MarkDone => {
            let marked = ctx.database.homework.mark_done(&user_id, homework_id).await?;
            dialog.complete_scenario();
            if marked {
                log_user_action(&user_id, "homework_done", Some(homework_id));
                notify(ctx, target, text::MARKED_DONE, false).await;
            } else {
                notify(ctx, target, text::HOMEWORK_NOT_FOUND, false).await;
            }
            show_week(ctx, target, &user_id, week_offset).await
        }
        HomeworkAction::Delete => {
            let deleted = ctx.database.homework.delete(&user_id, homework_id).await?;
            dialog.complete_scenario();
            if deleted {
                log_user_action(&user_id, "homework_deleted", Some(homework_id));
                notify(ctx, target, text::DELETED, false).await;
            } else {
                notify(ctx, target, text::HOMEWORK_NOT_FOUND, false).await;
            }
            show_week(ctx, target, &user_id, week_offset).await
        }
        HomeworkAction::Edit => {
            if ctx.database.homework.find(&user_id, homework_id).await?.is_none() {
                dialog.complete_scenario();
                notify(ctx, target, text::HOMEWORK_NOT_FOUND, false).await;
                return show_week(ctx, target, &user_id, week_offset).await;
            }
            dialog.set_data(keys::HOMEWORK, homework_id)?;
            dialog.set_data(keys::WEEK_OFFSET, week_offset)?;
            ctx.scenario_manager.next_step(dialog, steps::EDITING_TEXT)?;
            log_dialog_transition(&user_id, ids::HOMEWORK_ACTION, Some(steps::SELECTING_HOMEWORK), Some(steps::EDITING_TEXT));
            ctx.messenger
                .render(target, View::plain(text::ENTER_NEW_TEXT).with_keyboard(keyboards::cancel_keyboard()))
                .await
        }
    }
}

async fn edit_text_step(ctx: &AppContext, event: &IncomingEvent, dialog: &mut ConversationContext) -> Result<bool> {
    let user_id = event.user_key();
    let target = &event.target;

    match event.action_ref() {
        Some(CallbackAction::Cancel) => {
            dialog.cancel_scenario();
            log_dialog_transition(&user_id, ids::HOMEWORK_ACTION, Some(steps::EDITING_TEXT), None);
            ctx.messenger
                .render(target, View::plain(text::ACTION_CANCELLED).with_keyboard(keyboards::main_menu_keyboard()))
                .await?;
            return Ok(true);
        }
        Some(CallbackAction::NavigateWeek(week_offset)) => {
            dialog.complete_scenario();
            show_week(ctx, target, &user_id, *week_offset).await?;
            return Ok(true);
        }
        _ => {}
    }

    let Some(new_text) = event.text_ref() else {
        return Ok(false);
    };
    if ctx.scenario_manager.validate_input(dialog, new_text).is_err() {
        ctx.messenger
            .render(target, View::plain(text::EMPTY_TEXT).with_keyboard(keyboards::cancel_keyboard()))
            .await?;
        return Ok(true);
    }

    let homework_id: String = required(dialog, keys::HOMEWORK)?;
    let week_offset = dialog.get_i64(keys::WEEK_OFFSET).unwrap_or(0);
    let updated = ctx.database.homework.update_text(&user_id, &homework_id, new_text.trim()).await?;
    dialog.complete_scenario();
    log_dialog_transition(&user_id, ids::HOMEWORK_ACTION, Some(steps::EDITING_TEXT), None);

    if updated {
        info!(user_id = %user_id, homework_id = %homework_id, "Homework text updated");
        ctx.messenger.render(target, View::plain(text::HOMEWORK_UPDATED)).await?;
    } else {
        ctx.messenger.render(target, View::plain(text::HOMEWORK_NOT_FOUND)).await?;
    }
    show_week(ctx, &target.detached(), &user_id, week_offset).await?;
    Ok(true)
}
