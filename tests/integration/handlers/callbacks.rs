//! Plain button handling outside dialogs

use HomeworkBuddy::handlers::{dispatch, IncomingEvent};
use HomeworkBuddy::services::ReplyTarget;
use HomeworkBuddy::state::scenarios::{ids, steps};
use HomeworkBuddy::ui::{text, CallbackAction};

use crate::helpers::*;

#[tokio::test]
async fn test_navigate_weeks() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Math").await;
    seed_homework(&ctx, TEST_USER, &subject, date(2024, 3, 20), "Next week", None).await;

    ctx.press(TEST_USER, CallbackAction::NavigateWeek(0)).await.unwrap();
    assert!(ctx.messenger.last_view().unwrap().text.ends_with(text::NO_HOMEWORK_MESSAGE));

    ctx.press_button(TEST_USER, "▶️").await.unwrap();
    let week = ctx.messenger.last_view().unwrap();
    assert!(week.text.starts_with("🗓 <b>18.03 - 24.03</b>"));
    assert!(week.text.contains("Math: Next week"));
    assert!(week.keyboard.unwrap().find("✅ Done").is_some());
}

#[tokio::test]
async fn test_button_press_edits_in_place() {
    let ctx = TestContext::new().await;

    ctx.press(TEST_USER, CallbackAction::ShowSettings).await.unwrap();

    let (target, view) = ctx.messenger.last_render().unwrap();
    assert_eq!(target.message_id, Some(BUTTON_MESSAGE_ID));
    assert_eq!(view.text, text::SETTINGS_TITLE);
}

#[tokio::test]
async fn test_back_to_main_menu() {
    let ctx = TestContext::new().await;

    ctx.press(TEST_USER, CallbackAction::ShowSettings).await.unwrap();
    ctx.press_button(TEST_USER, "◀️ Back").await.unwrap();

    assert!(ctx.messenger.last_view().unwrap().text.starts_with("🗓 <b>11.03 - 17.03</b>"));
}

#[tokio::test]
async fn test_add_homework_button_starts_creation() {
    let ctx = TestContext::new().await;
    seed_subject(&ctx, TEST_USER, "Math").await;

    ctx.press(TEST_USER, CallbackAction::AddHomework).await.unwrap();

    let dialog = ctx.dialog(TEST_USER).await;
    assert!(dialog.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
    assert!(dialog.get_string("text").is_none());
    let view = ctx.messenger.last_view().unwrap();
    assert_eq!(view.text, text::CHOOSE_SUBJECT);
    assert!(view.keyboard.unwrap().find("Math").is_some());
}

#[tokio::test]
async fn test_add_homework_button_replaces_running_dialog() {
    let ctx = TestContext::new().await;
    ctx.press(TEST_USER, CallbackAction::AddSubject).await.unwrap();

    ctx.press(TEST_USER, CallbackAction::AddHomework).await.unwrap();

    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
}

#[tokio::test]
async fn test_week_offset_off_the_calendar_is_rejected() {
    let ctx = TestContext::new().await;

    let result = ctx.press(TEST_USER, CallbackAction::NavigateWeek(i64::MAX)).await;

    assert!(result.is_err());
    assert!(ctx.messenger.notices().contains(&text::SOMETHING_WENT_WRONG.to_string()));
    assert!(ctx.app.database.homework.get_homework_for_week("1001", i64::MAX / 2).await.is_err());

    ctx.press(TEST_USER, CallbackAction::NavigateWeek(0)).await.unwrap();
    assert!(ctx.messenger.last_view().unwrap().text.starts_with("🗓 <b>11.03 - 17.03</b>"));
}

#[tokio::test]
async fn test_users_do_not_share_dialogs() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "Mine").await.unwrap();
    ctx.send_text(OTHER_USER, "Theirs").await.unwrap();

    assert_eq!(ctx.dialog(TEST_USER).await.get_string("text").as_deref(), Some("Mine"));
    assert_eq!(ctx.dialog(OTHER_USER).await.get_string("text").as_deref(), Some("Theirs"));
}

#[tokio::test]
async fn test_dialog_is_scoped_to_chat() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "Private").await.unwrap();
    let group_chat = -100500;
    let event = IncomingEvent::action(
        TEST_USER,
        ReplyTarget::callback(group_chat, Some(1), "cb-group"),
        CallbackAction::NewSubject,
    );
    dispatch(&ctx.app, event).await.unwrap();

    assert!(ctx.messenger.notices().contains(&text::STALE_BUTTON.to_string()));
    assert!(ctx.dialog(TEST_USER).await.is_active());
}
