//! Homework creation dialog

use HomeworkBuddy::models::{HomeworkStatus, SettingKey};
use HomeworkBuddy::state::scenarios::{ids, steps};
use HomeworkBuddy::ui::{text, CallbackAction, TextMode};

use crate::helpers::*;

#[tokio::test]
async fn test_create_homework_with_inline_subject() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "Exercises 1-5").await.unwrap();
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::CHOOSE_SUBJECT);
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));

    // Nested subject creation
    ctx.press_button(TEST_USER, "➕ New subject").await.unwrap();
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::ENTER_SUBJECT_NAME);
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::SUBJECT_INLINE, steps::CREATING_SUBJECT));

    ctx.send_text(TEST_USER, "  Math  ").await.unwrap();
    let view = ctx.messenger.last_view().unwrap();
    assert!(view.text.starts_with("Subject 'Math' added!"));
    assert!(view.text.ends_with(text::CHOOSE_SUBJECT));

    // The parent resumes at subject selection with its data intact
    let dialog = ctx.dialog(TEST_USER).await;
    assert!(dialog.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
    assert_eq!(dialog.get_string("text").as_deref(), Some("Exercises 1-5"));

    ctx.press_button(TEST_USER, "Math").await.unwrap();
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::CHOOSE_WEEK);

    ctx.press_button(TEST_USER, "11.03 - 17.03").await.unwrap();
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::CHOOSE_DAY);

    ctx.press_button(TEST_USER, "Fri (15)").await.unwrap();

    assert!(ctx.messenger.notices().contains(&text::HOMEWORK_SAVED.to_string()));
    assert!(!ctx.dialog(TEST_USER).await.is_active());

    let homework = all_homework(&ctx, TEST_USER).await;
    assert_eq!(homework.len(), 1);
    assert_eq!(homework[0].text.as_deref(), Some("Exercises 1-5"));
    assert_eq!(homework[0].deadline_date, date(2024, 3, 15));
    assert_eq!(homework[0].status, HomeworkStatus::Pending);
    assert_eq!(homework[0].notification_time, Some(slot("09:00")));

    let week = ctx.messenger.last_view().unwrap();
    assert_eq!(week.mode, TextMode::Html);
    assert!(week.text.contains("Math: Exercises 1-5"));
}

#[tokio::test]
async fn test_commit_shows_week_of_deadline() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "History").await;

    ctx.send_text(TEST_USER, "Essay").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id)).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 25))).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectDate(date(2024, 3, 27))).await.unwrap();

    let week = ctx.messenger.last_view().unwrap();
    assert!(week.text.starts_with("🗓 <b>25.03 - 31.03</b>"));
    let keyboard = week.keyboard.unwrap();
    assert_eq!(keyboard.find("🔄").unwrap().data, "navigate_week:2");
}

#[tokio::test]
async fn test_ask_for_reminder_time() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Physics").await;
    ctx.press(TEST_USER, CallbackAction::ToggleSetting(SettingKey::AskForNotificationTime))
        .await
        .unwrap();

    ctx.send_text(TEST_USER, "Lab report").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id.clone())).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectDate(date(2024, 3, 14))).await.unwrap();

    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_TIME));
    let view = ctx.messenger.last_view().unwrap();
    assert_eq!(view.text, text::CHOOSE_HOMEWORK_TIME);
    assert_eq!(view.keyboard.as_ref().unwrap().buttons().count(), 48 + 2);

    ctx.press_button(TEST_USER, "07:30").await.unwrap();

    let homework = all_homework(&ctx, TEST_USER).await;
    assert_eq!(homework[0].notification_time, Some(slot("07:30")));
}

#[tokio::test]
async fn test_skip_uses_default_time() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Physics").await;
    ctx.press(TEST_USER, CallbackAction::ToggleSetting(SettingKey::AskForNotificationTime))
        .await
        .unwrap();

    ctx.send_text(TEST_USER, "Lab report").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id.clone())).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectDate(date(2024, 3, 14))).await.unwrap();
    ctx.press_button(TEST_USER, "Skip").await.unwrap();

    let homework = all_homework(&ctx, TEST_USER).await;
    assert_eq!(homework[0].notification_time, Some(slot("09:00")));
}

#[tokio::test]
async fn test_cancel_leaves_store_untouched() {
    let ctx = TestContext::new().await;
    ctx.start(TEST_USER).await.unwrap();
    let subject = seed_subject(&ctx, TEST_USER, "Biology").await;
    let before = ctx.db_bytes();

    ctx.send_text(TEST_USER, "Chapter 4").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id)).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
    ctx.press_button(TEST_USER, "❌ Cancel").await.unwrap();

    assert_eq!(ctx.messenger.last_view().unwrap().text, text::ACTION_CANCELLED);
    assert!(!ctx.dialog(TEST_USER).await.is_active());
    assert_eq!(ctx.db_bytes(), before);
}

#[tokio::test]
async fn test_cancel_inline_subject_returns_to_subjects() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "Poem").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::NewSubject).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::Cancel).await.unwrap();

    let dialog = ctx.dialog(TEST_USER).await;
    assert!(dialog.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
    assert_eq!(dialog.get_string("text").as_deref(), Some("Poem"));
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::CHOOSE_SUBJECT);
}

#[tokio::test]
async fn test_blank_subject_name_is_rejected() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "Poem").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::NewSubject).await.unwrap();
    ctx.send_text(TEST_USER, "   ").await.unwrap();

    assert_eq!(ctx.messenger.last_view().unwrap().text, text::EMPTY_SUBJECT_NAME);
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::SUBJECT_INLINE, steps::CREATING_SUBJECT));
    assert!(ctx
        .app
        .database
        .subjects
        .get_subjects(&TestContext::user_key(TEST_USER))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_back_to_week_selection() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Art").await;

    ctx.send_text(TEST_USER, "Sketch").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id)).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
    ctx.press_button(TEST_USER, "⬅️ Back").await.unwrap();

    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_DATE));
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::CHOOSE_WEEK);
}

#[tokio::test]
async fn test_photo_homework_keeps_caption_and_file() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Geometry").await;

    ctx.send_photo(TEST_USER, "AgACAgIAAxkBAAIB", Some("Page 12")).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id)).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectDate(date(2024, 3, 12))).await.unwrap();

    let homework = all_homework(&ctx, TEST_USER).await;
    assert_eq!(homework[0].photo_ref.as_deref(), Some("AgACAgIAAxkBAAIB"));
    assert_eq!(homework[0].text.as_deref(), Some("Page 12"));
}

#[tokio::test]
async fn test_text_during_button_step_is_not_taken() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "First").await.unwrap();
    ctx.send_text(TEST_USER, "Second").await.unwrap();

    assert!(ctx.messenger.notices().contains(&text::FINISH_OR_CANCEL.to_string()));
    let dialog = ctx.dialog(TEST_USER).await;
    assert!(dialog.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
    assert_eq!(dialog.get_string("text").as_deref(), Some("First"));
}

#[tokio::test]
async fn test_deleted_subject_cannot_be_selected() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Music").await;

    ctx.send_text(TEST_USER, "Scales").await.unwrap();
    ctx.app
        .database
        .subjects
        .delete_subject(&TestContext::user_key(TEST_USER), &subject.id)
        .await
        .unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id)).await.unwrap();

    assert!(ctx.messenger.notices().contains(&text::SUBJECT_NOT_FOUND.to_string()));
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
}

#[tokio::test]
async fn test_subject_deleted_before_commit_returns_to_subjects() {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Chemistry").await;

    ctx.send_text(TEST_USER, "Titration").await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id.clone())).await.unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
    ctx.app
        .database
        .subjects
        .delete_subject(&TestContext::user_key(TEST_USER), &subject.id)
        .await
        .unwrap();
    ctx.press(TEST_USER, CallbackAction::SelectDate(date(2024, 3, 14))).await.unwrap();

    assert!(ctx.messenger.notices().contains(&text::SUBJECT_NOT_FOUND.to_string()));
    assert!(!ctx.messenger.notices().contains(&text::HOMEWORK_SAVED.to_string()));
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::CHOOSE_SUBJECT);
    assert!(all_homework(&ctx, TEST_USER).await.is_empty());

    let dialog = ctx.dialog(TEST_USER).await;
    assert!(dialog.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));
    assert_eq!(dialog.get_string("text").as_deref(), Some("Titration"));
    assert!(dialog.get_string("subject").is_none());
}
