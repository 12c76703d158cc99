//! Done, edit and delete over the week view

use HomeworkBuddy::models::HomeworkStatus;
use HomeworkBuddy::state::scenarios::{ids, steps};
use HomeworkBuddy::ui::{text, CallbackAction, HomeworkAction};

use crate::helpers::*;

async fn seeded() -> (TestContext, String, String) {
    let ctx = TestContext::new().await;
    let subject = seed_subject(&ctx, TEST_USER, "Math").await;
    let later = seed_homework(&ctx, TEST_USER, &subject, date(2024, 3, 15), "Problems 7-9", None).await;
    let sooner = seed_homework(&ctx, TEST_USER, &subject, date(2024, 3, 12), "Problems 1-3", None).await;
    (ctx, sooner.id, later.id)
}

#[tokio::test]
async fn test_mark_done_by_number() {
    let (ctx, sooner, later) = seeded().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::MarkDone, week_offset: 0 })
        .await
        .unwrap();
    let view = ctx.messenger.last_view().unwrap();
    assert!(view.text.ends_with(text::action_prompt(HomeworkAction::MarkDone)));
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_ACTION, steps::SELECTING_HOMEWORK));

    // Numbers follow deadline order
    ctx.press_button(TEST_USER, "1").await.unwrap();

    let homework = ctx.app.database.homework.find("1001", &sooner).await.unwrap().unwrap();
    assert_eq!(homework.status, HomeworkStatus::Done);
    let untouched = ctx.app.database.homework.find("1001", &later).await.unwrap().unwrap();
    assert_eq!(untouched.status, HomeworkStatus::Pending);

    assert!(ctx.messenger.notices().contains(&text::MARKED_DONE.to_string()));
    assert!(!ctx.dialog(TEST_USER).await.is_active());
    let week = ctx.messenger.last_view().unwrap();
    assert!(week.text.contains("<s>Math: Problems 1-3</s>"));
    assert!(week.text.contains("<b>1.</b> 📌 Math: Problems 7-9"));
}

#[tokio::test]
async fn test_action_without_active_homework() {
    let ctx = TestContext::new().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::Delete, week_offset: 0 })
        .await
        .unwrap();

    assert_eq!(ctx.messenger.notices(), vec![text::NO_ACTIVE_HOMEWORK.to_string()]);
    assert!(!ctx.dialog(TEST_USER).await.is_active());
}

#[tokio::test]
async fn test_delete_by_number() {
    let (ctx, sooner, later) = seeded().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::Delete, week_offset: 0 })
        .await
        .unwrap();
    ctx.press_button(TEST_USER, "2").await.unwrap();

    let remaining = all_homework(&ctx, TEST_USER).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, sooner);
    assert!(ctx.app.database.homework.find("1001", &later).await.unwrap().is_none());
    assert!(ctx.messenger.notices().contains(&text::DELETED.to_string()));
}

#[tokio::test]
async fn test_edit_text() {
    let (ctx, sooner, _) = seeded().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::Edit, week_offset: 0 })
        .await
        .unwrap();
    ctx.press_button(TEST_USER, "1").await.unwrap();
    assert_eq!(ctx.messenger.last_view().unwrap().text, text::ENTER_NEW_TEXT);
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_ACTION, steps::EDITING_TEXT));

    ctx.send_text(TEST_USER, "Problems 1-4").await.unwrap();

    let homework = ctx.app.database.homework.find("1001", &sooner).await.unwrap().unwrap();
    assert_eq!(homework.text.as_deref(), Some("Problems 1-4"));
    assert!(!ctx.dialog(TEST_USER).await.is_active());

    // The week view comes as a new message after the confirmation
    let (target, week) = ctx.messenger.last_render().unwrap();
    assert_eq!(target.message_id, None);
    assert!(week.text.contains("Math: Problems 1-4"));
    assert!(ctx
        .messenger
        .all()
        .iter()
        .any(|out| matches!(out, Outbound::Render { view, .. } if view.text == text::HOMEWORK_UPDATED)));
}

#[tokio::test]
async fn test_edit_rejects_blank_text() {
    let (ctx, sooner, _) = seeded().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::Edit, week_offset: 0 })
        .await
        .unwrap();
    ctx.press_button(TEST_USER, "1").await.unwrap();
    ctx.send_text(TEST_USER, "  ").await.unwrap();

    assert_eq!(ctx.messenger.last_view().unwrap().text, text::EMPTY_TEXT);
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_ACTION, steps::EDITING_TEXT));
    let homework = ctx.app.database.homework.find("1001", &sooner).await.unwrap().unwrap();
    assert_eq!(homework.text.as_deref(), Some("Problems 1-3"));
}

#[tokio::test]
async fn test_stale_selection_is_reported() {
    for action in [HomeworkAction::MarkDone, HomeworkAction::Delete, HomeworkAction::Edit] {
        let (ctx, sooner, later) = seeded().await;

        ctx.press(TEST_USER, CallbackAction::StartAction { action, week_offset: 0 })
            .await
            .unwrap();
        // Removed from another chat while the selection keyboard was open
        assert!(ctx.app.database.homework.delete("1001", &sooner).await.unwrap());
        ctx.press(
            TEST_USER,
            CallbackAction::ApplyAction { action, week_offset: 0, homework_id: sooner.clone() },
        )
        .await
        .unwrap();

        let notices = ctx.messenger.notices();
        assert!(notices.contains(&text::HOMEWORK_NOT_FOUND.to_string()), "{:?}: {:?}", action, notices);
        assert!(!notices.contains(&text::MARKED_DONE.to_string()));
        assert!(!notices.contains(&text::DELETED.to_string()));
        assert!(!ctx.dialog(TEST_USER).await.is_active());
        assert!(ctx.messenger.last_view().unwrap().text.starts_with("🗓 <b>11.03 - 17.03</b>"));

        let untouched = ctx.app.database.homework.find("1001", &later).await.unwrap().unwrap();
        assert_eq!(untouched.status, HomeworkStatus::Pending);
    }
}

#[tokio::test]
async fn test_back_from_selection_shows_week() {
    let (ctx, _, _) = seeded().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::Delete, week_offset: 0 })
        .await
        .unwrap();
    ctx.press_button(TEST_USER, "◀️ Back").await.unwrap();

    assert!(!ctx.dialog(TEST_USER).await.is_active());
    assert_eq!(all_homework(&ctx, TEST_USER).await.len(), 2);
    assert!(ctx.messenger.last_view().unwrap().text.starts_with("🗓 <b>11.03 - 17.03</b>"));
}

#[tokio::test]
async fn test_other_weeks_are_not_selectable() {
    let (ctx, _, _) = seeded().await;

    ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::MarkDone, week_offset: 1 })
        .await
        .unwrap();

    assert_eq!(ctx.messenger.notices(), vec![text::NO_ACTIVE_HOMEWORK.to_string()]);
}
