//! Command handler tests

use HomeworkBuddy::config::Settings;
use HomeworkBuddy::handlers::commands::{help, stats};
use HomeworkBuddy::state::scenarios::{ids, steps};
use HomeworkBuddy::ui::{text, CallbackAction};

use crate::helpers::*;

#[tokio::test]
async fn test_start_registers_user_and_shows_week() {
    let ctx = TestContext::new().await;

    ctx.start(TEST_USER).await.unwrap();

    assert_eq!(ctx.messenger.sent_to(TEST_USER), vec![text::WELCOME_MESSAGE.to_string()]);
    let user = ctx.app.database.users.find("1001").await.unwrap().unwrap();
    assert!(user.settings.reminders_enabled);

    let week = ctx.messenger.last_view().unwrap();
    assert!(week.text.starts_with("🗓 <b>11.03 - 17.03</b>"));
    assert!(week.text.ends_with(text::NO_HOMEWORK_MESSAGE));
    let keyboard = week.keyboard.unwrap();
    assert!(keyboard.find("✅ Done").is_none());
    assert!(keyboard.find("➕ Add homework").is_some());
}

#[tokio::test]
async fn test_start_again_skips_welcome() {
    let ctx = TestContext::new().await;

    ctx.start(TEST_USER).await.unwrap();
    ctx.start(TEST_USER).await.unwrap();

    assert_eq!(ctx.messenger.sent_to(TEST_USER).len(), 1);
}

#[tokio::test]
async fn test_start_clears_active_dialog() {
    let ctx = TestContext::new().await;

    ctx.send_text(TEST_USER, "Essay").await.unwrap();
    assert!(ctx.dialog(TEST_USER).await.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT));

    ctx.start(TEST_USER).await.unwrap();
    assert!(!ctx.dialog(TEST_USER).await.is_active());

    // Stale buttons from the abandoned dialog do nothing
    ctx.press(TEST_USER, CallbackAction::NewSubject).await.unwrap();
    assert!(!ctx.dialog(TEST_USER).await.is_active());
    assert!(ctx.messenger.notices().contains(&text::STALE_BUTTON.to_string()));
}

#[tokio::test]
async fn test_help() {
    let ctx = TestContext::new().await;

    help::handle_help(&ctx.app, TEST_USER).await.unwrap();

    let sent = ctx.messenger.sent_to(TEST_USER);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("/start"));
}

#[tokio::test]
async fn test_admin_stats() {
    let mut settings = Settings::default();
    settings.bot.admin_ids = vec![TEST_USER];
    let ctx = TestContext::with_settings(settings).await;

    let subject = seed_subject(&ctx, OTHER_USER, "Math").await;
    seed_homework(&ctx, OTHER_USER, &subject, date(2024, 3, 14), "Algebra", None).await;
    seed_homework(&ctx, OTHER_USER, &subject, date(2024, 3, 15), "Geometry", None).await;

    assert!(stats::is_admin_command(&ctx.app, "/stats"));
    assert!(stats::is_admin_command(&ctx.app, "/stats@homework_bot"));
    assert!(!stats::is_admin_command(&ctx.app, "/start"));

    stats::handle_stats(&ctx.app, TEST_USER, TEST_USER).await.unwrap();
    let sent = ctx.messenger.sent_to(TEST_USER);
    assert_eq!(sent, vec![text::admin_stats(1, 2, "13.03.2024 12:00")]);
}

#[tokio::test]
async fn test_admin_stats_denied() {
    let mut settings = Settings::default();
    settings.bot.admin_ids = vec![TEST_USER];
    let ctx = TestContext::with_settings(settings).await;

    stats::handle_stats(&ctx.app, OTHER_USER, OTHER_USER).await.unwrap();

    assert_eq!(ctx.messenger.sent_to(OTHER_USER), vec![text::ACCESS_DENIED.to_string()]);
}
