//! Cancelling every dialog state leaves the document untouched

use HomeworkBuddy::models::{SettingKey, Subject};
use HomeworkBuddy::state::scenarios::{ids, steps};
use HomeworkBuddy::ui::{CallbackAction, HomeworkAction};

use crate::helpers::*;

#[derive(Debug, Clone, Copy)]
enum State {
    CreationSubject,
    CreationWeek,
    CreationDay,
    CreationTime,
    InlineSubject,
    ActionSelection,
    EditText,
    SubjectCreate,
    ReminderTime,
}

impl State {
    fn at(self) -> (&'static str, &'static str) {
        match self {
            State::CreationSubject => (ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT),
            State::CreationWeek => (ids::HOMEWORK_CREATION, steps::SELECTING_DATE),
            State::CreationDay => (ids::HOMEWORK_CREATION, steps::SELECTING_DAY),
            State::CreationTime => (ids::HOMEWORK_CREATION, steps::SELECTING_TIME),
            State::InlineSubject => (ids::SUBJECT_INLINE, steps::CREATING_SUBJECT),
            State::ActionSelection => (ids::HOMEWORK_ACTION, steps::SELECTING_HOMEWORK),
            State::EditText => (ids::HOMEWORK_ACTION, steps::EDITING_TEXT),
            State::SubjectCreate => (ids::SUBJECT_CREATE, steps::CREATING_SUBJECT),
            State::ReminderTime => (ids::REMINDER_TIME, steps::EDITING_REMINDER_TIME),
        }
    }
}

/// Seed data every state needs, so that reaching a state never writes
async fn setup(ctx: &TestContext) -> Subject {
    ctx.start(TEST_USER).await.unwrap();
    let subject = seed_subject(ctx, TEST_USER, "Biology").await;
    seed_homework(ctx, TEST_USER, &subject, date(2024, 3, 14), "Chapter 3", None).await;
    ctx.press(TEST_USER, CallbackAction::ToggleSetting(SettingKey::AskForNotificationTime))
        .await
        .unwrap();
    subject
}

async fn reach(ctx: &TestContext, subject: &Subject, state: State) {
    match state {
        State::CreationSubject
        | State::CreationWeek
        | State::CreationDay
        | State::CreationTime
        | State::InlineSubject => {
            ctx.send_text(TEST_USER, "Chapter 4").await.unwrap();
            if matches!(state, State::InlineSubject) {
                ctx.press(TEST_USER, CallbackAction::NewSubject).await.unwrap();
                return;
            }
            if matches!(state, State::CreationSubject) {
                return;
            }
            ctx.press(TEST_USER, CallbackAction::SelectSubject(subject.id.clone())).await.unwrap();
            if matches!(state, State::CreationWeek) {
                return;
            }
            ctx.press(TEST_USER, CallbackAction::SelectWeek(date(2024, 3, 11))).await.unwrap();
            if matches!(state, State::CreationDay) {
                return;
            }
            ctx.press(TEST_USER, CallbackAction::SelectDate(date(2024, 3, 15))).await.unwrap();
        }
        State::ActionSelection | State::EditText => {
            ctx.press(TEST_USER, CallbackAction::StartAction { action: HomeworkAction::Edit, week_offset: 0 })
                .await
                .unwrap();
            if matches!(state, State::EditText) {
                ctx.press_button(TEST_USER, "1").await.unwrap();
            }
        }
        State::SubjectCreate => ctx.press(TEST_USER, CallbackAction::AddSubject).await.unwrap(),
        State::ReminderTime => ctx.press(TEST_USER, CallbackAction::EditReminderTime).await.unwrap(),
    }
}

#[tokio::test]
async fn test_cancel_at_every_state_leaves_store_untouched() {
    let states = [
        State::CreationSubject,
        State::CreationWeek,
        State::CreationDay,
        State::CreationTime,
        State::InlineSubject,
        State::ActionSelection,
        State::EditText,
        State::SubjectCreate,
        State::ReminderTime,
    ];

    for state in states {
        let ctx = TestContext::new().await;
        let subject = setup(&ctx).await;
        let before = ctx.db_bytes();

        reach(&ctx, &subject, state).await;
        let (scenario, step) = state.at();
        assert!(ctx.dialog(TEST_USER).await.is_at(scenario, step), "{:?} was not reached", state);

        ctx.press(TEST_USER, CallbackAction::Cancel).await.unwrap();

        let dialog = ctx.dialog(TEST_USER).await;
        match state {
            State::InlineSubject => {
                assert!(dialog.is_at(ids::HOMEWORK_CREATION, steps::SELECTING_SUBJECT), "{:?}", state)
            }
            _ => assert!(!dialog.is_active(), "{:?} left a dialog behind", state),
        }
        assert_eq!(ctx.db_bytes(), before, "{:?} changed the store", state);
    }
}
