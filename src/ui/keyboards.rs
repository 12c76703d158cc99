//! Inline keyboard layouts

use chrono::{Days, NaiveDate};
use crate::models::{Homework, NotificationTime, SettingKey, Subject, UserSettings};
use crate::utils::helpers::{format_day_button, format_week_range, week_bounds};
use super::actions::{CallbackAction, HomeworkAction, SKIP};

/// One inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            data: action.to_string(),
        }
    }
}

/// Rows of inline buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Every button in reading order
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    /// Find a button by its label
    pub fn find(&self, label: &str) -> Option<&Button> {
        self.buttons().find(|b| b.label == label)
    }
}

fn cancel_button() -> Button {
    Button::new("❌ Cancel", CallbackAction::Cancel)
}

fn chunk(buttons: Vec<Button>, per_row: usize) -> Vec<Vec<Button>> {
    buttons
        .chunks(per_row)
        .map(|row| row.to_vec())
        .collect()
}

/// Week view: action row when something is active, navigation, settings
pub fn homework_management_keyboard(has_active: bool, week_offset: i64) -> Keyboard {
    let mut rows = Vec::new();
    if has_active {
        rows.push(vec![
            Button::new("✅ Done", CallbackAction::StartAction { action: HomeworkAction::MarkDone, week_offset }),
            Button::new("✏️ Edit", CallbackAction::StartAction { action: HomeworkAction::Edit, week_offset }),
            Button::new("🗑️ Delete", CallbackAction::StartAction { action: HomeworkAction::Delete, week_offset }),
        ]);
    }
    rows.push(vec![
        Button::new("◀️", CallbackAction::NavigateWeek(week_offset - 1)),
        Button::new("🔄", CallbackAction::NavigateWeek(week_offset)),
        Button::new("▶️", CallbackAction::NavigateWeek(week_offset + 1)),
    ]);
    rows.push(vec![
        Button::new("➕ Add homework", CallbackAction::AddHomework),
        Button::new("⚙️ Settings", CallbackAction::ShowSettings),
    ]);
    Keyboard::new(rows)
}

/// Subject choice for a new homework item
pub fn subjects_keyboard(subjects: &[Subject]) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = subjects
        .iter()
        .map(|s| vec![Button::new(s.name.clone(), CallbackAction::SelectSubject(s.id.clone()))])
        .collect();
    rows.push(vec![Button::new("➕ New subject", CallbackAction::NewSubject)]);
    rows.push(vec![cancel_button()]);
    Keyboard::new(rows)
}

/// Weeks from three before to three after the current one
pub fn week_selection_keyboard(today: NaiveDate) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = (-3..=3)
        .filter_map(|offset| week_bounds(today, offset).ok())
        .map(|(start, _)| vec![Button::new(format_week_range(start), CallbackAction::SelectWeek(start))])
        .collect();
    rows.push(vec![cancel_button()]);
    Keyboard::new(rows)
}

/// The seven days of the week starting at `week_start`
pub fn day_of_week_keyboard(week_start: NaiveDate) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = (0..7)
        .filter_map(|i| week_start.checked_add_days(Days::new(i)))
        .map(|day| vec![Button::new(format_day_button(day), CallbackAction::SelectDate(day))])
        .collect();
    rows.push(vec![
        Button::new("⬅️ Back", CallbackAction::BackToWeekSelection),
        cancel_button(),
    ]);
    Keyboard::new(rows)
}

/// Numbered buttons over the active homework, five per row
pub fn homework_selection_keyboard(active: &[Homework], action: HomeworkAction, week_offset: i64) -> Keyboard {
    let buttons = active
        .iter()
        .enumerate()
        .map(|(i, hw)| {
            Button::new(
                (i + 1).to_string(),
                CallbackAction::ApplyAction { action, week_offset, homework_id: hw.id.clone() },
            )
        })
        .collect();

    let mut rows = chunk(buttons, 5);
    rows.push(vec![Button::new("◀️ Back", CallbackAction::NavigateWeek(week_offset))]);
    Keyboard::new(rows)
}

/// All 48 half-hour slots, four per row
pub fn time_selection_keyboard(make: fn(String) -> CallbackAction, show_skip: bool) -> Keyboard {
    let buttons = NotificationTime::all_slots()
        .map(|slot| Button::new(slot.to_string(), make(slot.to_string())))
        .collect();

    let mut rows = chunk(buttons, 4);
    if show_skip {
        rows.push(vec![Button::new("Skip", make(SKIP.to_string()))]);
    }
    rows.push(vec![cancel_button()]);
    Keyboard::new(rows)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "On" } else { "Off" }
}

pub fn settings_keyboard(settings: &UserSettings) -> Keyboard {
    Keyboard::new(vec![
        vec![Button::new(
            format!("Homework reminders: {}", on_off(settings.reminders_enabled)),
            CallbackAction::ToggleSetting(SettingKey::RemindersEnabled),
        )],
        vec![Button::new(
            format!("Reminder time: {}", settings.default_notification_time),
            CallbackAction::EditReminderTime,
        )],
        vec![Button::new(
            format!("Ask time for each homework: {}", on_off(settings.ask_for_notification_time)),
            CallbackAction::ToggleSetting(SettingKey::AskForNotificationTime),
        )],
        vec![Button::new("My subjects", CallbackAction::ManageSubjects)],
        vec![Button::new("◀️ Back", CallbackAction::BackToMainMenu)],
    ])
}

pub fn subjects_management_keyboard(subjects: &[Subject]) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = subjects
        .iter()
        .map(|s| {
            vec![
                Button::new(s.name.clone(), CallbackAction::SubjectInfo(s.id.clone())),
                Button::new("🗑️", CallbackAction::DeleteSubject(s.id.clone())),
            ]
        })
        .collect();
    rows.push(vec![Button::new("➕ Add", CallbackAction::AddSubject)]);
    rows.push(vec![Button::new("◀️ Back", CallbackAction::ShowSettings)]);
    Keyboard::new(rows)
}

pub fn cancel_keyboard() -> Keyboard {
    Keyboard::new(vec![vec![cancel_button()]])
}

/// Single button leading back to the week view
pub fn main_menu_keyboard() -> Keyboard {
    Keyboard::new(vec![vec![Button::new("🏠 Main menu", CallbackAction::BackToMainMenu)]])
}
