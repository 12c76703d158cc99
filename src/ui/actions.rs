//! Callback tokens carried by inline buttons
//!
//! Tokens are colon separated. The first field names the action; fields
//! after it may themselves contain colons (time slots), so parsing splits
//! only as far as each action needs.

use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use crate::models::SettingKey;
use crate::utils::errors::HomeworkBuddyError;

/// Operation applied to a selected homework item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkAction {
    MarkDone,
    Edit,
    Delete,
}

impl HomeworkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkAction::MarkDone => "mark_done",
            HomeworkAction::Edit => "edit_hw",
            HomeworkAction::Delete => "delete_hw",
        }
    }
}

impl FromStr for HomeworkAction {
    type Err = HomeworkBuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mark_done" => Ok(HomeworkAction::MarkDone),
            "edit_hw" => Ok(HomeworkAction::Edit),
            "delete_hw" => Ok(HomeworkAction::Delete),
            other => Err(HomeworkBuddyError::InvalidInput(format!("Unknown homework action: {}", other))),
        }
    }
}

/// Parsed inline button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Cancel,
    AddHomework,
    SelectSubject(String),
    NewSubject,
    SelectWeek(NaiveDate),
    SelectDate(NaiveDate),
    BackToWeekSelection,
    /// Raw slot value or `skip`
    SelectHomeworkTime(String),
    StartAction { action: HomeworkAction, week_offset: i64 },
    ApplyAction { action: HomeworkAction, week_offset: i64, homework_id: String },
    NavigateWeek(i64),
    ShowSettings,
    BackToMainMenu,
    ToggleSetting(SettingKey),
    EditReminderTime,
    /// Raw slot value
    SetDefaultTime(String),
    ManageSubjects,
    AddSubject,
    DeleteSubject(String),
    SubjectInfo(String),
}

pub const SKIP: &str = "skip";

impl CallbackAction {
    /// Parse a callback token, returning `None` for anything unrecognised
    pub fn parse(data: &str) -> Option<Self> {
        let (name, rest) = match data.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (data, None),
        };

        let action = match (name, rest) {
            ("cancel", None) => CallbackAction::Cancel,
            ("add_homework", None) => CallbackAction::AddHomework,
            ("new_subject", None) => CallbackAction::NewSubject,
            ("back_to_week_selection", None) => CallbackAction::BackToWeekSelection,
            ("show_settings", None) => CallbackAction::ShowSettings,
            ("back_to_main_menu", None) => CallbackAction::BackToMainMenu,
            ("edit_reminder_time", None) => CallbackAction::EditReminderTime,
            ("manage_subjects", None) => CallbackAction::ManageSubjects,
            ("add_subject", None) => CallbackAction::AddSubject,
            ("select_subject", Some(id)) if !id.is_empty() => CallbackAction::SelectSubject(id.to_string()),
            ("select_week", Some(date)) => CallbackAction::SelectWeek(parse_date(date)?),
            ("select_date", Some(date)) => CallbackAction::SelectDate(parse_date(date)?),
            ("select_hw_time", Some(slot)) => CallbackAction::SelectHomeworkTime(slot.to_string()),
            ("set_default_time", Some(slot)) => CallbackAction::SetDefaultTime(slot.to_string()),
            ("navigate_week", Some(offset)) => CallbackAction::NavigateWeek(offset.parse().ok()?),
            ("toggle_setting", Some(key)) => CallbackAction::ToggleSetting(key.parse().ok()?),
            ("delete_subject", Some(id)) if !id.is_empty() => CallbackAction::DeleteSubject(id.to_string()),
            ("subject_info", Some(id)) if !id.is_empty() => CallbackAction::SubjectInfo(id.to_string()),
            ("start", Some(rest)) => {
                let (action, week_offset) = rest.split_once(':')?;
                CallbackAction::StartAction {
                    action: action.parse().ok()?,
                    week_offset: week_offset.parse().ok()?,
                }
            }
            ("hw_action", Some(rest)) => {
                let mut parts = rest.splitn(3, ':');
                let action = parts.next()?.parse().ok()?;
                let week_offset = parts.next()?.parse().ok()?;
                let homework_id = parts.next().filter(|id| !id.is_empty())?;
                CallbackAction::ApplyAction {
                    action,
                    week_offset,
                    homework_id: homework_id.to_string(),
                }
            }
            _ => return None,
        };
        Some(action)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Cancel => write!(f, "cancel"),
            CallbackAction::AddHomework => write!(f, "add_homework"),
            CallbackAction::SelectSubject(id) => write!(f, "select_subject:{}", id),
            CallbackAction::NewSubject => write!(f, "new_subject"),
            CallbackAction::SelectWeek(date) => write!(f, "select_week:{}", date.format("%Y-%m-%d")),
            CallbackAction::SelectDate(date) => write!(f, "select_date:{}", date.format("%Y-%m-%d")),
            CallbackAction::BackToWeekSelection => write!(f, "back_to_week_selection"),
            CallbackAction::SelectHomeworkTime(slot) => write!(f, "select_hw_time:{}", slot),
            CallbackAction::StartAction { action, week_offset } => {
                write!(f, "start:{}:{}", action.as_str(), week_offset)
            }
            CallbackAction::ApplyAction { action, week_offset, homework_id } => {
                write!(f, "hw_action:{}:{}:{}", action.as_str(), week_offset, homework_id)
            }
            CallbackAction::NavigateWeek(offset) => write!(f, "navigate_week:{}", offset),
            CallbackAction::ShowSettings => write!(f, "show_settings"),
            CallbackAction::BackToMainMenu => write!(f, "back_to_main_menu"),
            CallbackAction::ToggleSetting(key) => write!(f, "toggle_setting:{}", key.as_str()),
            CallbackAction::EditReminderTime => write!(f, "edit_reminder_time"),
            CallbackAction::SetDefaultTime(slot) => write!(f, "set_default_time:{}", slot),
            CallbackAction::ManageSubjects => write!(f, "manage_subjects"),
            CallbackAction::AddSubject => write!(f, "add_subject"),
            CallbackAction::DeleteSubject(id) => write!(f, "delete_subject:{}", id),
            CallbackAction::SubjectInfo(id) => write!(f, "subject_info:{}", id),
        }
    }
}
