//! Display text

use std::collections::BTreeMap;
use chrono::NaiveDate;
use crate::models::Homework;
use crate::utils::helpers::{escape_html, format_day_heading, format_deadline, format_week_range};

pub const WELCOME_MESSAGE: &str = "Welcome! I will help you keep track of your homework.";

pub const HELP_MESSAGE: &str = "📚 <b>Homework tracker with reminders.</b>\n\n\
🎯 <b>How to use:</b>\n\
• To add homework, just send me the task text (or a photo)\n\
• I will ask for the subject and the deadline\n\n\
⚙️ <b>Features:</b>\n\
• Weekly homework view\n\
• Marking homework as done\n\
• Editing and deleting homework\n\
• Managing subjects in settings\n\
• Daily reminders\n\n\
🔧 <b>Commands:</b>\n\
/start - open the homework view\n\
/help - show this help";

pub const NO_HOMEWORK_MESSAGE: &str = "No homework this week.";
pub const CHOOSE_SUBJECT: &str = "Choose a subject:";
pub const CHOOSE_WEEK: &str = "Choose a week:";
pub const CHOOSE_DAY: &str = "Now choose a day:";
pub const CHOOSE_HOMEWORK_TIME: &str = "Choose the time for the daily reminder:";
pub const CHOOSE_DEFAULT_TIME: &str = "Choose the default time for daily reminders:";
pub const ENTER_SUBJECT_NAME: &str = "Enter the name of the new subject:";
pub const EMPTY_SUBJECT_NAME: &str = "The name cannot be empty. Try again.";
pub const ENTER_NEW_TEXT: &str = "Please send the new text for this homework.";
pub const EMPTY_TEXT: &str = "The text cannot be empty.";
pub const HOMEWORK_SAVED: &str = "✅ Homework saved!";
pub const HOMEWORK_UPDATED: &str = "✅ Homework updated.";
pub const HOMEWORK_NOT_FOUND: &str = "❌ Could not find that homework.";
pub const MARKED_DONE: &str = "Homework marked as done.";
pub const DELETED: &str = "Homework deleted.";
pub const NO_ACTIVE_HOMEWORK: &str = "There is no active homework this week.";
pub const ACTION_CANCELLED: &str = "Action cancelled.";
pub const SETTINGS_TITLE: &str = "⚙️ Settings";
pub const MY_SUBJECTS: &str = "My subjects:";
pub const SUBJECT_DELETED: &str = "Subject deleted.";
pub const SUBJECT_NOT_FOUND: &str = "Subject not found.";
pub const FINISH_OR_CANCEL: &str = "Please finish the current action using the buttons above, or cancel it.";
pub const ACCESS_DENIED: &str = "❌ You do not have access to this command.";
pub const UNKNOWN_SUBJECT: &str = "Unknown";
pub const PHOTO_ONLY: &str = "📷 photo";
pub const STALE_BUTTON: &str = "This button is no longer active.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Send /start to begin again.";

pub fn subject_added(name: &str) -> String {
    format!("Subject '{}' added!", name)
}

pub fn default_time_set(time: &str) -> String {
    format!("Default reminder time set to {}.", time)
}

pub fn action_prompt(action: super::HomeworkAction) -> &'static str {
    match action {
        super::HomeworkAction::MarkDone => "Which homework do you want to mark as done?",
        super::HomeworkAction::Edit => "Which homework do you want to edit?",
        super::HomeworkAction::Delete => "Which homework do you want to delete?",
    }
}

pub fn subject_info(name: &str, homework_count: usize) -> String {
    format!("📘 <b>{}</b>\nHomework items: {}", escape_html(name), homework_count)
}

pub fn admin_stats(users: usize, homework: usize, updated: &str) -> String {
    format!(
        "📊 <b>Bot statistics</b>\n\n\
👥 <b>Total users:</b> {}\n\
📚 <b>Total homework:</b> {}\n\n\
<i>Updated: {}</i>",
        users, homework, updated
    )
}

fn homework_line(hw: &Homework, subjects: &BTreeMap<String, String>) -> String {
    let subject = subjects.get(&hw.subject_id).map(String::as_str).unwrap_or(UNKNOWN_SUBJECT);
    let text = match (&hw.text, &hw.photo_ref) {
        (Some(text), Some(_)) => format!("{} 📷", escape_html(text)),
        (Some(text), None) => escape_html(text),
        (None, _) => PHOTO_ONLY.to_string(),
    };
    format!("{}: {}", escape_html(subject), text)
}

/// Week view grouped by day
///
/// Active items are numbered continuously across the week in deadline
/// order, the same order action selection uses. Done items are struck through.
pub fn format_homework_list(week_start: NaiveDate, homework: &[Homework], subjects: &BTreeMap<String, String>) -> String {
    let mut out = format!("🗓 <b>{}</b>\n", format_week_range(week_start));
    if homework.is_empty() {
        out.push('\n');
        out.push_str(NO_HOMEWORK_MESSAGE);
        return out;
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<&Homework>> = BTreeMap::new();
    for hw in homework {
        by_day.entry(hw.deadline_date).or_default().push(hw);
    }

    let mut number = 1;
    for (day, items) in by_day {
        out.push_str(&format!("\n<b>{}:</b>\n", format_day_heading(day)));
        for hw in items {
            if hw.is_active() {
                out.push_str(&format!("<b>{}.</b> 📌 {}\n", number, homework_line(hw, subjects)));
                number += 1;
            } else {
                out.push_str(&format!("✅ <s>{}</s>\n", homework_line(hw, subjects)));
            }
        }
    }
    out.trim_end().to_string()
}

/// Daily reminder listing the matched homework of one user
pub fn format_reminder(homework: &[Homework], subjects: &BTreeMap<String, String>) -> String {
    let mut lines = vec!["🔔 <b>Daily reminder</b>\n".to_string()];
    for hw in homework {
        let subject = subjects.get(&hw.subject_id).map(String::as_str).unwrap_or(UNKNOWN_SUBJECT);
        let text = hw.text.as_deref().map(escape_html).unwrap_or_else(|| PHOTO_ONLY.to_string());
        lines.push(format!(
            "• <b>{}</b>: {} (due {})",
            escape_html(subject),
            text,
            format_deadline(hw.deadline_date)
        ));
    }
    lines.join("\n")
}
