//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{Datelike, Days, Duration, NaiveDate};
use uuid::Uuid;
use crate::utils::errors::{HomeworkBuddyError, Result};

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Days::new(u64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_days(back).unwrap_or(date)
}

/// Inclusive [Monday, Sunday] window of the week `week_offset` weeks away from `today`'s week
///
/// Offsets arrive in callback data, so one that leaves the calendar is an input error.
pub fn week_bounds(today: NaiveDate, week_offset: i64) -> Result<(NaiveDate, NaiveDate)> {
    let out_of_range = || HomeworkBuddyError::InvalidInput(format!("Week offset {} is out of range", week_offset));

    let shift = week_offset
        .checked_mul(7)
        .and_then(Duration::try_days)
        .ok_or_else(out_of_range)?;
    let start = week_start(today).checked_add_signed(shift).ok_or_else(out_of_range)?;
    let end = start.checked_add_days(Days::new(6)).ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// Whole weeks between `today`'s week and the week containing `date`
pub fn week_offset_of(today: NaiveDate, date: NaiveDate) -> i64 {
    (week_start(date) - week_start(today)).num_days() / 7
}

/// Format a deadline as `dd.mm.yyyy`
pub fn format_deadline(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Format a week as `dd.mm - dd.mm`
pub fn format_week_range(start: NaiveDate) -> String {
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    format!("{} - {}", start.format("%d.%m"), end.format("%d.%m"))
}

const WEEKDAY_NAMES: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
const WEEKDAY_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Format a day heading, e.g. `Monday, 01.01`
pub fn format_day_heading(date: NaiveDate) -> String {
    let name = WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize];
    format!("{}, {}", name, date.format("%d.%m"))
}

/// Short day label for buttons, e.g. `Mon (1)`
pub fn format_day_button(date: NaiveDate) -> String {
    let name = WEEKDAY_SHORT[date.weekday().num_days_from_monday() as usize];
    format!("{} ({})", name, date.day())
}

/// Escape text for Telegram HTML parse mode
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
