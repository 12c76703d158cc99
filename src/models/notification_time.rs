//! Reminder slot model
//!
//! A [`NotificationTime`] is an `"HH:MM"` wall-clock value on a 30-minute grid.
//! The scheduler has one trigger per slot, so every persisted value must land
//! on the grid.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::utils::errors::HomeworkBuddyError;

/// Number of reminder slots in a day
pub const SLOTS_PER_DAY: usize = 48;

fn slot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):(00|30)$").expect("valid slot pattern")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationTime {
    hour: u8,
    minute: u8,
}

impl NotificationTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && (minute == 0 || minute == 30) {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// All 48 slots from 00:00 to 23:30
    pub fn all_slots() -> impl Iterator<Item = NotificationTime> {
        (0..24u8).flat_map(|hour| [0u8, 30].into_iter().map(move |minute| Self { hour, minute }))
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for NotificationTime {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

impl fmt::Display for NotificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for NotificationTime {
    type Err = HomeworkBuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = slot_pattern()
            .captures(s)
            .ok_or_else(|| HomeworkBuddyError::InvalidInput(format!("Invalid notification time: {}", s)))?;
        let hour = caps[1].parse::<u8>().map_err(|_| HomeworkBuddyError::InvalidInput(s.to_string()))?;
        let minute = caps[2].parse::<u8>().map_err(|_| HomeworkBuddyError::InvalidInput(s.to_string()))?;
        Ok(Self { hour, minute })
    }
}

impl Serialize for NotificationTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NotificationTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Read an optional slot, dropping off-grid values instead of failing the whole document
pub(crate) fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<NotificationTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse() {
        Ok(time) => Some(time),
        Err(_) => {
            warn!(value = %value, "Dropping malformed notification time");
            None
        }
    }))
}

/// Read a required slot, falling back to the default for malformed values
pub(crate) fn lenient_or_default<'de, D>(deserializer: D) -> Result<NotificationTime, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional(deserializer)?.unwrap_or_default())
}
