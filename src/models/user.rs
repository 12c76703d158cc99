//! User model

use std::collections::BTreeMap;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use crate::utils::errors::HomeworkBuddyError;
use super::homework::Homework;
use super::notification_time::{lenient_or_default, NotificationTime};
use super::subject::SubjectRecord;

/// Per-user reminder preferences
///
/// Missing boolean fields read as `false`, matching documents written by
/// older versions that stored an empty settings object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub reminders_enabled: bool,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub default_notification_time: NotificationTime,
    #[serde(default)]
    pub ask_for_notification_time: bool,
}

impl UserSettings {
    /// Settings given to a freshly created user
    pub fn for_new_user() -> Self {
        Self {
            reminders_enabled: true,
            default_notification_time: NotificationTime::default(),
            ask_for_notification_time: false,
        }
    }

    /// Settings of a record that was persisted without a settings object
    pub fn unset() -> Self {
        Self {
            reminders_enabled: false,
            default_notification_time: NotificationTime::default(),
            ask_for_notification_time: false,
        }
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::for_new_user()
    }
}

/// Everything stored for one user, keyed by platform id in the document
///
/// Reading never fails: unreadable subjects and homework entries are skipped
/// one by one, so one odd record cannot make the whole document unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub subjects: BTreeMap<String, SubjectRecord>,
    pub homework: Vec<Homework>,
    pub settings: UserSettings,
}

impl UserRecord {
    pub fn new() -> Self {
        Self {
            subjects: BTreeMap::new(),
            homework: Vec::new(),
            settings: UserSettings::for_new_user(),
        }
    }

    /// Build a record from whatever JSON was stored for a user
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            warn!("User record is not an object, reading it as empty");
            return Self {
                subjects: BTreeMap::new(),
                homework: Vec::new(),
                settings: UserSettings::unset(),
            };
        };

        let subjects = match fields.remove("subjects") {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .filter_map(|(id, entry)| match serde_json::from_value::<SubjectRecord>(entry) {
                    Ok(record) => Some((id, record)),
                    Err(e) => {
                        warn!(subject_id = %id, error = %e, "Skipping unreadable subject");
                        None
                    }
                })
                .collect(),
            // Older versions stored an empty list before the first subject was added
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Array(items)) if items.is_empty() => BTreeMap::new(),
            Some(other) => {
                warn!(subjects = %other, "Subjects are not an object, ignoring them");
                BTreeMap::new()
            }
        };

        let homework = match fields.remove("homework") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<Homework>(item.clone()) {
                    Ok(hw) => Some(hw),
                    Err(e) => {
                        warn!(entry = %item, error = %e, "Skipping unreadable homework");
                        None
                    }
                })
                .collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                warn!(homework = %other, "Homework is not a list, ignoring it");
                Vec::new()
            }
        };

        let settings = match fields.remove("settings") {
            None | Some(Value::Null) => UserSettings::unset(),
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                warn!(error = %e, "Unreadable settings, using defaults of an unset record");
                UserSettings::unset()
            }),
        };

        Self { subjects, homework, settings }
    }
}

impl<'de> Deserialize<'de> for UserRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the settings that can be changed from the settings view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    RemindersEnabled,
    DefaultNotificationTime,
    AskForNotificationTime,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::RemindersEnabled => "reminders_enabled",
            SettingKey::DefaultNotificationTime => "default_notification_time",
            SettingKey::AskForNotificationTime => "ask_for_notification_time",
        }
    }
}

impl FromStr for SettingKey {
    type Err = HomeworkBuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reminders_enabled" => Ok(SettingKey::RemindersEnabled),
            "default_notification_time" => Ok(SettingKey::DefaultNotificationTime),
            "ask_for_notification_time" => Ok(SettingKey::AskForNotificationTime),
            other => Err(HomeworkBuddyError::InvalidInput(format!("Unknown setting: {}", other))),
        }
    }
}

/// New value for a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Flag(bool),
    Time(NotificationTime),
}

impl UserSettings {
    /// Read a boolean setting
    pub fn flag(&self, key: SettingKey) -> Option<bool> {
        match key {
            SettingKey::RemindersEnabled => Some(self.reminders_enabled),
            SettingKey::AskForNotificationTime => Some(self.ask_for_notification_time),
            SettingKey::DefaultNotificationTime => None,
        }
    }

    /// Apply a value to the named setting
    pub fn apply(&mut self, key: SettingKey, value: SettingValue) -> Result<(), HomeworkBuddyError> {
        match (key, value) {
            (SettingKey::RemindersEnabled, SettingValue::Flag(flag)) => self.reminders_enabled = flag,
            (SettingKey::AskForNotificationTime, SettingValue::Flag(flag)) => self.ask_for_notification_time = flag,
            (SettingKey::DefaultNotificationTime, SettingValue::Time(time)) => self.default_notification_time = time,
            (key, value) => {
                return Err(HomeworkBuddyError::InvalidInput(format!(
                    "Setting {} does not accept {:?}",
                    key.as_str(),
                    value
                )))
            }
        }
        Ok(())
    }
}
