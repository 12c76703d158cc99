//! Homework model

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use super::notification_time::{lenient_optional, NotificationTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    #[default]
    Pending,
    Done,
}

/// Anything but `"done"` counts as pending
impl<'de> Deserialize<'de> for HomeworkStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(if raw == "done" { HomeworkStatus::Done } else { HomeworkStatus::Pending })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub id: String,
    #[serde(alias = "subject_key")]
    pub subject_id: String,
    pub deadline_date: NaiveDate,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "photo_id")]
    pub photo_ref: Option<String>,
    #[serde(default)]
    pub status: HomeworkStatus,
    #[serde(default, deserialize_with = "lenient_optional")]
    pub notification_time: Option<NotificationTime>,
}

impl Homework {
    /// Active homework is anything not yet marked done
    pub fn is_active(&self) -> bool {
        self.status != HomeworkStatus::Done
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHomeworkRequest {
    pub subject_id: String,
    pub deadline_date: NaiveDate,
    pub text: Option<String>,
    pub photo_ref: Option<String>,
    pub notification_time: Option<NotificationTime>,
}
