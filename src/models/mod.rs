//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod document;
pub mod homework;
pub mod notification_time;
pub mod subject;
pub mod user;

// Re-export commonly used models
pub use document::Document;
pub use homework::{Homework, HomeworkStatus, CreateHomeworkRequest};
pub use notification_time::NotificationTime;
pub use subject::{Subject, SubjectRecord};
pub use user::{UserRecord, UserSettings, SettingKey, SettingValue};
