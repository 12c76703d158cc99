//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub dialogs: DialogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    #[serde(default)]
    pub admin_ids: Vec<i64>,
    #[serde(default = "default_admin_command")]
    pub admin_command: String,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub path: String,
}

/// Reminder scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Offset of the reference timezone from UTC, in whole hours
    pub utc_offset_hours: i32,
    /// Daily cleanup time, "HH:MM" in the reference timezone
    pub cleanup_time: String,
    /// Homework older than this many weeks is removed by the cleanup trigger
    pub cleanup_weeks: u32,
}

/// Dialog engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialogConfig {
    /// Idle dialogs expire after this many seconds
    pub max_duration_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
}

fn default_admin_command() -> String {
    "/stats".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "database.json".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 3,
            cleanup_time: "03:00".to_string(),
            cleanup_weeks: 3,
        }
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            max_duration_seconds: 3600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("HOMEWORKBUDDY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::HomeworkBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_ids: vec![],
                admin_command: default_admin_command(),
            },
            storage: StorageConfig::default(),
            scheduler: SchedulerConfig::default(),
            dialogs: DialogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
