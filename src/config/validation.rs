//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use chrono::NaiveTime;
use crate::utils::errors::{HomeworkBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_storage_config(&settings.storage)?;
    validate_scheduler_config(&settings.scheduler)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(HomeworkBuddyError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_command.trim().is_empty() {
        return Err(HomeworkBuddyError::Config(
            "Admin command cannot be blank".to_string()
        ));
    }

    Ok(())
}

/// Validate document store configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.path.is_empty() {
        return Err(HomeworkBuddyError::Config(
            "Storage path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate scheduler configuration
fn validate_scheduler_config(config: &super::SchedulerConfig) -> Result<()> {
    if !(-12..=14).contains(&config.utc_offset_hours) {
        return Err(HomeworkBuddyError::Config(
            format!("UTC offset out of range: {}", config.utc_offset_hours)
        ));
    }

    if NaiveTime::parse_from_str(&config.cleanup_time, "%H:%M").is_err() {
        return Err(HomeworkBuddyError::Config(
            format!("Invalid cleanup time: {} (expected HH:MM)", config.cleanup_time)
        ));
    }

    if config.cleanup_weeks == 0 {
        return Err(HomeworkBuddyError::Config(
            "Cleanup weeks must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(HomeworkBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(HomeworkBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
