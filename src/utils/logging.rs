//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the HomeworkBuddy application.

use tracing::{info, debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "homeworkbuddy.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: &str, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log dialog state transitions
pub fn log_dialog_transition(user_id: &str, scenario: &str, from: Option<&str>, to: Option<&str>) {
    debug!(
        user_id = user_id,
        scenario = scenario,
        from = from,
        to = to,
        "Dialog transition"
    );
}

/// Log the outcome of one reminder slot
pub fn log_reminder_dispatch(slot: &str, recipients: usize, sent: usize, failed: usize) {
    if failed > 0 {
        error!(
            slot = slot,
            recipients = recipients,
            sent = sent,
            failed = failed,
            "Reminder dispatch finished with failures"
        );
    } else {
        info!(
            slot = slot,
            recipients = recipients,
            sent = sent,
            "Reminder dispatch finished"
        );
    }
}

/// Log document store operations
pub fn log_store_operation(operation: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            duration_ms = duration_ms,
            "Store operation completed"
        );
    } else {
        error!(
            operation = operation,
            duration_ms = duration_ms,
            "Store operation failed"
        );
    }
}
