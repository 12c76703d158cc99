//! Reminder scheduler
//!
//! A background task that fires fixed daily triggers in the reference
//! timezone: one reminder dispatch per half-hour slot and one cleanup of
//! old homework. Triggers live for the whole process lifetime.

use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};
use tracing::{debug, error, info};
use crate::config::SchedulerConfig;
use crate::database::DatabaseService;
use crate::models::{Homework, NotificationTime};
use crate::services::notification::NotificationService;
use crate::state::StateStorage;
use crate::utils::clock::Clock;
use crate::utils::errors::{HomeworkBuddyError, Result};
use crate::utils::logging::log_reminder_dispatch;

/// What a trigger does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Reminder(NotificationTime),
    Cleanup,
}

/// A daily trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub name: String,
    pub at: NaiveTime,
    pub kind: TriggerKind,
}

/// Outcome of one reminder slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderReport {
    /// Users that had something due at the slot
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct ReminderScheduler {
    database: Arc<DatabaseService>,
    notifications: Arc<NotificationService>,
    dialogs: Arc<StateStorage>,
    clock: Arc<dyn Clock>,
    cleanup_weeks: u32,
    triggers: Vec<Trigger>,
}

impl ReminderScheduler {
    pub fn new(
        database: Arc<DatabaseService>,
        notifications: Arc<NotificationService>,
        dialogs: Arc<StateStorage>,
        clock: Arc<dyn Clock>,
        config: &SchedulerConfig,
    ) -> Result<Self> {
        let cleanup_at = NaiveTime::parse_from_str(&config.cleanup_time, "%H:%M").map_err(|e| {
            HomeworkBuddyError::Config(format!("Invalid cleanup time {}: {}", config.cleanup_time, e))
        })?;

        let mut triggers: Vec<Trigger> = NotificationTime::all_slots()
            .map(|slot| Trigger {
                name: format!("daily_reminders_{}", slot),
                at: slot.as_naive_time(),
                kind: TriggerKind::Reminder(slot),
            })
            .collect();
        triggers.push(Trigger {
            name: "cleanup_old_homework".to_string(),
            at: cleanup_at,
            kind: TriggerKind::Cleanup,
        });

        Ok(Self {
            database,
            notifications,
            dialogs,
            clock,
            cleanup_weeks: config.cleanup_weeks,
            triggers,
        })
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Earliest fire time strictly after `after` and every trigger due at it
    pub fn next_fire(&self, after: DateTime<FixedOffset>) -> Option<(DateTime<FixedOffset>, Vec<Trigger>)> {
        let offset = *after.offset();
        let next_of = |at: NaiveTime| {
            let today = offset.from_local_datetime(&after.date_naive().and_time(at)).single()?;
            if today > after {
                Some(today)
            } else {
                Some(today + Duration::days(1))
            }
        };

        let earliest = self.triggers.iter().filter_map(|t| next_of(t.at)).min()?;
        let due = self
            .triggers
            .iter()
            .filter(|t| next_of(t.at) == Some(earliest))
            .cloned()
            .collect();
        Some((earliest, due))
    }

    /// Run one trigger
    pub async fn fire(&self, trigger: &Trigger) {
        match trigger.kind {
            TriggerKind::Reminder(slot) => {
                if let Err(e) = self.send_reminders(slot).await {
                    error!(trigger = %trigger.name, error = %e, "Reminder dispatch failed");
                }
            }
            TriggerKind::Cleanup => {
                if let Err(e) = self.cleanup().await {
                    error!(trigger = %trigger.name, error = %e, "Cleanup failed");
                }
            }
        }
    }

    /// Send every enabled user the active homework whose reminder is at `slot`
    ///
    /// A failed delivery is logged and counted; it never stops the scan.
    pub async fn send_reminders(&self, slot: NotificationTime) -> Result<ReminderReport> {
        let users = self.database.users.get_all_users().await?;
        let mut report = ReminderReport::default();

        for (user_id, record) in users {
            if !record.settings.reminders_enabled {
                continue;
            }

            let mut due: Vec<Homework> = record
                .homework
                .iter()
                .filter(|hw| hw.is_active() && hw.notification_time == Some(slot))
                .cloned()
                .collect();
            if due.is_empty() {
                continue;
            }
            due.sort_by_key(|hw| hw.deadline_date);

            let subjects: BTreeMap<String, String> = record
                .subjects
                .iter()
                .map(|(id, subject)| (id.clone(), subject.name.clone()))
                .collect();

            report.recipients += 1;
            match self.notifications.send_reminder(&user_id, &due, &subjects).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!(user_id = %user_id, slot = %slot, error = %e, "Error sending daily reminder");
                    report.failed += 1;
                }
            }
        }

        log_reminder_dispatch(&slot.to_string(), report.recipients, report.sent, report.failed);
        Ok(report)
    }

    /// Delete homework older than the configured number of weeks and drop expired dialogs
    ///
    /// Returns the number of homework items removed.
    pub async fn cleanup(&self) -> Result<usize> {
        info!(weeks = self.cleanup_weeks, "Cleaning up old homework");
        let removed = self.database.homework.delete_older_than(self.cleanup_weeks).await?;
        let dropped = self.dialogs.cleanup_expired_contexts().await;
        let remaining = self.dialogs.stored_count().await;
        debug!(dropped = dropped, remaining = remaining, "Expired dialogs dropped");
        Ok(removed)
    }

    /// Start the scheduler background loop
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        info!(triggers = self.triggers.len(), "Starting reminder scheduler");

        tokio::spawn(async move {
            let mut cursor = self.clock.now();
            loop {
                let Some((at, due)) = self.next_fire(cursor) else {
                    error!("No triggers registered, scheduler stopped");
                    return;
                };

                let wait = (at - self.clock.now()).to_std().unwrap_or_default();
                debug!(next = %at, triggers = due.len(), "Waiting for next trigger");
                tokio::time::sleep(wait).await;

                for trigger in &due {
                    self.fire(trigger).await;
                }
                cursor = at;
            }
        })
    }
}
