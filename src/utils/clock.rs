//! Wall-clock access in the reference timezone
//!
//! Repositories, dialogs and the scheduler read "today" and "now" through
//! [`Clock`] so that week windows and reminder slots are evaluated in one
//! fixed timezone and can be pinned in tests.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use crate::utils::errors::{HomeworkBuddyError, Result};

/// Source of the current time in the reference timezone
pub trait Clock: Send + Sync {
    /// Current instant in the reference timezone
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current calendar date in the reference timezone
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time, shifted to a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(utc_offset_hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
            HomeworkBuddyError::Config(format!("Invalid UTC offset: {}", utc_offset_hours))
        })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Build a clock at `date time` in the given offset
    pub fn at(local: NaiveDateTime, utc_offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        let now = offset
            .from_local_datetime(&local)
            .single()
            .unwrap_or_else(|| offset.from_utc_datetime(&local));
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
