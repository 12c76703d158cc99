//! Persisted document model
//!
//! The whole state of the bot is one JSON object keyed by user id.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use super::user::UserRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub users: BTreeMap<String, UserRecord>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.get(user_id)
    }

    pub fn user_mut(&mut self, user_id: &str) -> Option<&mut UserRecord> {
        self.users.get_mut(user_id)
    }

    /// Get the user record, creating one with default settings if absent
    pub fn user_entry(&mut self, user_id: &str) -> &mut UserRecord {
        self.users.entry(user_id.to_string()).or_default()
    }
}
