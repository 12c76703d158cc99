//! Conversation context management
//!
//! This module handles dialog context, tracking the current scenario,
//! step, and transient data for each (user, chat) pair.

use std::collections::HashMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

use crate::Settings;
use crate::utils::clock::Clock;
use crate::utils::errors::{HomeworkBuddyError, Result};
use crate::{
    DatabaseService,
    services::{Messenger, NotificationService},
    state::scenarios::ScenarioManager,
    state::storage::StateStorage,
};

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub database: Arc<DatabaseService>,
    pub messenger: Arc<dyn Messenger>,
    pub notification_service: Arc<NotificationService>,
    pub scenario_manager: Arc<ScenarioManager>,
    pub state_storage: Arc<StateStorage>,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        database: Arc<DatabaseService>,
        messenger: Arc<dyn Messenger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let scenario_manager = Arc::new(ScenarioManager::new(settings.dialogs.max_duration_seconds));
        let notification_service = Arc::new(NotificationService::new(messenger.clone()));

        Self {
            settings,
            database,
            messenger,
            notification_service,
            scenario_manager,
            state_storage: Arc::new(StateStorage::new()),
            clock,
        }
    }

    /// Whether the user may run admin commands; an empty admin list allows everyone
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.settings.bot.admin_ids.is_empty() || self.settings.bot.admin_ids.contains(&user_id)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

/// Saved position of a parent dialog while a nested dialog runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentFrame {
    pub scenario: String,
    pub step: String,
    pub data: HashMap<String, serde_json::Value>,
}

/// Dialog context of one user in one chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// User this context belongs to
    pub user_id: String,
    /// Chat the dialog runs in
    pub chat_id: i64,
    /// Current scenario the user is in
    pub scenario: Option<String>,
    /// Current step within the scenario
    pub step: Option<String>,
    /// Scenario-specific data
    pub data: HashMap<String, serde_json::Value>,
    /// Parent dialog suspended by a nested one
    pub parent: Option<ParentFrame>,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(user_id: impl Into<String>, chat_id: i64) -> Self {
        Self {
            user_id: user_id.into(),
            chat_id,
            scenario: None,
            step: None,
            data: HashMap::new(),
            parent: None,
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Start a new scenario, dropping whatever was active
    pub fn start_scenario(&mut self, scenario: &str, initial_step: &str) -> Result<()> {
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.data.clear();
        self.parent = None;
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::hours(1));
        Ok(())
    }

    /// Move to the next step in the current scenario
    pub fn next_step(&mut self, step: &str) -> Result<()> {
        if self.scenario.is_none() {
            return Err(HomeworkBuddyError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: step.to_string(),
            });
        }

        self.step = Some(step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Suspend the current scenario and run `scenario` on top of it
    pub fn push_child(&mut self, scenario: &str, initial_step: &str) -> Result<()> {
        let (Some(parent_scenario), Some(parent_step)) = (self.scenario.take(), self.step.take()) else {
            return Err(HomeworkBuddyError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: scenario.to_string(),
            });
        };

        self.parent = Some(ParentFrame {
            scenario: parent_scenario,
            step: parent_step,
            data: std::mem::take(&mut self.data),
        });
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Drop the nested scenario and resume the parent at `step`
    pub fn pop_child(&mut self, step: &str) -> Result<()> {
        let parent = self.parent.take().ok_or_else(|| HomeworkBuddyError::InvalidStateTransition {
            from: self.scenario.clone().unwrap_or_else(|| "no_scenario".to_string()),
            to: step.to_string(),
        })?;

        self.scenario = Some(parent.scenario);
        self.step = Some(step.to_string());
        self.data = parent.data;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Complete the current scenario and clear context
    pub fn complete_scenario(&mut self) {
        self.scenario = None;
        self.step = None;
        self.data.clear();
        self.parent = None;
        self.expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Cancel the current scenario
    pub fn cancel_scenario(&mut self) {
        self.complete_scenario();
    }

    /// Set data for the current context
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get data from the current context
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        if let Some(value) = self.data.get(key) {
            let result: T = serde_json::from_value(value.clone())?;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// Get string data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    /// Get integer data (convenience method)
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_data::<i64>(key).unwrap_or(None)
    }

    /// Remove data from context
    pub fn remove_data(&mut self, key: &str) -> Option<serde_json::Value> {
        self.updated_at = Utc::now();
        self.data.remove(key)
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Set custom expiry time
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Whether any dialog is running
    pub fn is_active(&self) -> bool {
        self.scenario.is_some()
    }

    /// Check if user is in a specific scenario
    pub fn is_in_scenario(&self, scenario: &str) -> bool {
        self.scenario.as_deref() == Some(scenario)
    }

    /// Check if user is at a specific step
    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_deref() == Some(step)
    }

    /// Check if user is in a specific scenario and step
    pub fn is_at(&self, scenario: &str, step: &str) -> bool {
        self.is_in_scenario(scenario) && self.is_at_step(step)
    }

    /// Get current scenario and step as tuple
    pub fn current_state(&self) -> (Option<&str>, Option<&str>) {
        (self.scenario.as_deref(), self.step.as_deref())
    }
}
