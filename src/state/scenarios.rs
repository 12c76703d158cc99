//! Conversation scenarios implementation
//!
//! This module defines the dialogs users go through: homework creation with
//! its nested inline subject creation, homework actions, subject creation
//! from settings and the reminder time editor.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::models::NotificationTime;
use crate::utils::errors::{HomeworkBuddyError, Result};
use super::context::ConversationContext;

/// Scenario identifiers
pub mod ids {
    pub const HOMEWORK_CREATION: &str = "homework_creation";
    pub const SUBJECT_INLINE: &str = "subject_inline";
    pub const HOMEWORK_ACTION: &str = "homework_action";
    pub const SUBJECT_CREATE: &str = "subject_create";
    pub const REMINDER_TIME: &str = "reminder_time";
}

/// Step identifiers
pub mod steps {
    pub const SELECTING_SUBJECT: &str = "selecting_subject";
    pub const SELECTING_DATE: &str = "selecting_date";
    pub const SELECTING_DAY: &str = "selecting_day";
    pub const SELECTING_TIME: &str = "selecting_time";
    pub const CREATING_SUBJECT: &str = "creating_subject";
    pub const SELECTING_HOMEWORK: &str = "selecting_homework";
    pub const EDITING_TEXT: &str = "editing_text";
    pub const EDITING_REMINDER_TIME: &str = "editing_reminder_time";
}

/// Represents a conversation scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Initial step when starting this scenario
    pub initial_step: String,
    /// All possible steps in this scenario
    pub steps: HashMap<String, ScenarioStep>,
    /// Maximum idle duration for this scenario (in seconds)
    pub max_duration: Option<u64>,
    /// Parent step to resume when a nested scenario finishes, keyed by child scenario id
    pub return_to: HashMap<String, String>,
}

/// Represents a step within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Step identifier
    pub id: String,
    /// Possible next steps from this step
    pub next_steps: Vec<String>,
    /// Whether this step waits for typed text
    pub expects_text: bool,
    /// Validation rules for user input
    pub validation: Option<StepValidation>,
}

/// Validation rules for a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    /// Input type expected
    pub input_type: InputType,
    /// Minimum length in characters, after trimming
    pub min_length: Option<usize>,
    /// Custom validation message
    pub error_message: Option<String>,
}

/// Types of input expected in a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputType {
    Text,
    /// A "HH:MM" value on the half-hour grid
    TimeSlot,
}

/// Scenario manager for handling all conversation scenarios
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    scenarios: HashMap<String, Scenario>,
}

impl ScenarioManager {
    /// Create a manager with all dialogs registered
    pub fn new(max_duration_seconds: u64) -> Self {
        let mut manager = Self {
            scenarios: HashMap::new(),
        };

        for mut scenario in default_scenarios() {
            scenario.max_duration = Some(max_duration_seconds);
            manager.register_scenario(scenario);
        }
        manager
    }

    /// Register a new scenario
    pub fn register_scenario(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    /// Get a scenario by ID
    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    fn scenario_or_err(&self, id: &str) -> Result<&Scenario> {
        self.get_scenario(id)
            .ok_or_else(|| HomeworkBuddyError::InvalidInput(format!("Unknown scenario: {}", id)))
    }

    /// Start a scenario, discarding any dialog the context held
    pub fn start_scenario(&self, context: &mut ConversationContext, scenario_id: &str) -> Result<()> {
        let scenario = self.scenario_or_err(scenario_id)?;
        context.start_scenario(scenario_id, &scenario.initial_step)?;
        self.refresh_expiry(context, scenario);
        Ok(())
    }

    /// Move to the next step in a scenario
    pub fn next_step(&self, context: &mut ConversationContext, next_step: &str) -> Result<()> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| HomeworkBuddyError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: next_step.to_string(),
            })?;
        let scenario = self.scenario_or_err(scenario_id)?;

        let current_step_id = context.step.as_ref()
            .ok_or_else(|| HomeworkBuddyError::InvalidStateTransition {
                from: "no_step".to_string(),
                to: next_step.to_string(),
            })?;

        let current_step = scenario.steps.get(current_step_id)
            .ok_or_else(|| HomeworkBuddyError::InvalidInput(format!("Unknown step: {}", current_step_id)))?;

        if !current_step.next_steps.iter().any(|s| s == next_step) {
            return Err(HomeworkBuddyError::InvalidStateTransition {
                from: current_step_id.clone(),
                to: next_step.to_string(),
            });
        }

        if !scenario.steps.contains_key(next_step) {
            return Err(HomeworkBuddyError::InvalidInput(format!("Unknown step: {}", next_step)));
        }

        context.next_step(next_step)?;
        self.refresh_expiry(context, scenario);
        Ok(())
    }

    /// Run `child_id` nested inside the active scenario
    ///
    /// Only children listed in the parent's `return_to` map may be entered.
    pub fn enter_child(&self, context: &mut ConversationContext, child_id: &str) -> Result<()> {
        let parent_id = context.scenario.clone().unwrap_or_default();
        let parent = self.scenario_or_err(&parent_id)?;
        if !parent.return_to.contains_key(child_id) {
            return Err(HomeworkBuddyError::InvalidStateTransition {
                from: parent_id,
                to: child_id.to_string(),
            });
        }

        let child = self.scenario_or_err(child_id)?;
        context.push_child(child_id, &child.initial_step)?;
        self.refresh_expiry(context, child);
        Ok(())
    }

    /// Finish a nested scenario and resume its parent
    ///
    /// The parent resumes at the step its `return_to` map names for this
    /// child, not at the step after the one that was suspended. Returns the
    /// resumed step, or `None` when there was no parent and the context was
    /// simply cleared.
    pub fn finish_child(&self, context: &mut ConversationContext) -> Result<Option<String>> {
        let Some(parent_frame) = context.parent.as_ref() else {
            context.complete_scenario();
            return Ok(None);
        };

        let child_id = context.scenario.clone().unwrap_or_default();
        let parent = self.scenario_or_err(&parent_frame.scenario)?;
        let target = parent
            .return_to
            .get(&child_id)
            .cloned()
            .unwrap_or_else(|| parent_frame.step.clone());

        context.pop_child(&target)?;
        self.refresh_expiry(context, parent);
        Ok(Some(target))
    }

    /// Validate user input for the current step
    pub fn validate_input(&self, context: &ConversationContext, input: &str) -> Result<()> {
        let step = self.get_current_step(context)?;

        if let Some(validation) = &step.validation {
            self.validate_input_against_rules(input, validation)?;
        }

        Ok(())
    }

    /// Validate input against validation rules
    fn validate_input_against_rules(&self, input: &str, validation: &StepValidation) -> Result<()> {
        if let Some(min_length) = validation.min_length {
            if input.trim().chars().count() < min_length {
                return Err(HomeworkBuddyError::InvalidInput(
                    validation.error_message.clone()
                        .unwrap_or_else(|| format!("Input too short (minimum {} characters)", min_length))
                ));
            }
        }

        match &validation.input_type {
            InputType::Text => {}
            InputType::TimeSlot => {
                if input.parse::<NotificationTime>().is_err() {
                    return Err(HomeworkBuddyError::InvalidInput(
                        validation.error_message.clone()
                            .unwrap_or_else(|| "Invalid time slot (HH:00 or HH:30)".to_string())
                    ));
                }
            }
        }

        Ok(())
    }

    /// Whether the current step of the context waits for typed text
    pub fn expects_text(&self, context: &ConversationContext) -> bool {
        self.get_current_step(context)
            .map(|step| step.expects_text)
            .unwrap_or(false)
    }

    /// Get the current step information
    pub fn get_current_step(&self, context: &ConversationContext) -> Result<&ScenarioStep> {
        let scenario_id = context.scenario.as_ref()
            .ok_or_else(|| HomeworkBuddyError::InvalidInput("No active scenario".to_string()))?;

        let step_id = context.step.as_ref()
            .ok_or_else(|| HomeworkBuddyError::InvalidInput("No active step".to_string()))?;

        let scenario = self.scenario_or_err(scenario_id)?;

        scenario.steps.get(step_id)
            .ok_or_else(|| HomeworkBuddyError::InvalidInput(format!("Unknown step: {}", step_id)))
    }

    fn refresh_expiry(&self, context: &mut ConversationContext, scenario: &Scenario) {
        if let Some(max_duration) = scenario.max_duration {
            let expiry = chrono::Utc::now() + chrono::Duration::seconds(max_duration as i64);
            context.set_expiry(expiry);
        }
    }
}

fn step(id: &str, next_steps: &[&str], validation: Option<StepValidation>) -> ScenarioStep {
    ScenarioStep {
        id: id.to_string(),
        next_steps: next_steps.iter().map(|s| s.to_string()).collect(),
        expects_text: matches!(validation, Some(StepValidation { input_type: InputType::Text, .. })),
        validation,
    }
}

fn text_input(error_message: &str) -> Option<StepValidation> {
    Some(StepValidation {
        input_type: InputType::Text,
        min_length: Some(1),
        error_message: Some(error_message.to_string()),
    })
}

fn time_slot() -> Option<StepValidation> {
    Some(StepValidation {
        input_type: InputType::TimeSlot,
        min_length: None,
        error_message: None,
    })
}

fn scenario(id: &str, name: &str, steps: Vec<ScenarioStep>, return_to: &[(&str, &str)]) -> Scenario {
    Scenario {
        id: id.to_string(),
        name: name.to_string(),
        initial_step: steps.first().map(|s| s.id.clone()).unwrap_or_default(),
        steps: steps.into_iter().map(|s| (s.id.clone(), s)).collect(),
        max_duration: None,
        return_to: return_to.iter().map(|(child, step)| (child.to_string(), step.to_string())).collect(),
    }
}

fn default_scenarios() -> Vec<Scenario> {
    vec![
        scenario(
            ids::HOMEWORK_CREATION,
            "Homework Creation",
            vec![
                step(steps::SELECTING_SUBJECT, &[steps::SELECTING_DATE], None),
                step(steps::SELECTING_DATE, &[steps::SELECTING_DAY], None),
                step(
                    steps::SELECTING_DAY,
                    &[steps::SELECTING_DATE, steps::SELECTING_TIME, steps::SELECTING_SUBJECT],
                    None,
                ),
                step(steps::SELECTING_TIME, &[steps::SELECTING_SUBJECT], time_slot()),
            ],
            &[(ids::SUBJECT_INLINE, steps::SELECTING_SUBJECT)],
        ),
        scenario(
            ids::SUBJECT_INLINE,
            "Inline Subject Creation",
            vec![step(steps::CREATING_SUBJECT, &[], text_input("Subject name cannot be empty"))],
            &[],
        ),
        scenario(
            ids::HOMEWORK_ACTION,
            "Homework Action",
            vec![
                step(steps::SELECTING_HOMEWORK, &[steps::EDITING_TEXT], None),
                step(steps::EDITING_TEXT, &[], text_input("Homework text cannot be empty")),
            ],
            &[],
        ),
        scenario(
            ids::SUBJECT_CREATE,
            "Subject Creation",
            vec![step(steps::CREATING_SUBJECT, &[], text_input("Subject name cannot be empty"))],
            &[],
        ),
        scenario(
            ids::REMINDER_TIME,
            "Reminder Time",
            vec![step(steps::EDITING_REMINDER_TIME, &[], time_slot())],
            &[],
        ),
    ]
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::new(3600)
    }
}
