//! State management module
//!
//! This module handles dialog state and user context

pub mod context;
pub mod scenarios;
pub mod storage;

// Re-export commonly used state components
pub use context::{AppContext, ConversationContext, ParentFrame};
pub use scenarios::{Scenario, ScenarioManager, ScenarioStep, StepValidation, InputType};
pub use storage::StateStorage;
