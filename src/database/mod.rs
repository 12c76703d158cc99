//! Database module
//!
//! This module handles the JSON document store and the repositories on top of it

pub mod store;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use store::DocumentStore;
pub use repositories::{UserRepository, SubjectRepository, HomeworkRepository};
pub use service::{DatabaseService, SystemStats};
