//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod subject;
pub mod homework;

// Re-export repositories
pub use user::UserRepository;
pub use subject::SubjectRepository;
pub use homework::HomeworkRepository;
