//! Integration tests module
//!
//! Organized by entry point (commands, callbacks) and by user journey.

pub mod handlers;
pub mod scenarios;
