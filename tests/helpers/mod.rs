//! Test helpers module
//!
//! Utilities for driving the bot without Telegram: a messenger that records
//! everything the bot says, a test context around a temporary document store
//! with a pinned clock, and seed data.

#![allow(dead_code)]

pub mod recording_messenger;

pub use recording_messenger::*;
pub use test_context::*;
pub use test_data::*;
