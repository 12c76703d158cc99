//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for text and photo messages
//!
//! Callbacks and messages are routed through [`router::dispatch`], which
//! drives the homework and settings dialogs.

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod router;
pub mod homework;
pub mod settings;

pub use commands::{handle_command, Command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;
pub use router::{dispatch, Inbound, IncomingEvent};
