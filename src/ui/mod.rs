//! Presentation module
//!
//! Keyboards, callback tokens and display text. Handlers build [`View`]s
//! from these pieces and hand them to the messenger.

pub mod actions;
pub mod keyboards;
pub mod text;

pub use actions::{CallbackAction, HomeworkAction};
pub use keyboards::{Button, Keyboard};

/// Formatting applied to outgoing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    #[default]
    Plain,
    Html,
}

/// A render request: text, buttons and formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub mode: TextMode,
}

impl View {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            mode: TextMode::Plain,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            mode: TextMode::Html,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
