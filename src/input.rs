//! Input handling module
//!
//! Inline text editing for answers, custom options, file names and request
//! form fields. While an input is active every printable key goes into it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of feeding a key to an active input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// User confirmed with a value
    Confirm(String),
    /// User cancelled
    Cancel,
    /// Continue processing input
    Continue,
}

/// Single-line text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    /// Label shown next to the field
    pub field_name: String,
    pub value: String,
    pub placeholder: String,
}

impl TextInput {
    pub fn new(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            value: value.into(),
            placeholder: String::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Handle keyboard input for the field
    pub fn handle_input(&mut self, key_event: KeyEvent) -> InputResult {
        match key_event.code {
            KeyCode::Enter => InputResult::Confirm(self.value.clone()),
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Backspace => {
                self.value.pop();
                InputResult::Continue
            }
            KeyCode::Char('u') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                InputResult::Continue
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_confirm() {
        let mut input = TextInput::new("Answer", "");
        for c in "hi!".chars() {
            assert_eq!(input.handle_input(key(KeyCode::Char(c))), InputResult::Continue);
        }
        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(
            input.handle_input(key(KeyCode::Enter)),
            InputResult::Confirm("hi".to_string())
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut input = TextInput::new("Answer", "keep");
        assert_eq!(input.handle_input(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.value, "keep");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::new("Answer", "some text");
        input.handle_input(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(input.value.is_empty());
    }

    #[test]
    fn test_shifted_characters_are_typed() {
        let mut input = TextInput::new("Name", "");
        input.handle_input(KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT));
        assert_eq!(input.value, "J");
    }
}
