//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on the current application mode.
//! The nav bar and the help overlay are both generated from it.

use crate::app::AppMode;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Continue,
    Back,
    Skip,
    JumpSection,
    NavigateUp,
    NavigateDown,
    Toggle,
    Edit,
    Submit,
    Record,
    Attach,
    RemoveFile,
    ExternalPerson,
    Help,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Mode-specific keybindings
    mode_bindings: HashMap<AppMode, Vec<Keybinding>>,
    /// Global keybindings (available in all modes)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            mode_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    /// Register default keybindings for all modes
    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            Keybinding::new(KeyCode::Esc, KeyAction::Quit, "Esc", "Quit"),
        ];

        let wizard_bindings = vec![
            Keybinding::new(KeyCode::Tab, KeyAction::Continue, "Tab/Right", "Continue"),
            Keybinding::new(KeyCode::BackTab, KeyAction::Back, "S-Tab/Left", "Back"),
            Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Previous item"),
            Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Next item"),
            Keybinding::new(KeyCode::Char(' '), KeyAction::Toggle, "Space", "Select / toggle"),
            Keybinding::new(KeyCode::Char('e'), KeyAction::Edit, "e", "Edit field"),
            Keybinding::new(KeyCode::Enter, KeyAction::Submit, "Enter", "Edit / submit on last step"),
        ];

        // Capture interview
        let mut capture = wizard_bindings.clone();
        capture.extend([
            Keybinding::with_modifiers(
                KeyCode::Char('s'),
                KeyModifiers::CONTROL,
                KeyAction::Skip,
                "Ctrl+S",
                "Skip question",
            ),
            Keybinding::new(KeyCode::Char('1'), KeyAction::JumpSection, "1-9", "Jump to section"),
            Keybinding::new(KeyCode::Char('r'), KeyAction::Record, "r", "Record / re-record"),
            Keybinding::new(KeyCode::Char('a'), KeyAction::Attach, "a", "Attach file"),
            Keybinding::new(KeyCode::Char('d'), KeyAction::RemoveFile, "d", "Remove file"),
        ]);
        self.mode_bindings.insert(AppMode::Capture, capture);

        // Request form
        let mut request = wizard_bindings;
        request.push(Keybinding::new(
            KeyCode::Char('x'),
            KeyAction::ExternalPerson,
            "x",
            "Invite someone else",
        ));
        self.mode_bindings.insert(AppMode::Request, request);

        // Submitted
        self.mode_bindings.insert(
            AppMode::Submitted,
            vec![Keybinding::new(KeyCode::Enter, KeyAction::Quit, "Enter", "Close")],
        );
    }

    /// Get keybindings for a specific mode (includes global bindings)
    pub fn get_bindings(&self, mode: &AppMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(mode_bindings) = self.mode_bindings.get(mode) {
            bindings.extend(mode_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());

        bindings
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, mode: &AppMode) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(mode);

        // Select key bindings to show in nav bar (most important ones)
        let priority_actions = match mode {
            AppMode::Capture => vec![
                KeyAction::Continue,
                KeyAction::Back,
                KeyAction::Skip,
                KeyAction::JumpSection,
                KeyAction::Edit,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            AppMode::Request => vec![
                KeyAction::Continue,
                KeyAction::Back,
                KeyAction::Toggle,
                KeyAction::Edit,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            AppMode::Submitted => vec![KeyAction::Quit],
        };

        priority_actions
            .into_iter()
            .filter_map(|action| bindings.iter().find(|b| b.action == action))
            .map(|binding| NavBarItem {
                key_display: binding.display.clone(),
                action_label: binding.description.clone(),
            })
            .collect()
    }

    /// Nav bar while a text input is active
    pub fn editing_nav_items() -> Vec<NavBarItem> {
        [("Enter", "Save"), ("Esc", "Cancel"), ("Ctrl+U", "Clear")]
            .into_iter()
            .map(|(key, label)| NavBarItem {
                key_display: key.to_string(),
                action_label: label.to_string(),
            })
            .collect()
    }

    /// Get full help content for a mode (for help overlay)
    pub fn get_help_content(&self, mode: &AppMode) -> Vec<HelpSection> {
        let groups: [(&str, &[KeyAction]); 3] = [
            (
                "Navigation",
                &[
                    KeyAction::Continue,
                    KeyAction::Back,
                    KeyAction::Skip,
                    KeyAction::JumpSection,
                    KeyAction::NavigateUp,
                    KeyAction::NavigateDown,
                ],
            ),
            (
                "Answering",
                &[
                    KeyAction::Toggle,
                    KeyAction::Edit,
                    KeyAction::Submit,
                    KeyAction::Record,
                    KeyAction::Attach,
                    KeyAction::RemoveFile,
                    KeyAction::ExternalPerson,
                ],
            ),
            ("General", &[KeyAction::Help, KeyAction::Quit]),
        ];

        let bindings = self.get_bindings(mode);
        groups
            .into_iter()
            .filter_map(|(title, actions)| {
                let items: Vec<(String, String)> = bindings
                    .iter()
                    .filter(|b| actions.contains(&b.action))
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect();
                (!items.is_empty()).then(|| HelpSection {
                    title: title.to_string(),
                    items,
                })
            })
            .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}
