//! Application module
//!
//! Contains the main application logic and the terminal event loop.
//!
//! # Module Structure
//! - `state` - Application state and key handling (AppState, AppMode, Row)
//! - Main module - App struct and event loop

mod state;

pub use state::{ActiveFlow, AppMode, AppState, DATE_INPUT_FORMAT, Editing, KeyOutcome, Row};

use crate::components::keybindings::KeybindingContext;
use crate::submission::{Submission, SubmissionSink};
use crate::ui::UiRenderer;
use crossterm::event::{Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long the loop waits for input before ticking
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application struct
pub struct App {
    state: AppState,
    sink: Box<dyn SubmissionSink>,
    ui_renderer: UiRenderer,
    /// Keybinding context for navigation hints
    keybinding_context: KeybindingContext,
}

impl App {
    /// Create a new application instance
    pub fn new(state: AppState, sink: Box<dyn SubmissionSink>) -> Self {
        info!(flow = %state.flow.definition().id, "Creating new App instance");
        Self {
            state,
            sink,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the event loop until the user quits.
    ///
    /// Returns the submission if the flow was submitted.
    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<Option<Submission>, Box<dyn std::error::Error>> {
        info!("Starting main application loop");

        loop {
            self.state.tick(Instant::now());

            terminal.draw(|f| {
                self.ui_renderer
                    .render(f, &self.state, &self.keybinding_context);
            })?;

            if crossterm::event::poll(POLL_INTERVAL)? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    // Windows reports releases too
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.state.handle_key(key_event, Instant::now()) {
                        KeyOutcome::Continue => {}
                        KeyOutcome::Quit => {
                            debug!("Quit requested");
                            break;
                        }
                        KeyOutcome::Submit => {
                            self.state.submit(self.sink.as_mut());
                        }
                    }
                }
            }
        }

        Ok(self.state.submission.clone())
    }
}
