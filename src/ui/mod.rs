//! User interface rendering module
//!
//! This module is organized into submodules:
//! - `header` - Flow title, progress gauge, status line and nav bar
//! - `sidebar` - Section list with completion state
//! - `screens` - Step card and confirmation screen

pub mod header;
pub mod screens;
pub mod sidebar;

use crate::app::{AppMode, AppState};
use crate::components::keybindings::KeybindingContext;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use header::HeaderRenderer;

/// Below this width the sidebar is hidden
pub const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 80;

const SIDEBAR_WIDTH: u16 = 28;
const HEADER_HEIGHT: u16 = 4;

/// Main UI renderer
pub struct UiRenderer {
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    /// Create a new UI renderer
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the whole frame for the current state
    pub fn render(&self, f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
        let [content_area, status_area, nav_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(f.area());

        match state.mode {
            AppMode::Capture | AppMode::Request => self.render_wizard(f, state, content_area),
            AppMode::Submitted => screens::render_submitted(f, state, content_area),
        }

        header::render_status(f, state, status_area);
        header::render_nav_bar(f, state, keybinding_ctx, nav_area);

        if state.help_visible {
            header::render_help_overlay(f, state, keybinding_ctx);
        }
    }

    fn render_wizard(&self, f: &mut Frame, state: &AppState, area: Rect) {
        let main_area = if area.width >= SIDEBAR_MIN_TERMINAL_WIDTH {
            let [sidebar_area, main_area] =
                Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                    .areas(area);
            sidebar::render_sidebar(f, state, &self.header, sidebar_area);
            main_area
        } else {
            area
        };

        let [header_area, step_area] =
            Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
                .areas(main_area);
        let [header_area] = Layout::horizontal([Constraint::Min(0)])
            .horizontal_margin(1)
            .areas(header_area);

        self.header.render(f, state, header_area);
        screens::render_step(f, state, step_area);
    }
}
