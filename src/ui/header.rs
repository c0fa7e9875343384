//! Header and common widget rendering
//!
//! Flow title, step counter, progress gauge and incentive badge, plus the
//! status line, nav bar and help overlay shared by every screen.

use crate::app::AppState;
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use crate::components::nav_bar::NavBar;
use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Header renderer for the wizard screens
pub struct HeaderRenderer {
    logo: Line<'static>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    /// Create a new header renderer
    pub fn new() -> Self {
        Self {
            logo: Line::from(vec![
                Span::styled(
                    " N ",
                    Style::default()
                        .fg(Colors::SELECTED_FG)
                        .bg(Colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" Nolly", Styles::title()),
            ]),
        }
    }

    /// The brand line shown at the top of the sidebar
    pub fn logo(&self) -> Line<'static> {
        self.logo.clone()
    }

    /// Title row, then "Step N of M" with the incentive badge, then the gauge
    pub fn render(&self, f: &mut Frame, state: &AppState, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let flow = state.flow.definition();
        let [title_area, step_area, gauge_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        f.render_widget(
            Paragraph::new(Line::from(Span::styled(flow.title.clone(), Styles::title()))),
            title_area,
        );

        let section = state
            .flow
            .current_step()
            .and_then(|step| flow.section(&step.section))
            .map(|s| s.name.as_str())
            .unwrap_or_default();
        let mut spans = vec![
            Span::styled(
                step_counter(state.flow.cursor(), state.flow.total_steps()),
                Styles::text(),
            ),
            Span::styled(format!("  {}", section), Styles::text_secondary()),
        ];
        if flow.incentive_total > 0 {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                incentive_badge(state.flow.incentive_unlocked(), flow.incentive_total),
                Styles::incentive(),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), step_area);

        let gauge = Gauge::default()
            .gauge_style(Styles::progress())
            .percent(state.flow.progress_percent().min(100))
            .label(format!("{}%", state.flow.progress_percent()));
        f.render_widget(gauge, gauge_area);
    }
}

/// "Step 3 of 10" for a zero-based cursor
pub fn step_counter(cursor: usize, total: usize) -> String {
    format!("Step {} of {}", cursor + 1, total)
}

/// "$150 unlocked / $500"
pub fn incentive_badge(unlocked: u32, total: u32) -> String {
    format!("${} unlocked / ${}", unlocked, total)
}

/// Render the status message line
pub fn render_status(f: &mut Frame, state: &AppState, area: Rect) {
    let style = if state.status_message.starts_with("Recording") {
        Style::default().fg(Colors::ERROR)
    } else {
        Styles::text_secondary()
    };
    f.render_widget(
        Paragraph::new(Span::styled(state.status_message.clone(), style)),
        area,
    );
}

/// Render the navigation bar
pub fn render_nav_bar(
    f: &mut Frame,
    state: &AppState,
    keybinding_ctx: &KeybindingContext,
    area: Rect,
) {
    let nav_items = if state.editing.is_some() {
        KeybindingContext::editing_nav_items()
    } else {
        keybinding_ctx.get_nav_items(&state.mode)
    };
    NavBar::new(nav_items).render(f, area);
}

/// Render the help overlay
pub fn render_help_overlay(f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
    let help_overlay = HelpOverlay::new(&state.mode, keybinding_ctx);
    help_overlay.render(f, f.area());
}

/// Bordered block used by every panel
pub fn panel(title: &str, active: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(if active {
            Styles::border_active()
        } else {
            Styles::border_inactive()
        })
}
