//! Section sidebar: every section with its status, numbered for jumping

use super::header::HeaderRenderer;
use crate::app::{AppMode, AppState};
use crate::theme::{Styles, Theme};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_sidebar(f: &mut Frame, state: &AppState, header: &HeaderRenderer, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Styles::border_inactive())
        .style(Styles::panel_bg_alt());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [logo_area, _, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(header.logo()), logo_area);
    f.render_widget(Paragraph::new(section_lines(state)), list_area);
}

/// One line per section: jump number (capture only, sections with steps), glyph, name
pub fn section_lines(state: &AppState) -> Vec<Line<'static>> {
    let numbered = state.mode == AppMode::Capture;
    let flow = state.flow.definition();
    state
        .flow
        .section_overview()
        .into_iter()
        .enumerate()
        .map(|(i, (section, status))| {
            let style = Theme::section_style(status);
            // Sections without steps are not jump targets
            let jumpable = flow.section_span(&section.id).is_some();
            let number = if numbered && jumpable && i < 9 {
                format!("{} ", i + 1)
            } else {
                "  ".to_string()
            };
            Line::from(vec![
                Span::styled(number, Styles::text_muted()),
                Span::styled(format!("{} ", Theme::section_glyph(status)), style),
                Span::styled(section.name.clone(), style),
            ])
        })
        .collect()
}
