//! Centralized theme and styling for the TUI
//!
//! Single source of truth for the colors and styles used by the renderers.
//!
//! # Usage
//! ```rust
//! use nolly::theme::{Colors, Styles, Theme};
//! use nolly::types::SectionStatus;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let glyph = Theme::section_glyph(SectionStatus::Completed);
//! ```

use ratatui::style::{Color, Modifier, Style};

use crate::types::SectionStatus;

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    /// Primary dark background - used for panels and the help overlay
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Sidebar background
    pub const BG_SECONDARY: Color = Color::Rgb(30, 30, 40);

    /// Gauge/progress bar background
    pub const BG_GAUGE: Color = Color::Rgb(40, 40, 50);

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Primary accent color - used for borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color - used for selected items, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    /// Success/positive feedback
    pub const SUCCESS: Color = Color::Green;

    /// Warning feedback and the incentive badge
    pub const WARNING: Color = Color::Yellow;

    /// Error feedback and the recording indicator
    pub const ERROR: Color = Color::Red;

    /// Active panel border
    pub const BORDER_ACTIVE: Color = Color::Cyan;

    /// Inactive panel border
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Selected item background
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Selected item foreground
    pub const SELECTED_FG: Color = Color::Black;

    /// Progress bar fill
    pub const PROGRESS: Color = Color::Green;

    /// Nav bar key hints
    pub const NAV_HINT: Color = Color::DarkGray;

    /// Follow-up question badge
    pub const FOLLOWUP: Color = Color::Magenta;
}

// =============================================================================
// STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Muted/secondary text
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Secondary text (gray)
    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style (cyan, bold)
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Active border style
    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    /// Inactive border style
    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    /// Panel background
    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    /// Sidebar background
    pub fn panel_bg_alt() -> Style {
        Style::default().bg(Colors::BG_SECONDARY)
    }

    /// Selected/highlighted item
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Success message style
    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    /// Error message style
    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    /// Progress bar style
    pub fn progress() -> Style {
        Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE)
    }

    /// Incentive badge
    pub fn incentive() -> Style {
        Style::default()
            .fg(Colors::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Nav bar hint style
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// SEMANTIC LOOKUPS
// =============================================================================

/// Style lookups keyed by domain state
pub struct Theme;

impl Theme {
    /// Sidebar entry style for a section status
    pub fn section_style(status: SectionStatus) -> Style {
        match status {
            SectionStatus::Completed => Style::default().fg(Colors::SUCCESS),
            SectionStatus::Current => Style::default()
                .fg(Colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
            SectionStatus::Upcoming => Style::default().fg(Colors::FG_SECONDARY),
        }
    }

    /// Sidebar glyph for a section status
    pub fn section_glyph(status: SectionStatus) -> &'static str {
        match status {
            SectionStatus::Completed => "✓",
            SectionStatus::Current => "▶",
            SectionStatus::Upcoming => "○",
        }
    }

    /// Checkbox glyph
    pub fn checkbox(checked: bool) -> &'static str {
        if checked { "[x]" } else { "[ ]" }
    }
}
