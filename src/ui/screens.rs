//! Step card and confirmation screens
//!
//! The step card shows the prompt of the current step above one list item
//! per [`Row`], in the same order [`AppState::rows`] hands them to the key
//! handler, so the highlighted item is always the one keys act on.

use super::header::panel;
use crate::app::{AppMode, AppState, Row};
use crate::flows::request::SUGGESTED_PROMPTS;
use crate::theme::{Colors, Styles, Theme};
use crate::types::StepKind;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Instant;

// ============================================================================
// Row labels
// ============================================================================

/// Display text of a row, without focus styling
pub fn row_label(state: &AppState, row: &Row) -> String {
    let step_id = state
        .flow
        .current_step()
        .map(|s| s.id.as_str())
        .unwrap_or_default();
    let answers = state.flow.answers();
    let draft = state.flow.draft();

    match row {
        Row::Answer => match answers.text(step_id) {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => "Type your answer here... (e to edit)".to_string(),
        },
        Row::Option(option) => format!(
            "{} {}",
            Theme::checkbox(answers.is_selected(step_id, option)),
            option
        ),
        Row::AddOption => "+ Add other...".to_string(),
        Row::File(index) => answers
            .files(step_id)
            .get(*index)
            .map(|f| format!("  {}", f.name))
            .unwrap_or_default(),
        Row::AddFile => "+ Attach a file (a)".to_string(),
        Row::Record => {
            if state.flow.is_recording(step_id) {
                "● Recording...".to_string()
            } else if let Some(media) = answers.recording(step_id) {
                format!("Recorded {}s walkthrough. Press r to re-record", media.duration_secs)
            } else {
                "Press r to start recording".to_string()
            }
        }
        Row::Search => {
            if state.search.is_empty() {
                "Search by name, role, or department...".to_string()
            } else {
                format!("Search: {}", state.search)
            }
        }
        Row::Person(index) => state
            .people
            .get(*index)
            .map(|p| {
                let chosen = draft
                    .and_then(|d| d.selected_person.as_ref())
                    .is_some_and(|s| s.id == p.id);
                format!(
                    "{} {}  {} · {}",
                    if chosen { "(•)" } else { "( )" },
                    p.name,
                    p.role,
                    p.department
                )
            })
            .unwrap_or_default(),
        Row::ExternalToggle => {
            if draft.is_some_and(|d| d.is_external) {
                "← Back to directory (x)".to_string()
            } else {
                "+ Request from someone outside the directory (x)".to_string()
            }
        }
        Row::ExternalName => field("Full Name", draft.map(|d| d.external_name.as_str())),
        Row::ExternalEmail => field("Email Address", draft.map(|d| d.external_email.as_str())),
        Row::Topic => field("Topic / Project Name", draft.map(|d| d.topic_name.as_str())),
        Row::Description => field("Description", draft.map(|d| d.description.as_str())),
        Row::Prompt(index) => {
            let prompt = SUGGESTED_PROMPTS.get(*index).copied().unwrap_or_default();
            let checked = draft.is_some_and(|d| d.selected_prompts.iter().any(|p| p == prompt));
            format!("{} {}", Theme::checkbox(checked), prompt)
        }
        Row::StandardQuestions => format!(
            "{} Include standard questions",
            Theme::checkbox(draft.is_some_and(|d| d.include_standard_questions))
        ),
        Row::OfferBonus => format!(
            "{} Offer a completion bonus",
            Theme::checkbox(draft.is_some_and(|d| d.offer_bonus))
        ),
        Row::BonusAmount => match draft.and_then(|d| d.bonus_amount) {
            Some(amount) => format!("Bonus Amount: ${}", amount),
            None => "Bonus Amount: (e to set)".to_string(),
        },
        Row::DueDate => match draft.and_then(|d| d.due_date) {
            Some(date) => format!("Due Date: {}", date.format("%B %-d, %Y")),
            None => "Due Date: not set (e to enter YYYY-MM-DD)".to_string(),
        },
        Row::Reminder => format!(
            "Reminders: ◀ {} ▶",
            draft.map(|d| d.reminder.label()).unwrap_or_default()
        ),
    }
}

fn field(label: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("{}: {}", label, v),
        _ => format!("{}: (e to edit)", label),
    }
}

// ============================================================================
// Step card
// ============================================================================

/// Render the current step: prompt, helper, rows and the active input
pub fn render_step(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(step) = state.flow.current_step() else {
        f.render_widget(
            Paragraph::new("This flow has no steps.").block(panel("Empty", false)),
            area,
        );
        return;
    };

    let title = if step.kind.is_followup() {
        "Follow-up"
    } else {
        "Question"
    };
    let block = panel(title, state.editing.is_none());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut prompt_lines = vec![Line::from(vec![
        Span::styled(step.prompt.clone(), Styles::title()),
        Span::styled(
            if step.required { " *" } else { "" },
            Style::default().fg(Colors::ERROR),
        ),
    ])];
    if step.kind.is_followup() {
        prompt_lines.insert(
            0,
            Line::from(Span::styled(
                "Based on your previous answer",
                Style::default().fg(Colors::FOLLOWUP),
            )),
        );
    }
    if let Some(helper) = &step.helper {
        prompt_lines.push(Line::from(Span::styled(helper.clone(), Styles::text_muted())));
    }
    let prompt_height = prompt_lines.len() as u16 + 1;

    let review = review_lines(state);
    let input_height = if state.editing.is_some() { 3 } else { 0 };

    let [prompt_area, rows_area, review_area, input_area] = Layout::vertical([
        Constraint::Length(prompt_height),
        Constraint::Min(3),
        Constraint::Length(review.len() as u16),
        Constraint::Length(input_height),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(prompt_lines).wrap(Wrap { trim: false }),
        prompt_area,
    );
    render_rows(f, state, step.kind, rows_area);
    if !review.is_empty() {
        f.render_widget(Paragraph::new(review), review_area);
    }
    if input_height > 0 {
        render_input(f, state, input_area);
    }
}

fn render_rows(f: &mut Frame, state: &AppState, kind: StepKind, area: Rect) {
    let rows = state.rows();
    let now = Instant::now();

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut label = row_label(state, row);
            if *row == Row::Record {
                if let Some(pending) = state.flow.pending() {
                    label = format!("{} {}s left", label, pending.remaining(now).as_secs());
                }
            }
            let style = match row {
                Row::Answer
                    if state
                        .flow
                        .answers()
                        .text(&step_id(state))
                        .is_none_or(|t| t.trim().is_empty()) =>
                {
                    Styles::text_muted()
                }
                Row::AddOption | Row::AddFile | Row::ExternalToggle => {
                    Style::default().fg(Colors::PRIMARY)
                }
                Row::Record if state.flow.pending().is_some() => Style::default().fg(Colors::ERROR),
                _ => Styles::text(),
            };
            ListItem::new(Text::from(label)).style(style)
        })
        .collect();

    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(state.row.min(rows.len() - 1)));
    }

    let list = List::new(items)
        .highlight_style(Styles::selected())
        .highlight_symbol(if kind == StepKind::Multiselect { "› " } else { "> " });
    f.render_stateful_widget(list, area, &mut list_state);
}

fn step_id(state: &AppState) -> String {
    state
        .flow
        .current_step()
        .map(|s| s.id.clone())
        .unwrap_or_default()
}

/// Review summary shown on the request flow's last step
fn review_lines(state: &AppState) -> Vec<Line<'static>> {
    let (Some(draft), true) = (state.flow.draft(), state.flow.is_last()) else {
        return Vec::new();
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Review",
            Style::default()
                .fg(Colors::SUCCESS)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(draft.summary().into_iter().map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", label), Styles::text_secondary()),
            Span::styled(value, Styles::text()),
        ])
    }));
    lines
}

fn render_input(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(editing) = &state.editing else {
        return;
    };
    let input = &editing.input;
    let content = if input.value.is_empty() {
        Line::from(Span::styled(input.placeholder.clone(), Styles::text_muted()))
    } else {
        Line::from(vec![
            Span::styled(input.value.clone(), Styles::text()),
            Span::styled("█", Style::default().fg(Colors::PRIMARY)),
        ])
    };
    f.render_widget(
        Paragraph::new(content).block(panel(&input.field_name, true)),
        area,
    );
}

// ============================================================================
// Confirmation
// ============================================================================

/// Lines of the confirmation screen shown after a successful submit
pub fn submitted_lines(state: &AppState) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "✓ Submitted",
            Style::default()
                .fg(Colors::SUCCESS)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match (state.mode, state.flow.draft()) {
        (AppMode::Submitted, Some(draft)) => {
            lines.push(Line::from(format!(
                "Your request was sent to {}.",
                draft.recipient_name().unwrap_or("the recipient")
            )));
            lines.push(Line::from(""));
            lines.extend(draft.summary().into_iter().map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", label), Styles::text_secondary()),
                    Span::styled(value, Styles::text()),
                ])
            }));
        }
        _ => {
            let flow = state.flow.definition();
            lines.push(Line::from(format!(
                "Thank you for documenting {}.",
                flow.title
            )));
            lines.push(Line::from(format!(
                "{} of {} steps answered.",
                state.flow.answers().len(),
                state.flow.total_steps()
            )));
            if flow.incentive_total > 0 {
                lines.push(Line::from(Span::styled(
                    format!("${} incentive unlocked", flow.incentive_total),
                    Styles::incentive(),
                )));
            }
        }
    }

    if let Some(submission) = &state.submission {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Submitted at {}",
                submission.submitted_at.format("%Y-%m-%d %H:%M UTC")
            ),
            Styles::text_muted(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press Enter to exit", Styles::nav_hint())));
    lines
}

pub fn render_submitted(f: &mut Frame, state: &AppState, area: Rect) {
    f.render_widget(
        Paragraph::new(submitted_lines(state))
            .block(panel("Done", true))
            .wrap(Wrap { trim: false }),
        area,
    );
}
