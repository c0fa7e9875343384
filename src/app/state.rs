//! Application state definitions
//!
//! Contains the state the terminal front-end renders from, and the key
//! handling that turns key presses into wizard operations. Nothing here
//! touches the terminal, so the whole interaction can be driven from tests.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::{debug, warn};

use crate::engine::{
    Answer, Answers, MediaHandle, PendingRecording, WizardError, WizardResult, WizardSession,
};
use crate::flow::{FlowDefinition, Section, Step};
use crate::flows::request::{
    self, Person, RequestDraft, RequestWizard, STEP_INCENTIVE, STEP_PERSON, STEP_TIMELINE,
    STEP_TOPIC, SUGGESTED_PROMPTS,
};
use crate::input::{InputResult, TextInput};
use crate::submission::{Submission, SubmissionSink};
use crate::types::{SectionStatus, StepKind};

/// Date format accepted by the due date field
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Application operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// Knowledge capture interview
    Capture,
    /// Knowledge request form
    Request,
    /// Flow submitted, showing the confirmation
    Submitted,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    /// Hand the flow to the submission sink
    Submit,
}

/// The wizard being driven
#[derive(Debug)]
pub enum ActiveFlow {
    Capture(WizardSession),
    Request(RequestWizard),
}

macro_rules! with_session {
    ($flow:expr, $session:ident => $body:expr) => {
        match $flow {
            ActiveFlow::Capture($session) => $body,
            ActiveFlow::Request($session) => $body,
        }
    };
}

impl ActiveFlow {
    pub fn definition(&self) -> &FlowDefinition {
        with_session!(self, s => s.flow())
    }

    pub fn cursor(&self) -> usize {
        with_session!(self, s => s.cursor())
    }

    pub fn total_steps(&self) -> usize {
        with_session!(self, s => s.total_steps())
    }

    pub fn current_step(&self) -> Option<&Step> {
        with_session!(self, s => s.current_step().ok())
    }

    pub fn is_first(&self) -> bool {
        with_session!(self, s => s.is_first())
    }

    pub fn is_last(&self) -> bool {
        with_session!(self, s => s.is_last())
    }

    pub fn can_advance(&self) -> bool {
        with_session!(self, s => s.can_advance())
    }

    pub fn answers(&self) -> &Answers {
        with_session!(self, s => s.answers())
    }

    pub fn progress_percent(&self) -> u16 {
        with_session!(self, s => s.progress_percent())
    }

    pub fn progress_fraction(&self) -> f64 {
        with_session!(self, s => s.progress_fraction())
    }

    pub fn incentive_unlocked(&self) -> u32 {
        with_session!(self, s => s.incentive_unlocked())
    }

    pub fn section_overview(&self) -> Vec<(&Section, SectionStatus)> {
        with_session!(self, s => s.section_overview())
    }

    pub fn is_recording(&self, step_id: &str) -> bool {
        with_session!(self, s => s.is_recording(step_id))
    }

    pub fn pending(&self) -> Option<&PendingRecording> {
        with_session!(self, s => s.pending())
    }

    fn advance(&mut self) -> WizardResult<usize> {
        with_session!(self, s => s.advance())
    }

    fn skip(&mut self) -> WizardResult<usize> {
        with_session!(self, s => s.skip())
    }

    fn retreat(&mut self) -> WizardResult<usize> {
        with_session!(self, s => s.retreat())
    }

    fn poll_pending(&mut self, now: Instant) -> Option<MediaHandle> {
        with_session!(self, s => s.poll_pending(now))
    }

    fn submit<S: SubmissionSink + ?Sized>(&mut self, sink: &mut S) -> WizardResult<Submission> {
        with_session!(self, s => s.submit(sink))
    }

    /// The request form, when this is the request flow
    pub fn draft(&self) -> Option<&RequestDraft> {
        match self {
            Self::Request(wizard) => Some(wizard.gate()),
            Self::Capture(_) => None,
        }
    }
}

/// A focusable line of the current step's card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Text answer of a text, long-text or follow-up step
    Answer,
    /// Predefined or custom option of a multiselect step
    Option(String),
    AddOption,
    /// Attached file by position
    File(usize),
    AddFile,
    Record,
    Search,
    /// Directory person by index into [`AppState::people`]
    Person(usize),
    ExternalToggle,
    ExternalName,
    ExternalEmail,
    Topic,
    Description,
    /// Suggested prompt by index into [`SUGGESTED_PROMPTS`]
    Prompt(usize),
    StandardQuestions,
    OfferBonus,
    BonusAmount,
    DueDate,
    Reminder,
}

impl Row {
    /// Rows that open a text input on `e`/`Enter`
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Self::Answer
                | Self::AddOption
                | Self::AddFile
                | Self::Search
                | Self::ExternalName
                | Self::ExternalEmail
                | Self::Topic
                | Self::Description
                | Self::BonusAmount
                | Self::DueDate
        )
    }
}

/// Text input bound to the row it edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editing {
    pub row: Row,
    pub input: TextInput,
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,
    pub flow: ActiveFlow,
    /// Focused row of the current step
    pub row: usize,
    /// Active text input, if any
    pub editing: Option<Editing>,
    /// Status message for user feedback
    pub status_message: String,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Directory shown on the request flow's person step
    pub people: Vec<Person>,
    pub search: String,
    /// Set once the flow has been submitted
    pub submission: Option<Submission>,
    /// Reference date for due date validation
    pub today: NaiveDate,
}

impl AppState {
    pub fn capture(session: WizardSession, today: NaiveDate) -> Self {
        Self::new(AppMode::Capture, ActiveFlow::Capture(session), today)
    }

    pub fn request(wizard: RequestWizard, today: NaiveDate) -> Self {
        Self::new(AppMode::Request, ActiveFlow::Request(wizard), today)
    }

    fn new(mode: AppMode, flow: ActiveFlow, today: NaiveDate) -> Self {
        Self {
            mode,
            flow,
            row: 0,
            editing: None,
            status_message: "Press ? for help".to_string(),
            help_visible: false,
            people: request::directory(),
            search: String::new(),
            submission: None,
            today,
        }
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Focusable rows of the current step, top to bottom
    pub fn rows(&self) -> Vec<Row> {
        let Some(step) = self.flow.current_step() else {
            return Vec::new();
        };
        match &self.flow {
            ActiveFlow::Capture(session) => capture_rows(step, session.answers()),
            ActiveFlow::Request(wizard) => {
                request_rows(&step.id, wizard.gate(), &self.people, &self.search)
            }
        }
    }

    pub fn focused_row(&self) -> Option<Row> {
        let rows = self.rows();
        let last = rows.len().checked_sub(1)?;
        rows.into_iter().nth(self.row.min(last))
    }

    fn clamp_row(&mut self) {
        let len = self.rows().len();
        self.row = self.row.min(len.saturating_sub(1));
    }

    fn focus(&mut self, row: &Row) {
        if let Some(index) = self.rows().iter().position(|r| r == row) {
            self.row = index;
        }
    }

    fn current_step_id(&self) -> Option<String> {
        self.flow.current_step().map(|s| s.id.clone())
    }

    fn draft_mut(&mut self) -> Option<&mut RequestDraft> {
        match &mut self.flow {
            ActiveFlow::Request(wizard) => Some(wizard.gate_mut()),
            ActiveFlow::Capture(_) => None,
        }
    }

    fn report<T>(&mut self, result: WizardResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "Wizard operation rejected");
                self.status_message = e.to_string();
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// Complete a pending recording whose time is up
    pub fn tick(&mut self, now: Instant) {
        if let Some(media) = self.flow.poll_pending(now) {
            self.status_message = format!("Recording saved ({}s)", media.duration_secs);
        }
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        if self.help_visible {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.help_visible = false;
            }
            return KeyOutcome::Continue;
        }

        if let Some(editing) = self.editing.as_mut() {
            match editing.input.handle_input(key) {
                InputResult::Confirm(value) => {
                    let row = editing.row.clone();
                    self.editing = None;
                    self.commit_input(row, value);
                }
                InputResult::Cancel => {
                    self.editing = None;
                    self.status_message = "Edit cancelled".to_string();
                }
                InputResult::Continue => {}
            }
            return KeyOutcome::Continue;
        }

        if self.mode == AppMode::Submitted {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => KeyOutcome::Quit,
                _ => KeyOutcome::Continue,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('s') if ctrl => {
                let result = self.flow.skip();
                self.after_navigation(result);
            }
            KeyCode::Char('?') => self.help_visible = true,
            KeyCode::Tab | KeyCode::Right => {
                let result = self.flow.advance();
                self.after_navigation(result);
            }
            KeyCode::BackTab | KeyCode::Left => {
                let result = self.flow.retreat();
                self.after_navigation(result);
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                self.row += 1;
                self.clamp_row();
            }
            KeyCode::Char(' ') => self.toggle_focused(),
            KeyCode::Enter if self.flow.is_last() => return KeyOutcome::Submit,
            KeyCode::Enter | KeyCode::Char('e') => self.start_editing(),
            KeyCode::Char('r') => self.record(now),
            KeyCode::Char('a') => {
                self.focus(&Row::AddFile);
                if self.focused_row() == Some(Row::AddFile) {
                    self.start_editing();
                }
            }
            KeyCode::Char('d') => self.remove_focused_file(),
            KeyCode::Char('x') => self.toggle_external(),
            KeyCode::Char(c @ '1'..='9') => {
                let n = c as usize - '1' as usize;
                self.jump_to_section(n);
            }
            _ => {}
        }

        KeyOutcome::Continue
    }

    fn after_navigation(&mut self, result: WizardResult<usize>) {
        if self.report(result).is_some() {
            self.row = 0;
            self.status_message.clear();
        }
    }

    fn jump_to_section(&mut self, index: usize) {
        let ActiveFlow::Capture(session) = &mut self.flow else {
            return;
        };
        let Some(section) = session.flow().sections.get(index) else {
            return;
        };
        let id = section.id.clone();
        let result = session.jump_to_section(&id);
        self.after_navigation(result);
    }

    fn toggle_focused(&mut self) {
        let Some(row) = self.focused_row() else {
            return;
        };

        match row {
            Row::Option(option) => {
                if let (Some(step_id), ActiveFlow::Capture(session)) =
                    (self.current_step_id(), &mut self.flow)
                {
                    let result = session.toggle_option(&step_id, &option);
                    self.report(result);
                }
            }
            Row::Person(index) => {
                if let Some(person) = self.people.get(index).cloned() {
                    self.status_message = format!("Selected {}", person.name);
                    if let Some(draft) = self.draft_mut() {
                        draft.select_person(person);
                    }
                }
            }
            Row::ExternalToggle => self.toggle_external(),
            Row::Prompt(index) => {
                if let (Some(prompt), Some(draft)) = (SUGGESTED_PROMPTS.get(index), self.draft_mut())
                {
                    draft.toggle_prompt(prompt);
                }
            }
            Row::StandardQuestions => {
                if let Some(draft) = self.draft_mut() {
                    draft.include_standard_questions = !draft.include_standard_questions;
                }
            }
            Row::OfferBonus => {
                if let Some(draft) = self.draft_mut() {
                    draft.offer_bonus = !draft.offer_bonus;
                }
            }
            Row::Reminder => {
                if let Some(draft) = self.draft_mut() {
                    draft.reminder = draft.reminder.cycle();
                }
            }
            _ => {}
        }
        self.clamp_row();
    }

    fn toggle_external(&mut self) {
        let on_person_step = self.current_step_id().as_deref() == Some(STEP_PERSON);
        let Some(draft) = self.draft_mut() else {
            return;
        };
        if !on_person_step {
            return;
        }
        if draft.is_external {
            draft.cancel_external_person();
        } else {
            draft.use_external_person();
        }
        self.row = 0;
    }

    fn record(&mut self, now: Instant) {
        let Some(step_id) = self.current_step_id() else {
            return;
        };
        let ActiveFlow::Capture(session) = &mut self.flow else {
            return;
        };
        if session.flow().step(&step_id).map(|s| s.kind) != Some(StepKind::Video) {
            return;
        }

        if session.is_recording(&step_id) {
            self.status_message = "Recording...".to_string();
        } else if session.answers().recording(&step_id).is_some() {
            let result = session.rerecord(&step_id);
            if self.report(result).is_some() {
                self.status_message = "Recording discarded, press r to record again".to_string();
            }
        } else {
            let result = session.start_recording(&step_id, now);
            if self.report(result).is_some() {
                self.status_message = "Recording...".to_string();
            }
        }
    }

    fn remove_focused_file(&mut self) {
        let Some(Row::File(index)) = self.focused_row() else {
            return;
        };
        let Some(step_id) = self.current_step_id() else {
            return;
        };
        if let ActiveFlow::Capture(session) = &mut self.flow {
            let result = session.remove_file(&step_id, index);
            if let Some(file) = self.report(result) {
                self.status_message = format!("Removed {}", file.name);
            }
        }
        self.clamp_row();
    }

    // ------------------------------------------------------------------
    // Text input
    // ------------------------------------------------------------------

    fn start_editing(&mut self) {
        let Some(row) = self.focused_row() else {
            return;
        };
        if !row.is_editable() {
            return;
        }

        let step_id = self.current_step_id().unwrap_or_default();
        let draft = self.flow.draft();
        let input = match &row {
            Row::Answer => TextInput::new(
                "Answer",
                self.flow.answers().text(&step_id).unwrap_or_default(),
            )
            .with_placeholder("Type your answer here..."),
            Row::AddOption => TextInput::new("Add other", "").with_placeholder("Add other..."),
            Row::AddFile => TextInput::new("File name", "").with_placeholder("runbook.pdf"),
            Row::Search => TextInput::new("Search", self.search.as_str())
                .with_placeholder("Search by name, role, or department..."),
            Row::ExternalName => TextInput::new(
                "Full Name",
                draft.map(|d| d.external_name.as_str()).unwrap_or_default(),
            )
            .with_placeholder("John Doe"),
            Row::ExternalEmail => TextInput::new(
                "Email Address",
                draft.map(|d| d.external_email.as_str()).unwrap_or_default(),
            )
            .with_placeholder("contractor@example.com"),
            Row::Topic => TextInput::new(
                "Topic / Project Name",
                draft.map(|d| d.topic_name.as_str()).unwrap_or_default(),
            )
            .with_placeholder("e.g., Payment Gateway Integration"),
            Row::Description => TextInput::new(
                "What do you need documented?",
                draft.map(|d| d.description.as_str()).unwrap_or_default(),
            )
            .with_placeholder("Describe the specific knowledge you need captured..."),
            Row::BonusAmount => TextInput::new(
                "Bonus Amount ($)",
                draft
                    .and_then(|d| d.bonus_amount)
                    .map(|a| a.to_string())
                    .unwrap_or_default(),
            )
            .with_placeholder("500"),
            Row::DueDate => TextInput::new(
                "Due Date",
                draft
                    .and_then(|d| d.due_date)
                    .map(|d| d.format(DATE_INPUT_FORMAT).to_string())
                    .unwrap_or_default(),
            )
            .with_placeholder("YYYY-MM-DD"),
            _ => return,
        };

        self.editing = Some(Editing { row, input });
    }

    fn commit_input(&mut self, row: Row, value: String) {
        let step_id = self.current_step_id().unwrap_or_default();
        let today = self.today;

        match row {
            Row::Answer | Row::AddOption | Row::AddFile => {
                let ActiveFlow::Capture(session) = &mut self.flow else {
                    return;
                };
                match row {
                    Row::Answer => {
                        let result = session.answer(&step_id, Answer::Text(value));
                        self.report(result);
                    }
                    Row::AddOption => {
                        let result = session.add_custom_option(&step_id, &value);
                        self.report(result);
                    }
                    _ => {
                        let name = value.trim();
                        if !name.is_empty() {
                            let result = session.attach_file(&step_id, name);
                            if let Some(file) = self.report(result) {
                                self.status_message = format!("Attached {}", file.name);
                            }
                        }
                    }
                }
            }
            Row::Search => {
                self.search = value;
                self.row = 0;
            }
            Row::BonusAmount => {
                let result = self.draft_mut().map(|d| d.set_bonus_amount(&value));
                if let Some(Err(e)) = result {
                    self.status_message = e.to_string();
                }
            }
            Row::DueDate => match NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT) {
                Ok(date) => {
                    let result = self.draft_mut().map(|d| d.set_due_date(date, today));
                    if let Some(Err(e)) = result {
                        self.status_message = e.to_string();
                    }
                }
                Err(_) => {
                    self.status_message = "Enter the due date as YYYY-MM-DD".to_string();
                }
            },
            Row::ExternalName | Row::ExternalEmail | Row::Topic | Row::Description => {
                if let Some(draft) = self.draft_mut() {
                    let field = match row {
                        Row::ExternalName => &mut draft.external_name,
                        Row::ExternalEmail => &mut draft.external_email,
                        Row::Topic => &mut draft.topic_name,
                        _ => &mut draft.description,
                    };
                    *field = value;
                }
            }
            _ => {}
        }
        self.clamp_row();
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Submit the flow. Failures stay on screen and the flow can be resubmitted.
    pub fn submit<S: SubmissionSink + ?Sized>(&mut self, sink: &mut S) {
        match self.flow.submit(sink) {
            Ok(submission) => {
                self.submission = Some(submission);
                self.mode = AppMode::Submitted;
                self.status_message = "Submitted".to_string();
            }
            Err(e) => {
                if matches!(e, WizardError::Submission(_)) {
                    warn!(error = %e, "Submission failed");
                }
                self.status_message = e.to_string();
            }
        }
    }
}

fn capture_rows(step: &Step, answers: &Answers) -> Vec<Row> {
    match step.kind {
        StepKind::Text | StepKind::LongText | StepKind::AiFollowup => vec![Row::Answer],
        StepKind::Multiselect => {
            let custom = answers
                .selection(&step.id)
                .iter()
                .filter(|o| !step.has_option(o))
                .cloned();
            step.options
                .iter()
                .cloned()
                .chain(custom)
                .map(Row::Option)
                .chain(std::iter::once(Row::AddOption))
                .collect()
        }
        StepKind::File => (0..answers.files(&step.id).len())
            .map(Row::File)
            .chain(std::iter::once(Row::AddFile))
            .collect(),
        StepKind::Video => vec![Row::Record],
    }
}

fn request_rows(step_id: &str, draft: &RequestDraft, people: &[Person], query: &str) -> Vec<Row> {
    match step_id {
        STEP_PERSON if draft.is_external => {
            vec![Row::ExternalName, Row::ExternalEmail, Row::ExternalToggle]
        }
        STEP_PERSON => {
            let hits = request::search(people, query);
            let matching = people
                .iter()
                .enumerate()
                .filter(|(_, p)| hits.iter().any(|hit| hit.id == p.id))
                .map(|(index, _)| Row::Person(index));
            std::iter::once(Row::Search)
                .chain(matching)
                .chain(std::iter::once(Row::ExternalToggle))
                .collect()
        }
        STEP_TOPIC => [Row::Topic, Row::Description]
            .into_iter()
            .chain((0..SUGGESTED_PROMPTS.len()).map(Row::Prompt))
            .chain(std::iter::once(Row::StandardQuestions))
            .collect(),
        STEP_INCENTIVE if draft.offer_bonus => vec![Row::OfferBonus, Row::BonusAmount],
        STEP_INCENTIVE => vec![Row::OfferBonus],
        STEP_TIMELINE => vec![Row::DueDate, Row::Reminder],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::capture::capture_wizard;
    use crate::flows::request::request_wizard;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_capture_rows_per_kind() {
        let mut state = AppState::capture(capture_wizard().unwrap(), today());
        assert_eq!(state.rows(), vec![Row::Answer]);

        if let ActiveFlow::Capture(session) = &mut state.flow {
            session.jump_to_section("systems").unwrap();
            session.add_custom_option("5", "Notion").unwrap();
        }
        let rows = state.rows();
        assert_eq!(rows.len(), 8 + 1 + 1);
        assert_eq!(rows[8], Row::Option("Notion".to_string()));
        assert_eq!(rows[9], Row::AddOption);
    }

    #[test]
    fn test_request_person_rows_follow_search() {
        let mut state = AppState::request(request_wizard().unwrap(), today());
        assert_eq!(state.rows().len(), 1 + 5 + 1);

        state.search = "engineer".to_string();
        assert_eq!(
            state.rows(),
            vec![Row::Search, Row::Person(0), Row::ExternalToggle]
        );
    }

    #[test]
    fn test_focused_row_is_clamped() {
        let mut state = AppState::capture(capture_wizard().unwrap(), today());
        state.row = 42;
        assert_eq!(state.focused_row(), Some(Row::Answer));
    }
}
