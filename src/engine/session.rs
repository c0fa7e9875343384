//! Wizard session: the cursor, answers and pending recording of one flow run.
//!
//! # Invariants
//!
//! - `0 <= cursor < steps.len()` at all times (the flow is validated on
//!   construction, so it has at least one step)
//! - Answers are stored with the variant matching their step's kind
//! - At most one recording is pending
//! - A session submits at most once
//!
//! Navigation past either end is reported as [`WizardError::AtBoundary`]
//! in both directions, never silently ignored.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::answers::{Answer, Answers, FileHandle, MediaHandle};
use crate::engine::gate::{FlowGate, OpenGate};
use crate::engine::pending::PendingRecording;
use crate::flow::{FlowDefinition, FlowError, Section, Step};
use crate::submission::{Submission, SubmissionSink};
use crate::types::{Direction, SectionStatus, StepKind, SubmitPolicy};

/// Errors returned by session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Index outside the valid range (cursor or file list)
    #[error("Index {index} is out of range (length {len})")]
    OutOfRange { index: usize, len: usize },

    /// Jump target is not a declared section with at least one step
    #[error("Unknown section '{id}'")]
    UnknownSection { id: String },

    /// No step with this id in the flow
    #[error("Unknown step '{id}'")]
    UnknownStep { id: String },

    /// Navigation past the first or last step
    #[error("Cannot move {direction} from step {cursor} (boundary reached)")]
    AtBoundary { direction: Direction, cursor: usize },

    /// The gate refused to let the cursor leave this step
    #[error("Step '{step}' must be completed before continuing")]
    Blocked { step: String },

    /// Answer variant does not belong to the step's kind
    #[error("Step '{step}' is a {kind} step and cannot hold a {answer} answer")]
    KindMismatch {
        step: String,
        kind: StepKind,
        answer: &'static str,
    },

    /// Submit was requested before reaching the last step
    #[error("Submission is only possible from the final step")]
    NotAtFinalStep,

    /// Submit was requested twice
    #[error("Flow has already been submitted")]
    AlreadySubmitted,

    /// Required steps are still unanswered
    #[error("Required steps are unanswered: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },

    /// The submission sink failed; the session stays unsubmitted
    #[error("Submission failed: {0}")]
    Submission(String),
}

/// Result type for session operations
pub type WizardResult<T> = std::result::Result<T, WizardError>;

fn stored_mismatch(step_id: &str, kind: StepKind, stored: &Answer) -> WizardError {
    WizardError::KindMismatch {
        step: step_id.to_string(),
        kind,
        answer: stored.variant_name(),
    }
}

/// One run through a flow.
///
/// The session owns its flow definition, its answers and its gate; nothing
/// is shared between sessions.
///
/// # Example
///
/// ```
/// use nolly::flows::capture::capture_flow;
/// use nolly::engine::WizardSession;
/// use nolly::types::SectionStatus;
///
/// let mut session = WizardSession::new(capture_flow()).unwrap();
/// assert_eq!(session.cursor(), 0);
///
/// session.jump_to_section("videos").unwrap();
/// assert_eq!(session.cursor(), 8);
/// assert_eq!(session.section_status("issues").unwrap(), SectionStatus::Completed);
/// assert_eq!(session.section_status("review").unwrap(), SectionStatus::Upcoming);
/// ```
#[derive(Debug, Clone)]
pub struct WizardSession<G = OpenGate> {
    flow: FlowDefinition,
    cursor: usize,
    answers: Answers,
    gate: G,
    pending: Option<PendingRecording>,
    next_handle: u64,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl WizardSession<OpenGate> {
    /// Start an ungated session at the first step
    pub fn new(flow: FlowDefinition) -> Result<Self, FlowError> {
        Self::with_gate(flow, OpenGate)
    }
}

impl<G: FlowGate> WizardSession<G> {
    /// Start a session whose forward navigation is decided by `gate`
    pub fn with_gate(flow: FlowDefinition, gate: G) -> Result<Self, FlowError> {
        flow.validate()?;
        info!(flow = %flow.id, steps = flow.len(), "Starting wizard session");

        Ok(Self {
            flow,
            cursor: 0,
            answers: Answers::default(),
            gate,
            pending: None,
            next_handle: 1,
            started_at: Utc::now(),
            submitted_at: None,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn flow(&self) -> &FlowDefinition {
        &self.flow
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn total_steps(&self) -> usize {
        self.flow.len()
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.flow.len()
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Mutable access to the gate's own state (e.g. a form draft)
    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    pub fn pending(&self) -> Option<&PendingRecording> {
        self.pending.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    /// Step under the cursor
    pub fn current_step(&self) -> WizardResult<&Step> {
        self.flow.steps.get(self.cursor).ok_or(WizardError::OutOfRange {
            index: self.cursor,
            len: self.flow.len(),
        })
    }

    /// Section containing the cursor's step
    pub fn current_section(&self) -> Option<&Section> {
        let step = self.current_step().ok()?;
        self.flow.section(&step.section)
    }

    fn step_of(&self, step_id: &str) -> WizardResult<&Step> {
        self.flow.step(step_id).ok_or_else(|| WizardError::UnknownStep {
            id: step_id.to_string(),
        })
    }

    fn step_of_kind(&self, step_id: &str, kind: StepKind, answer: &'static str) -> WizardResult<()> {
        let step = self.step_of(step_id)?;
        if step.kind != kind {
            return Err(WizardError::KindMismatch {
                step: step.id.clone(),
                kind: step.kind,
                answer,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Answers
    // ------------------------------------------------------------------

    /// Record or replace the answer for a step.
    ///
    /// Content is not validated here (an empty text is a valid state); only
    /// the variant has to match the step kind. Returns the previous answer.
    pub fn answer(&mut self, step_id: &str, value: Answer) -> WizardResult<Option<Answer>> {
        let step = self.step_of(step_id)?;
        if !value.fits(step.kind) {
            return Err(WizardError::KindMismatch {
                step: step.id.clone(),
                kind: step.kind,
                answer: value.variant_name(),
            });
        }
        Ok(self.answers.insert(step_id, value))
    }

    /// Select `option` if absent, deselect it if present.
    ///
    /// Options outside the step's predefined list are stored the same way.
    /// Returns whether the option is selected afterwards.
    pub fn toggle_option(&mut self, step_id: &str, option: &str) -> WizardResult<bool> {
        self.step_of_kind(step_id, StepKind::Multiselect, "selection")?;

        let selected = match self.answers.entry(step_id, StepKind::Multiselect) {
            Answer::Selection(selected) => selected,
            other => return Err(stored_mismatch(step_id, StepKind::Multiselect, other)),
        };

        if let Some(pos) = selected.iter().position(|o| o == option) {
            selected.remove(pos);
            Ok(false)
        } else {
            selected.push(option.to_string());
            Ok(true)
        }
    }

    /// Add a user-typed option: trimmed, ignored if blank, then toggled.
    ///
    /// Returns `false` when the input was blank and nothing changed.
    pub fn add_custom_option(&mut self, step_id: &str, raw: &str) -> WizardResult<bool> {
        let option = raw.trim();
        if option.is_empty() {
            self.step_of_kind(step_id, StepKind::Multiselect, "selection")?;
            return Ok(false);
        }
        self.toggle_option(step_id, option)?;
        Ok(true)
    }

    /// Selected options that are not part of the step's predefined list
    pub fn custom_options(&self, step_id: &str) -> Vec<&str> {
        let Some(step) = self.flow.step(step_id) else {
            return Vec::new();
        };
        self.answers
            .selection(step_id)
            .iter()
            .filter(|o| !step.has_option(o))
            .map(String::as_str)
            .collect()
    }

    /// Append a file reference to a file step
    pub fn attach_file(&mut self, step_id: &str, name: impl Into<String>) -> WizardResult<FileHandle> {
        self.step_of_kind(step_id, StepKind::File, "files")?;

        let handle = FileHandle {
            id: self.allocate_handle(),
            name: name.into(),
        };

        let files = match self.answers.entry(step_id, StepKind::File) {
            Answer::Files(files) => files,
            other => return Err(stored_mismatch(step_id, StepKind::File, other)),
        };
        files.push(handle.clone());
        debug!(step = step_id, file = %handle.name, "File attached");

        Ok(handle)
    }

    /// Remove the file at `index` from a file step
    pub fn remove_file(&mut self, step_id: &str, index: usize) -> WizardResult<FileHandle> {
        self.step_of_kind(step_id, StepKind::File, "files")?;

        let files = match self.answers.entry(step_id, StepKind::File) {
            Answer::Files(files) => files,
            other => return Err(stored_mismatch(step_id, StepKind::File, other)),
        };
        if index >= files.len() {
            return Err(WizardError::OutOfRange {
                index,
                len: files.len(),
            });
        }
        Ok(files.remove(index))
    }

    fn allocate_handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Whether the gate lets the cursor leave the current step
    pub fn can_advance(&self) -> bool {
        match self.current_step() {
            Ok(step) => self.gate.allows(step, &self.answers),
            Err(_) => false,
        }
    }

    /// Move to the next step.
    ///
    /// # Errors
    ///
    /// - `AtBoundary` on the last step
    /// - `Blocked` if the gate refuses; the cursor does not move
    pub fn advance(&mut self) -> WizardResult<usize> {
        if self.is_last() {
            return Err(WizardError::AtBoundary {
                direction: Direction::Forward,
                cursor: self.cursor,
            });
        }
        if !self.can_advance() {
            let step = self.current_step()?.id.clone();
            debug!(step = %step, "Advance blocked by gate");
            return Err(WizardError::Blocked { step });
        }

        self.cursor += 1;
        debug!(cursor = self.cursor, "Advanced");
        Ok(self.cursor)
    }

    /// Leave the current step without answering it. Gates still apply.
    pub fn skip(&mut self) -> WizardResult<usize> {
        self.advance()
    }

    /// Move to the previous step
    pub fn retreat(&mut self) -> WizardResult<usize> {
        if self.is_first() {
            return Err(WizardError::AtBoundary {
                direction: Direction::Back,
                cursor: self.cursor,
            });
        }

        self.cursor -= 1;
        debug!(cursor = self.cursor, "Went back");
        Ok(self.cursor)
    }

    /// Move to the first step of a section. Gates do not apply to jumps.
    pub fn jump_to_section(&mut self, section_id: &str) -> WizardResult<usize> {
        let (first, _) = self
            .flow
            .section_span(section_id)
            .ok_or_else(|| WizardError::UnknownSection {
                id: section_id.to_string(),
            })?;

        self.cursor = first;
        debug!(section = section_id, cursor = first, "Jumped to section");
        Ok(first)
    }

    // ------------------------------------------------------------------
    // Derived progress
    // ------------------------------------------------------------------

    /// `(cursor + 1) / total`, in `(0, 1]`
    pub fn progress_fraction(&self) -> f64 {
        (self.cursor + 1) as f64 / self.flow.len() as f64
    }

    /// Progress as a whole percentage, rounded down
    pub fn progress_percent(&self) -> u16 {
        ((self.cursor + 1) * 100 / self.flow.len()) as u16
    }

    /// Incentive unlocked so far: `floor(cursor / total * incentive_total)`.
    ///
    /// Uses the cursor before the current step is counted, so it stays below
    /// the total on every step; the remainder is released on approval.
    pub fn incentive_unlocked(&self) -> u32 {
        let unlocked =
            self.cursor as u64 * u64::from(self.flow.incentive_total) / self.flow.len() as u64;
        unlocked as u32
    }

    /// Status of a section relative to the cursor.
    ///
    /// Follows declaration order: sections ahead of the current one are
    /// `Completed` and the rest are `Upcoming`, so a section without steps
    /// is completed once the cursor has moved past it.
    pub fn section_status(&self, section_id: &str) -> WizardResult<SectionStatus> {
        let index = self.flow.section_index(section_id).ok_or_else(|| {
            WizardError::UnknownSection {
                id: section_id.to_string(),
            }
        })?;
        let current = self
            .current_step()
            .ok()
            .and_then(|step| self.flow.section_index(&step.section))
            .unwrap_or(0);

        let status = match index.cmp(&current) {
            Ordering::Less => SectionStatus::Completed,
            Ordering::Equal => SectionStatus::Current,
            Ordering::Greater => SectionStatus::Upcoming,
        };
        Ok(status)
    }

    /// Every section with its status, in declaration order
    pub fn section_overview(&self) -> Vec<(&Section, SectionStatus)> {
        self.flow
            .sections
            .iter()
            .map(|section| {
                let status = self
                    .section_status(&section.id)
                    .unwrap_or(SectionStatus::Upcoming);
                (section, status)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Simulated recording
    // ------------------------------------------------------------------

    /// Start a simulated recording on a video step.
    ///
    /// Replaces any pending recording and clears the step's previous take.
    pub fn start_recording(&mut self, step_id: &str, now: Instant) -> WizardResult<()> {
        self.step_of_kind(step_id, StepKind::Video, "recording")?;

        if let Some(previous) = self.pending.take() {
            debug!(step = previous.step_id(), "Pending recording superseded");
        }

        self.answers.insert(step_id, Answer::Recording(None));
        self.pending = Some(PendingRecording::new(
            step_id,
            now,
            Duration::from_secs(self.flow.recording_secs),
        ));
        info!(step = step_id, "Recording started");
        Ok(())
    }

    /// True while a recording for `step_id` is pending
    pub fn is_recording(&self, step_id: &str) -> bool {
        self.pending.as_ref().is_some_and(|p| p.step_id() == step_id)
    }

    /// Complete the pending recording if its deadline has passed.
    ///
    /// Returns the new media handle the one time it completes.
    pub fn poll_pending(&mut self, now: Instant) -> Option<MediaHandle> {
        if !self.pending.as_ref().is_some_and(|p| p.is_due(now)) {
            return None;
        }
        let pending = self.pending.take()?;

        let media = MediaHandle {
            id: self.allocate_handle(),
            duration_secs: pending.duration().as_secs(),
        };
        self.answers
            .insert(pending.step_id(), Answer::Recording(Some(media.clone())));
        info!(step = pending.step_id(), media = media.id, "Recording finished");

        Some(media)
    }

    /// Drop the pending recording without completing it
    pub fn cancel_pending(&mut self) -> Option<PendingRecording> {
        let cancelled = self.pending.take();
        if let Some(ref pending) = cancelled {
            debug!(step = pending.step_id(), "Pending recording cancelled");
        }
        cancelled
    }

    /// Discard the step's recording (and any take in progress) so it can be redone
    pub fn rerecord(&mut self, step_id: &str) -> WizardResult<()> {
        self.step_of_kind(step_id, StepKind::Video, "recording")?;

        if self.is_recording(step_id) {
            self.cancel_pending();
        }
        self.answers.insert(step_id, Answer::Recording(None));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Required steps without a satisfied answer, in flow order
    pub fn missing_required(&self) -> Vec<String> {
        self.flow
            .steps
            .iter()
            .filter(|step| step.required)
            .filter(|step| !self.answers.get(&step.id).is_some_and(Answer::is_satisfied))
            .map(|step| step.id.clone())
            .collect()
    }

    /// Hand the answers to `sink`, once, from the final step.
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitted` on a second call
    /// - `NotAtFinalStep` before the last step
    /// - `Blocked` if the gate refuses the last step
    /// - `Incomplete` under `SubmitPolicy::RequireMarked` with required steps missing
    /// - `Submission` if the sink fails (the session can be submitted again)
    pub fn submit<S>(&mut self, sink: &mut S) -> WizardResult<Submission>
    where
        S: SubmissionSink + ?Sized,
    {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if !self.is_last() {
            return Err(WizardError::NotAtFinalStep);
        }
        if !self.can_advance() {
            return Err(WizardError::Blocked {
                step: self.current_step()?.id.clone(),
            });
        }
        if self.flow.submit_policy == SubmitPolicy::RequireMarked {
            let missing = self.missing_required();
            if !missing.is_empty() {
                return Err(WizardError::Incomplete { missing });
            }
        }

        let submission = Submission {
            flow_id: self.flow.id.clone(),
            started_at: self.started_at,
            submitted_at: Utc::now(),
            answers: self.answers.clone(),
            details: self.gate.payload(),
        };

        sink.deliver(&submission)
            .map_err(|e| WizardError::Submission(format!("{:#}", e)))?;

        self.submitted_at = Some(submission.submitted_at);
        info!(flow = %self.flow.id, answers = self.answers.len(), "Flow submitted");
        Ok(submission)
    }
}
