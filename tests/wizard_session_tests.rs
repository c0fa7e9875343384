//! Tests for the wizard session engine
//!
//! These tests verify:
//! - Cursor navigation and boundary behavior
//! - Answer storage per step kind
//! - Section status, progress and incentive derivations
//! - Simulated recordings
//! - Submission policy and sink failures

use std::time::{Duration, Instant};

use anyhow::anyhow;
use nolly::engine::{Answer, RequiredGate, WizardError, WizardSession};
use nolly::flow::{FlowDefinition, Section, Step};
use nolly::flows::capture::{INCENTIVE_TOTAL, capture_flow, capture_wizard};
use nolly::submission::{MemorySink, Submission, SubmissionSink};
use nolly::types::{Direction, SectionStatus, StepKind, SubmitPolicy};

fn mixed_flow() -> FlowDefinition {
    let mut flow = FlowDefinition::new("mixed", "Mixed");
    flow.sections = vec![
        Section::new("words", "Words"),
        Section::new("things", "Things"),
    ];
    flow.steps = vec![
        Step::new("name", StepKind::Text, "Name?", "words").required(),
        Step::new("story", StepKind::LongText, "Story?", "words"),
        Step::new("tools", StepKind::Multiselect, "Tools?", "things").with_options(["Git", "Jira"]),
        Step::new("docs", StepKind::File, "Docs?", "things"),
        Step::new("demo", StepKind::Video, "Demo?", "things"),
    ];
    flow
}

/// Sink that always fails
struct BrokenSink;

impl SubmissionSink for BrokenSink {
    fn deliver(&mut self, _submission: &Submission) -> anyhow::Result<()> {
        Err(anyhow!("disk full"))
    }
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_new_session_starts_at_first_step() {
    let session = capture_wizard().unwrap();
    assert_eq!(session.cursor(), 0);
    assert!(session.is_first());
    assert!(!session.is_last());
    assert_eq!(session.total_steps(), 10);
    assert!(session.answers().is_empty());
}

#[test]
fn test_empty_flow_is_rejected() {
    let flow = FlowDefinition::new("empty", "Empty");
    assert!(WizardSession::new(flow).is_err());
}

#[test]
fn test_advance_walks_to_the_end_then_stops() {
    let mut session = capture_wizard().unwrap();
    for expected in 1..10 {
        assert_eq!(session.advance().unwrap(), expected);
    }
    assert!(session.is_last());

    let err = session.advance().unwrap_err();
    assert_eq!(
        err,
        WizardError::AtBoundary {
            direction: Direction::Forward,
            cursor: 9
        }
    );
    assert_eq!(session.cursor(), 9);
}

#[test]
fn test_retreat_at_first_step_is_a_boundary() {
    let mut session = capture_wizard().unwrap();
    let err = session.retreat().unwrap_err();
    assert!(matches!(
        err,
        WizardError::AtBoundary {
            direction: Direction::Back,
            cursor: 0
        }
    ));
    assert_eq!(session.cursor(), 0);
}

#[test]
fn test_advance_then_retreat_returns_to_same_step() {
    let mut session = capture_wizard().unwrap();
    session
        .answer("1", Answer::Text("Payments team".into()))
        .unwrap();
    session.toggle_option("5", "Stripe Dashboard").unwrap();
    session.jump_to_section("systems").unwrap();
    let before = session.cursor();
    let answers = session.answers().clone();

    session.advance().unwrap();
    session.retreat().unwrap();
    assert_eq!(session.cursor(), before);
    assert_eq!(session.answers(), &answers);
}

#[test]
fn test_required_gate_blocks_until_answered() {
    let mut session = WizardSession::with_gate(mixed_flow(), RequiredGate).unwrap();
    assert!(!session.can_advance());
    assert_eq!(
        session.advance().unwrap_err(),
        WizardError::Blocked {
            step: "name".to_string()
        }
    );
    assert_eq!(session.skip().unwrap_err(), WizardError::Blocked {
        step: "name".to_string()
    });

    session.answer("name", Answer::Text("   ".into())).unwrap();
    assert!(!session.can_advance());

    session.answer("name", Answer::Text("Ada".into())).unwrap();
    assert_eq!(session.advance().unwrap(), 1);
}

#[test]
fn test_closure_gate() {
    let gate = |step: &Step, _: &nolly::engine::Answers| step.id != "story";
    let mut session = WizardSession::with_gate(mixed_flow(), gate).unwrap();
    session.advance().unwrap();
    assert!(session.advance().is_err());
    assert_eq!(session.cursor(), 1);
}

#[test]
fn test_jump_ignores_gates() {
    let mut session = WizardSession::with_gate(mixed_flow(), RequiredGate).unwrap();
    assert_eq!(session.jump_to_section("things").unwrap(), 2);
    assert_eq!(session.current_step().unwrap().id, "tools");
}

#[test]
fn test_jump_to_unknown_or_empty_section() {
    let mut session = capture_wizard().unwrap();
    assert_eq!(
        session.jump_to_section("nope").unwrap_err(),
        WizardError::UnknownSection {
            id: "nope".to_string()
        }
    );
    // The review section has no steps of its own
    assert!(session.jump_to_section("review").is_err());
    assert_eq!(session.cursor(), 0);
}

// =============================================================================
// Answers
// =============================================================================

#[test]
fn test_answer_replaces_and_returns_previous() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    assert_eq!(session.answer("name", Answer::Text("A".into())).unwrap(), None);
    let previous = session.answer("name", Answer::Text("B".into())).unwrap();
    assert_eq!(previous, Some(Answer::Text("A".into())));
    assert_eq!(session.answers().text("name"), Some("B"));
}

#[test]
fn test_answer_kind_mismatch_is_rejected() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    let err = session
        .answer("tools", Answer::Text("Git".into()))
        .unwrap_err();
    assert!(matches!(err, WizardError::KindMismatch { .. }));
    assert!(session.answers().get("tools").is_none());
}

#[test]
fn test_answer_unknown_step() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    assert_eq!(
        session
            .answer("ghost", Answer::Text(String::new()))
            .unwrap_err(),
        WizardError::UnknownStep {
            id: "ghost".to_string()
        }
    );
}

#[test]
fn test_toggle_option_twice_restores_selection() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    assert!(session.toggle_option("tools", "Git").unwrap());
    assert!(session.toggle_option("tools", "Jira").unwrap());
    assert!(!session.toggle_option("tools", "Git").unwrap());
    assert_eq!(session.answers().selection("tools"), ["Jira".to_string()]);
}

#[test]
fn test_custom_options_are_trimmed_and_blank_ignored() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    assert!(!session.add_custom_option("tools", "   ").unwrap());
    assert!(session.add_custom_option("tools", "  Notion ").unwrap());
    session.toggle_option("tools", "Git").unwrap();

    assert_eq!(session.custom_options("tools"), vec!["Notion"]);
    assert!(session.answers().is_selected("tools", "Notion"));
}

#[test]
fn test_options_only_on_multiselect_steps() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    assert!(matches!(
        session.toggle_option("name", "Git").unwrap_err(),
        WizardError::KindMismatch { .. }
    ));
}

#[test]
fn test_files_attach_in_order_and_remove_by_index() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    let a = session.attach_file("docs", "a.pdf").unwrap();
    let b = session.attach_file("docs", "b.png").unwrap();
    assert_ne!(a.id, b.id);

    let removed = session.remove_file("docs", 0).unwrap();
    assert_eq!(removed.name, "a.pdf");
    assert_eq!(session.answers().files("docs").len(), 1);
    assert_eq!(
        session.remove_file("docs", 5).unwrap_err(),
        WizardError::OutOfRange { index: 5, len: 1 }
    );
}

// =============================================================================
// Progress and sections
// =============================================================================

#[test]
fn test_capture_jump_to_videos_scenario() {
    let mut session = capture_wizard().unwrap();
    assert_eq!(session.jump_to_section("videos").unwrap(), 8);

    for id in ["admin", "overview", "contacts", "systems", "issues"] {
        assert_eq!(session.section_status(id).unwrap(), SectionStatus::Completed);
    }
    assert_eq!(
        session.section_status("videos").unwrap(),
        SectionStatus::Current
    );
    assert_eq!(
        session.section_status("review").unwrap(),
        SectionStatus::Upcoming
    );
    assert_eq!(session.progress_percent(), 90);
    assert_eq!(session.incentive_unlocked(), 400);
}

#[test]
fn test_progress_starts_above_zero_and_ends_at_full() {
    let mut session = capture_wizard().unwrap();
    assert_eq!(session.progress_percent(), 10);
    assert!((session.progress_fraction() - 0.1).abs() < f64::EPSILON);

    session.jump_to_section("videos").unwrap();
    session.advance().unwrap();
    assert_eq!(session.progress_percent(), 100);
    assert!((session.progress_fraction() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_incentive_never_reaches_total_before_submission() {
    let mut session = capture_wizard().unwrap();
    assert_eq!(session.incentive_unlocked(), 0);
    while session.advance().is_ok() {}
    assert_eq!(session.incentive_unlocked(), 450);
    assert!(session.incentive_unlocked() < INCENTIVE_TOTAL);
}

#[test]
fn test_section_overview_lists_every_section() {
    let session = capture_wizard().unwrap();
    let overview = session.section_overview();
    assert_eq!(overview.len(), 7);
    assert_eq!(overview[0].1, SectionStatus::Current);
    assert!(overview[1..].iter().all(|(_, s)| *s == SectionStatus::Upcoming));
    assert_eq!(session.current_section().unwrap().id, "admin");
}

#[test]
fn test_section_status_unknown() {
    let session = capture_wizard().unwrap();
    assert!(matches!(
        session.section_status("elsewhere").unwrap_err(),
        WizardError::UnknownSection { .. }
    ));
}

// =============================================================================
// Recording
// =============================================================================

#[test]
fn test_recording_completes_after_deadline() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    let start = Instant::now();
    session.start_recording("demo", start).unwrap();
    assert!(session.is_recording("demo"));
    assert!(session.poll_pending(start + Duration::from_secs(1)).is_none());

    let media = session
        .poll_pending(start + Duration::from_secs(3))
        .unwrap();
    assert_eq!(media.duration_secs, 3);
    assert!(!session.is_recording("demo"));
    assert_eq!(session.answers().recording("demo"), Some(&media));

    // Completes exactly once
    assert!(session.poll_pending(start + Duration::from_secs(10)).is_none());
}

#[test]
fn test_rerecord_discards_previous_take() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    let start = Instant::now();
    session.start_recording("demo", start).unwrap();
    session.poll_pending(start + Duration::from_secs(5)).unwrap();

    session.rerecord("demo").unwrap();
    assert!(session.answers().recording("demo").is_none());
    assert!(!session.is_recording("demo"));
}

#[test]
fn test_recording_rejected_on_non_video_step() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    assert!(matches!(
        session.start_recording("docs", Instant::now()).unwrap_err(),
        WizardError::KindMismatch { .. }
    ));
    assert!(session.pending().is_none());
}

#[test]
fn test_cancel_pending() {
    let mut session = WizardSession::new(mixed_flow()).unwrap();
    session.start_recording("demo", Instant::now()).unwrap();
    assert!(session.cancel_pending().is_some());
    assert!(session.cancel_pending().is_none());
}

// =============================================================================
// Submission
// =============================================================================

#[test]
fn test_submit_requires_final_step() {
    let mut session = capture_wizard().unwrap();
    let mut sink = MemorySink::default();
    assert_eq!(
        session.submit(&mut sink).unwrap_err(),
        WizardError::NotAtFinalStep
    );
    assert!(sink.delivered.is_empty());
}

#[test]
fn test_capture_submit_needs_required_answer() {
    let mut session = capture_wizard().unwrap();
    session.jump_to_section("videos").unwrap();
    session.advance().unwrap();

    let mut sink = MemorySink::default();
    assert_eq!(
        session.submit(&mut sink).unwrap_err(),
        WizardError::Incomplete {
            missing: vec!["1".to_string()]
        }
    );

    session
        .answer("1", Answer::Text("Never rotate the webhook secret on a Friday".into()))
        .unwrap();
    let submission = session.submit(&mut sink).unwrap();
    assert_eq!(submission.flow_id, capture_flow().id);
    assert_eq!(sink.delivered.len(), 1);
    assert!(session.is_submitted());
    assert!(submission.details.is_none());
}

#[test]
fn test_submit_only_once() {
    let mut flow = mixed_flow();
    flow.submit_policy = SubmitPolicy::Permissive;
    let mut session = WizardSession::new(flow).unwrap();
    session.jump_to_section("things").unwrap();
    session.advance().unwrap();
    session.advance().unwrap();

    let mut sink = MemorySink::default();
    session.submit(&mut sink).unwrap();
    assert_eq!(
        session.submit(&mut sink).unwrap_err(),
        WizardError::AlreadySubmitted
    );
    assert_eq!(sink.delivered.len(), 1);
}

#[test]
fn test_sink_failure_leaves_session_open() {
    let mut flow = mixed_flow();
    flow.submit_policy = SubmitPolicy::Permissive;
    let mut session = WizardSession::new(flow).unwrap();
    session.jump_to_section("things").unwrap();
    session.advance().unwrap();
    session.advance().unwrap();

    let err = session.submit(&mut BrokenSink).unwrap_err();
    assert!(matches!(err, WizardError::Submission(ref msg) if msg.contains("disk full")));
    assert!(!session.is_submitted());

    let mut sink = MemorySink::default();
    assert!(session.submit(&mut sink).is_ok());
}
