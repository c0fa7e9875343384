//! Property-based tests for nolly
//!
//! These tests verify:
//! - The cursor never leaves the flow, whatever the navigation sequence
//! - Advance then retreat is the identity away from the boundaries, answers included
//! - Progress never decreases while advancing and reaches 1.0 only on the last step
//! - The incentive stays below the total before submission
//! - Toggling an option twice restores the selection
//! - Enum string round-trips

use proptest::prelude::*;
use strum::IntoEnumIterator;

use nolly::engine::{Answer, WizardSession};
use nolly::flows::capture::{INCENTIVE_TOTAL, SYSTEM_OPTIONS, capture_flow};
use nolly::types::{ReminderFrequency, SectionStatus, StepKind, SubmitPolicy};

// =============================================================================
// Navigation Property Tests
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Nav {
    Advance,
    Retreat,
    Jump(usize),
}

fn nav_strategy() -> impl Strategy<Value = Nav> {
    prop_oneof![
        3 => Just(Nav::Advance),
        2 => Just(Nav::Retreat),
        1 => (0usize..7).prop_map(Nav::Jump),
    ]
}

fn apply(session: &mut WizardSession, nav: Nav) {
    let _ = match nav {
        Nav::Advance => session.advance(),
        Nav::Retreat => session.retreat(),
        Nav::Jump(i) => {
            let id = session.flow().sections[i].id.clone();
            session.jump_to_section(&id)
        }
    };
}

proptest! {
    /// The cursor stays within the flow
    #[test]
    fn cursor_stays_in_bounds(moves in prop::collection::vec(nav_strategy(), 0..60)) {
        let mut session = WizardSession::new(capture_flow()).unwrap();
        for nav in moves {
            apply(&mut session, nav);
            prop_assert!(session.cursor() < session.total_steps());
            prop_assert!(session.current_step().is_ok());
        }
    }

    /// Exactly one section is current at any time
    #[test]
    fn one_current_section(moves in prop::collection::vec(nav_strategy(), 0..40)) {
        let mut session = WizardSession::new(capture_flow()).unwrap();
        for nav in moves {
            apply(&mut session, nav);
            let current = session
                .section_overview()
                .iter()
                .filter(|(_, s)| *s == SectionStatus::Current)
                .count();
            prop_assert_eq!(current, 1);
        }
    }

    /// Advance then retreat returns to the same step and leaves answers untouched
    #[test]
    fn advance_retreat_inverse(start in 0usize..9, text in "[a-z ]{0,12}", pick in 0usize..SYSTEM_OPTIONS.len()) {
        let mut session = WizardSession::new(capture_flow()).unwrap();
        session.answer("1", Answer::Text(text)).unwrap();
        session.toggle_option("5", SYSTEM_OPTIONS[pick]).unwrap();
        for _ in 0..start {
            session.advance().unwrap();
        }
        let answers = session.answers().clone();

        session.advance().unwrap();
        prop_assert_eq!(session.answers(), &answers);
        session.retreat().unwrap();
        prop_assert_eq!(session.cursor(), start);
        prop_assert_eq!(session.answers(), &answers);
    }

    /// Progress and incentive never decrease on advance; incentive stays below the total
    #[test]
    fn progress_is_monotone(steps in 0usize..15) {
        let mut session = WizardSession::new(capture_flow()).unwrap();
        let mut last_fraction = session.progress_fraction();
        let mut last_incentive = session.incentive_unlocked();
        for _ in 0..steps {
            let _ = session.advance();
            prop_assert!(session.progress_fraction() >= last_fraction);
            prop_assert!(session.incentive_unlocked() >= last_incentive);
            prop_assert!(session.incentive_unlocked() < INCENTIVE_TOTAL);
            prop_assert!(session.progress_percent() <= 100);
            if session.is_last() {
                prop_assert_eq!(session.progress_fraction(), 1.0);
            } else {
                prop_assert!(session.progress_fraction() < 1.0);
            }
            last_fraction = session.progress_fraction();
            last_incentive = session.incentive_unlocked();
        }
    }

    /// Toggling the same option twice leaves the selection unchanged
    #[test]
    fn toggle_twice_is_identity(
        picks in prop::collection::vec(0usize..SYSTEM_OPTIONS.len(), 0..6),
        extra in 0usize..SYSTEM_OPTIONS.len(),
    ) {
        let mut session = WizardSession::new(capture_flow()).unwrap();
        for i in picks {
            session.toggle_option("5", SYSTEM_OPTIONS[i]).unwrap();
        }
        let before = session.answers().selection("5").to_vec();

        session.toggle_option("5", SYSTEM_OPTIONS[extra]).unwrap();
        session.toggle_option("5", SYSTEM_OPTIONS[extra]).unwrap();
        let mut after = session.answers().selection("5").to_vec();

        let mut before_sorted = before;
        before_sorted.sort();
        after.sort();
        prop_assert_eq!(before_sorted, after);
    }

    /// Blank custom options never change the selection
    #[test]
    fn blank_custom_option_is_ignored(spaces in "[ \t]{0,8}") {
        let mut session = WizardSession::new(capture_flow()).unwrap();
        prop_assert!(!session.add_custom_option("5", &spaces).unwrap());
        prop_assert!(session.answers().selection("5").is_empty());
    }
}

// =============================================================================
// Enum Round-Trip Tests
// =============================================================================

proptest! {
    /// StepKind: to_string → parse round-trip is identity
    #[test]
    fn step_kind_roundtrip(index in 0usize..6) {
        let kind = StepKind::iter().nth(index).unwrap();
        let parsed: StepKind = kind.to_string().parse().expect("Should parse");
        prop_assert_eq!(kind, parsed);
    }
}

#[test]
fn submit_policy_and_reminder_roundtrip() {
    for policy in SubmitPolicy::iter() {
        assert_eq!(policy.to_string().parse::<SubmitPolicy>().unwrap(), policy);
    }
    for reminder in ReminderFrequency::iter() {
        let json = serde_json::to_string(&reminder).unwrap();
        assert_eq!(serde_json::from_str::<ReminderFrequency>(&json).unwrap(), reminder);
    }
}
