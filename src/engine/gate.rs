//! Advance gates: per-step predicates deciding whether the cursor may move on.

use crate::engine::answers::Answers;
use crate::flow::Step;

/// Decides whether the wizard may leave `step`.
///
/// A gate is owned by its session, so a flow can keep extra form state in
/// the gate itself (see [`RequestDraft`](crate::flows::request::RequestDraft)).
/// Closures `Fn(&Step, &Answers) -> bool` are gates too.
pub trait FlowGate {
    fn allows(&self, step: &Step, answers: &Answers) -> bool;

    /// Flow-specific state attached to the submission, if any
    fn payload(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Gate that never blocks; the capture flow's Continue and Skip are always enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenGate;

impl FlowGate for OpenGate {
    fn allows(&self, _step: &Step, _answers: &Answers) -> bool {
        true
    }
}

/// Gate that blocks on steps marked `required` until they hold a real answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredGate;

impl FlowGate for RequiredGate {
    fn allows(&self, step: &Step, answers: &Answers) -> bool {
        !step.required || answers.get(&step.id).is_some_and(|a| a.is_satisfied())
    }
}

impl<F> FlowGate for F
where
    F: Fn(&Step, &Answers) -> bool,
{
    fn allows(&self, step: &Step, answers: &Answers) -> bool {
        self(step, answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::answers::Answer;
    use crate::types::StepKind;

    #[test]
    fn test_open_gate_always_allows() {
        let step = Step::new("1", StepKind::Text, "?", "s").required();
        assert!(OpenGate.allows(&step, &Answers::default()));
    }

    #[test]
    fn test_required_gate_waits_for_content() {
        let step = Step::new("1", StepKind::Text, "?", "s").required();
        let mut answers = Answers::default();
        assert!(!RequiredGate.allows(&step, &answers));

        answers.insert("1", Answer::Text("  ".into()));
        assert!(!RequiredGate.allows(&step, &answers));

        answers.insert("1", Answer::Text("done".into()));
        assert!(RequiredGate.allows(&step, &answers));
    }

    #[test]
    fn test_required_gate_ignores_optional_steps() {
        let step = Step::new("1", StepKind::Video, "?", "s");
        assert!(RequiredGate.allows(&step, &Answers::default()));
    }

    #[test]
    fn test_closure_gate() {
        let gate = |step: &Step, _: &Answers| step.kind != StepKind::Video;
        assert!(gate.allows(&Step::new("1", StepKind::Text, "?", "s"), &Answers::default()));
        assert!(!gate.allows(&Step::new("2", StepKind::Video, "?", "s"), &Answers::default()));
    }
}
