//! Flow definitions: the static steps and sections a wizard walks through.
//!
//! A [`FlowDefinition`] is configuration. It is built once (in code or from
//! a JSON file), validated, and then handed to a
//! [`WizardSession`](crate::engine::WizardSession) which never mutates it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::{StepKind, SubmitPolicy};

/// Default length of a simulated recording, in seconds
pub const DEFAULT_RECORDING_SECS: u64 = 3;

/// Longest simulated recording a flow may ask for, in seconds
pub const MAX_RECORDING_SECS: u64 = 3600;

fn default_recording_secs() -> u64 {
    DEFAULT_RECORDING_SECS
}

/// Named, contiguous grouping of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One prompt of the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper: Option<String>,
    /// Predefined options (multiselect steps only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub section: String,
    /// Checked at submission when the flow uses `SubmitPolicy::RequireMarked`
    #[serde(default)]
    pub required: bool,
}

impl Step {
    pub fn new(
        id: impl Into<String>,
        kind: StepKind,
        prompt: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            prompt: prompt.into(),
            helper: None,
            options: Vec::new(),
            section: section.into(),
            required: false,
        }
    }

    pub fn with_helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = Some(helper.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// True if `option` is one of the predefined options
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Configuration problems detected when a flow is validated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Flow '{flow}' has no steps")]
    NoSteps { flow: String },

    #[error("Step or section id must not be blank")]
    BlankId,

    #[error("Step id '{id}' is used more than once")]
    DuplicateStep { id: String },

    #[error("Section id '{id}' is declared more than once")]
    DuplicateSection { id: String },

    #[error("Step '{step}' belongs to undeclared section '{section}'")]
    UnknownSection { step: String, section: String },

    #[error("Steps of section '{section}' are not contiguous")]
    SplitSection { section: String },

    #[error("Section '{section}' starts before a section declared ahead of it")]
    SectionOrder { section: String },

    #[error("Step '{step}' is a {kind} step and cannot declare options")]
    UnexpectedOptions { step: String, kind: StepKind },

    #[error("Recording length {secs}s is outside 1..={max}s")]
    RecordingLength { secs: u64, max: u64 },
}

/// Ordered steps grouped into sections, plus flow-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: String,
    pub title: String,
    /// Total incentive (whole currency units) released on approval
    #[serde(default)]
    pub incentive_total: u32,
    #[serde(default)]
    pub submit_policy: SubmitPolicy,
    #[serde(default = "default_recording_secs")]
    pub recording_secs: u64,
    pub sections: Vec<Section>,
    pub steps: Vec<Step>,
}

impl FlowDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            incentive_total: 0,
            submit_policy: SubmitPolicy::default(),
            recording_secs: DEFAULT_RECORDING_SECS,
            sections: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Load a flow from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read flow from {:?}", path.as_ref()))?;

        let flow: Self = serde_json::from_str(&content).context("Failed to parse flow JSON")?;

        Ok(flow)
    }

    /// Save a flow to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize flow to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write flow to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check the structural invariants the engine relies on.
    ///
    /// Sections may be empty, but a section's steps must be contiguous and
    /// sections must appear in declaration order. The recording length is
    /// bounded so a deadline can always be scheduled.
    pub fn validate(&self) -> std::result::Result<(), FlowError> {
        if self.steps.is_empty() {
            return Err(FlowError::NoSteps {
                flow: self.id.clone(),
            });
        }

        if !(1..=MAX_RECORDING_SECS).contains(&self.recording_secs) {
            return Err(FlowError::RecordingLength {
                secs: self.recording_secs,
                max: MAX_RECORDING_SECS,
            });
        }

        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if section.id.trim().is_empty() {
                return Err(FlowError::BlankId);
            }
            if !section_ids.insert(section.id.as_str()) {
                return Err(FlowError::DuplicateSection {
                    id: section.id.clone(),
                });
            }
        }

        let mut step_ids = HashSet::new();
        let mut closed: HashSet<&str> = HashSet::new();
        let mut previous: Option<(&str, usize)> = None;

        for step in &self.steps {
            if step.id.trim().is_empty() {
                return Err(FlowError::BlankId);
            }
            if !step_ids.insert(step.id.as_str()) {
                return Err(FlowError::DuplicateStep {
                    id: step.id.clone(),
                });
            }
            if !step.options.is_empty() && step.kind != StepKind::Multiselect {
                return Err(FlowError::UnexpectedOptions {
                    step: step.id.clone(),
                    kind: step.kind,
                });
            }

            let order = self
                .section_index(&step.section)
                .ok_or_else(|| FlowError::UnknownSection {
                    step: step.id.clone(),
                    section: step.section.clone(),
                })?;

            if let Some((prev_section, prev_order)) = previous {
                if prev_section != step.section {
                    closed.insert(prev_section);
                    if closed.contains(step.section.as_str()) {
                        return Err(FlowError::SplitSection {
                            section: step.section.clone(),
                        });
                    }
                    if order < prev_order {
                        return Err(FlowError::SectionOrder {
                            section: step.section.clone(),
                        });
                    }
                }
            }
            previous = Some((step.section.as_str(), order));
        }

        Ok(())
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Index range (first, last) of the steps in a section, `None` if empty
    pub fn section_span(&self, id: &str) -> Option<(usize, usize)> {
        let first = self.steps.iter().position(|s| s.section == id)?;
        let last = self.steps.iter().rposition(|s| s.section == id)?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_section_flow() -> FlowDefinition {
        let mut flow = FlowDefinition::new("demo", "Demo");
        flow.sections = vec![Section::new("a", "A"), Section::new("b", "B")];
        flow.steps = vec![
            Step::new("1", StepKind::Text, "First?", "a"),
            Step::new("2", StepKind::Text, "Second?", "a"),
            Step::new("3", StepKind::Multiselect, "Third?", "b").with_options(["x", "y"]),
        ];
        flow
    }

    #[test]
    fn test_valid_flow_passes() {
        assert!(two_section_flow().validate().is_ok());
    }

    #[test]
    fn test_empty_flow_rejected() {
        let flow = FlowDefinition::new("empty", "Empty");
        assert!(matches!(flow.validate(), Err(FlowError::NoSteps { .. })));
    }

    #[test]
    fn test_duplicate_step_rejected() {
        let mut flow = two_section_flow();
        flow.steps[1].id = "1".to_string();
        assert_eq!(
            flow.validate(),
            Err(FlowError::DuplicateStep { id: "1".to_string() })
        );
    }

    #[test]
    fn test_undeclared_section_rejected() {
        let mut flow = two_section_flow();
        flow.steps[2].section = "nowhere".to_string();
        assert!(matches!(flow.validate(), Err(FlowError::UnknownSection { .. })));
    }

    #[test]
    fn test_split_section_rejected() {
        let mut flow = two_section_flow();
        flow.steps.push(Step::new("4", StepKind::Text, "Back in a?", "a"));
        assert_eq!(
            flow.validate(),
            Err(FlowError::SplitSection { section: "a".to_string() })
        );
    }

    #[test]
    fn test_out_of_order_sections_rejected() {
        let mut flow = two_section_flow();
        flow.sections.reverse();
        assert!(matches!(flow.validate(), Err(FlowError::SectionOrder { .. })));
    }

    #[test]
    fn test_options_only_on_multiselect() {
        let mut flow = two_section_flow();
        flow.steps[0].options = vec!["nope".to_string()];
        assert!(matches!(flow.validate(), Err(FlowError::UnexpectedOptions { .. })));
    }

    #[test]
    fn test_empty_section_is_allowed() {
        let mut flow = two_section_flow();
        flow.sections.push(Section::new("review", "Review"));
        assert!(flow.validate().is_ok());
        assert_eq!(flow.section_span("review"), None);
        assert_eq!(flow.section_span("a"), Some((0, 1)));
    }

    #[test]
    fn test_recording_length_bounded() {
        let mut flow = two_section_flow();
        flow.recording_secs = 0;
        assert_eq!(
            flow.validate(),
            Err(FlowError::RecordingLength { secs: 0, max: MAX_RECORDING_SECS })
        );

        flow.recording_secs = u64::MAX;
        assert!(matches!(flow.validate(), Err(FlowError::RecordingLength { .. })));

        flow.recording_secs = MAX_RECORDING_SECS;
        assert!(flow.validate().is_ok());
    }

    #[test]
    fn test_json_defaults_fill_missing_fields() {
        let json = r#"{
            "id": "mini",
            "title": "Mini",
            "sections": [{ "id": "s", "name": "S" }],
            "steps": [{ "id": "q", "kind": "long-text", "prompt": "Why?", "section": "s" }]
        }"#;
        let flow: FlowDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(flow.recording_secs, DEFAULT_RECORDING_SECS);
        assert_eq!(flow.submit_policy, SubmitPolicy::Permissive);
        assert!(!flow.steps[0].required);
        assert!(flow.validate().is_ok());
    }
}
