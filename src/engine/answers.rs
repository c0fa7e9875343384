//! Per-step answers.
//!
//! Each step kind maps to exactly one [`Answer`] variant, so a text answer
//! can never end up stored against a video step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::StepKind;

/// Opaque reference to an attached file (no upload happens here)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    pub id: u64,
    pub name: String,
}

/// Opaque reference to a finished recording
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaHandle {
    pub id: u64,
    pub duration_secs: u64,
}

/// Answer to a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// Body of a text, long-text or follow-up step
    Text(String),
    /// Selected options in the order they were picked; may include custom ones
    Selection(Vec<String>),
    /// Attached files in attach order
    Files(Vec<FileHandle>),
    /// `Some` once a recording has finished
    Recording(Option<MediaHandle>),
}

impl Answer {
    /// The blank answer a step of `kind` starts from
    pub fn empty_for(kind: StepKind) -> Self {
        match kind {
            StepKind::Text | StepKind::LongText | StepKind::AiFollowup => {
                Self::Text(String::new())
            }
            StepKind::Multiselect => Self::Selection(Vec::new()),
            StepKind::File => Self::Files(Vec::new()),
            StepKind::Video => Self::Recording(None),
        }
    }

    /// Whether this variant may be stored for a step of `kind`
    pub fn fits(&self, kind: StepKind) -> bool {
        match self {
            Self::Text(_) => kind.is_textual(),
            Self::Selection(_) => kind == StepKind::Multiselect,
            Self::Files(_) => kind == StepKind::File,
            Self::Recording(_) => kind == StepKind::Video,
        }
    }

    /// Whether the answer carries any content (used by completeness checks)
    pub fn is_satisfied(&self) -> bool {
        match self {
            Self::Text(text) => !text.trim().is_empty(),
            Self::Selection(selected) => !selected.is_empty(),
            Self::Files(files) => !files.is_empty(),
            Self::Recording(media) => media.is_some(),
        }
    }

    /// Variant name, as used in error messages
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Selection(_) => "selection",
            Self::Files(_) => "files",
            Self::Recording(_) => "recording",
        }
    }
}

/// Answers keyed by step id.
///
/// Only the engine writes here; readers get typed accessors that fall back
/// to an empty value when a step has not been answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, Answer>);

impl Answers {
    pub fn get(&self, step_id: &str) -> Option<&Answer> {
        self.0.get(step_id)
    }

    pub fn text(&self, step_id: &str) -> Option<&str> {
        match self.0.get(step_id) {
            Some(Answer::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn selection(&self, step_id: &str) -> &[String] {
        match self.0.get(step_id) {
            Some(Answer::Selection(selected)) => selected,
            _ => &[],
        }
    }

    pub fn is_selected(&self, step_id: &str, option: &str) -> bool {
        self.selection(step_id).iter().any(|o| o == option)
    }

    pub fn files(&self, step_id: &str) -> &[FileHandle] {
        match self.0.get(step_id) {
            Some(Answer::Files(files)) => files,
            _ => &[],
        }
    }

    pub fn recording(&self, step_id: &str) -> Option<&MediaHandle> {
        match self.0.get(step_id) {
            Some(Answer::Recording(media)) => media.as_ref(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, step_id: &str, answer: Answer) -> Option<Answer> {
        self.0.insert(step_id.to_string(), answer)
    }

    /// Mutable answer for a step, created blank for `kind` if absent
    pub(crate) fn entry(&mut self, step_id: &str, kind: StepKind) -> &mut Answer {
        self.0
            .entry(step_id.to_string())
            .or_insert_with(|| Answer::empty_for(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_fits_its_kind() {
        for kind in [
            StepKind::Text,
            StepKind::LongText,
            StepKind::Multiselect,
            StepKind::File,
            StepKind::Video,
            StepKind::AiFollowup,
        ] {
            let answer = Answer::empty_for(kind);
            assert!(answer.fits(kind), "{} should fit {}", answer.variant_name(), kind);
            assert!(!answer.is_satisfied());
        }
    }

    #[test]
    fn test_mismatched_variant_does_not_fit() {
        assert!(!Answer::Text("hi".into()).fits(StepKind::Video));
        assert!(!Answer::Selection(vec![]).fits(StepKind::Text));
        assert!(!Answer::Recording(None).fits(StepKind::File));
    }

    #[test]
    fn test_whitespace_text_is_not_satisfied() {
        assert!(!Answer::Text("   \n".into()).is_satisfied());
        assert!(Answer::Text(" x ".into()).is_satisfied());
    }

    #[test]
    fn test_accessors_fall_back_to_empty() {
        let answers = Answers::default();
        assert!(answers.text("1").is_none());
        assert!(answers.selection("1").is_empty());
        assert!(answers.files("1").is_empty());
        assert!(answers.recording("1").is_none());
    }

    #[test]
    fn test_accessors_ignore_other_variants() {
        let mut answers = Answers::default();
        answers.insert("1", Answer::Text("hello".into()));
        assert_eq!(answers.text("1"), Some("hello"));
        assert!(answers.selection("1").is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut answers = Answers::default();
        answers.insert("5", Answer::Selection(vec!["Slack".into()]));
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "5": { "type": "selection", "value": ["Slack"] } })
        );
    }
}
