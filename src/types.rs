//! Type-safe tags for flow configuration
//!
//! Step kinds, section statuses and the small enumerations used by the
//! bundled flows. Every enum round-trips through the same kebab-case
//! spelling in JSON (serde) and on the command line (strum).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// What kind of input a step collects.
///
/// The kind decides which [`Answer`](crate::engine::Answer) variant the
/// step may hold and how the front-end renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StepKind {
    /// Short free-text answer
    #[default]
    Text,
    /// Single long-form text answer
    LongText,
    /// Pick any number of options, including user-added ones
    Multiselect,
    /// Attach one or more files
    File,
    /// Record a video walkthrough
    Video,
    /// Follow-up question derived from a previous answer
    AiFollowup,
}

impl StepKind {
    /// True for kinds whose answer is a text body
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::LongText | Self::AiFollowup)
    }

    /// True for follow-up prompts generated from an earlier answer
    pub fn is_followup(self) -> bool {
        self == Self::AiFollowup
    }
}

/// Where a section stands relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SectionStatus {
    /// The cursor has moved past every step of the section
    Completed,
    /// The section contains the cursor
    Current,
    /// Not reached yet (or the section has no steps)
    Upcoming,
}

/// Navigation direction, used in boundary errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Forward,
    Back,
}

/// How strictly a flow checks answers at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SubmitPolicy {
    /// Accept whatever has been answered
    #[default]
    Permissive,
    /// Reject submission while any step marked `required` is unanswered
    RequireMarked,
}

/// How often the recipient of a knowledge request is reminded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReminderFrequency {
    Daily,
    EveryOtherDay,
    #[default]
    Weekly,
    None,
}

impl ReminderFrequency {
    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::EveryOtherDay => "Every Other Day",
            Self::Weekly => "Weekly",
            Self::None => "No Reminders",
        }
    }

    /// Next frequency in display order, wrapping around
    pub fn cycle(self) -> Self {
        match self {
            Self::Daily => Self::EveryOtherDay,
            Self::EveryOtherDay => Self::Weekly,
            Self::Weekly => Self::None,
            Self::None => Self::Daily,
        }
    }
}
