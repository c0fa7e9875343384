//! Knowledge request form.
//!
//! Four steps (person, topic, incentive, timeline). The form state lives in
//! [`RequestDraft`], which is also the session's gate: each step may only be
//! left once its part of the draft is filled in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::engine::{Answers, FlowGate, WizardSession};
use crate::flow::{FlowDefinition, FlowError, Section, Step};
use crate::types::{ReminderFrequency, StepKind};

pub const REQUEST_FLOW_ID: &str = "request";

pub const STEP_PERSON: &str = "person";
pub const STEP_TOPIC: &str = "topic";
pub const STEP_INCENTIVE: &str = "incentive";
pub const STEP_TIMELINE: &str = "timeline";

/// Topics offered as one-key suggestions on the topic step
pub const SUGGESTED_PROMPTS: [&str; 8] = [
    "Development process",
    "Key contacts",
    "Common issues",
    "Maintenance procedures",
    "Access & credentials",
    "Documentation locations",
    "System architecture",
    "Deployment steps",
];

/// Someone in the company directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
}

impl Person {
    fn new(id: &str, name: &str, role: &str, department: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            department: department.to_string(),
        }
    }

    /// Two-letter initials for avatars
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect()
    }
}

/// Built-in directory of people a request can be sent to
pub fn directory() -> Vec<Person> {
    vec![
        Person::new("1", "Marcus Chen", "Senior Engineer", "Engineering"),
        Person::new("2", "Sarah Williams", "Product Manager", "Product"),
        Person::new("3", "David Park", "DevOps Contractor", "Infrastructure"),
        Person::new("4", "Emily Rodriguez", "Data Analyst", "Analytics"),
        Person::new("5", "Lisa Thompson", "UX Designer", "Design"),
    ]
}

/// People whose name, role or department contains `query`, ignoring case.
///
/// A blank query matches everyone.
pub fn search<'a>(people: &'a [Person], query: &str) -> Vec<&'a Person> {
    let needle = query.trim().to_lowercase();
    people
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.role.to_lowercase().contains(&needle)
                || p.department.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Rejected draft edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Due date {date} must be after {today}")]
    PastDueDate { date: NaiveDate, today: NaiveDate },

    #[error("Bonus amount '{0}' is not a whole number of dollars")]
    InvalidBonus(String),
}

/// Everything entered on the request form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub selected_person: Option<Person>,
    pub is_external: bool,
    pub external_name: String,
    pub external_email: String,
    pub topic_name: String,
    pub description: String,
    pub selected_prompts: Vec<String>,
    pub include_standard_questions: bool,
    pub offer_bonus: bool,
    pub bonus_amount: Option<u32>,
    pub due_date: Option<NaiveDate>,
    pub reminder: ReminderFrequency,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            selected_person: None,
            is_external: false,
            external_name: String::new(),
            external_email: String::new(),
            topic_name: String::new(),
            description: String::new(),
            selected_prompts: Vec::new(),
            include_standard_questions: true,
            offer_bonus: false,
            bonus_amount: None,
            due_date: None,
            reminder: ReminderFrequency::default(),
        }
    }
}

impl RequestDraft {
    pub fn select_person(&mut self, person: Person) {
        debug!(person = %person.name, "Person selected");
        self.selected_person = Some(person);
        self.is_external = false;
    }

    /// Switch to inviting someone outside the directory
    pub fn use_external_person(&mut self) {
        self.is_external = true;
        self.selected_person = None;
    }

    /// Back to the directory; the external fields are discarded
    pub fn cancel_external_person(&mut self) {
        self.is_external = false;
        self.external_name.clear();
        self.external_email.clear();
    }

    /// Returns whether the prompt is selected afterwards
    pub fn toggle_prompt(&mut self, prompt: &str) -> bool {
        if let Some(pos) = self.selected_prompts.iter().position(|p| p == prompt) {
            self.selected_prompts.remove(pos);
            false
        } else {
            self.selected_prompts.push(prompt.to_string());
            true
        }
    }

    /// Parse the bonus field; blank clears it
    pub fn set_bonus_amount(&mut self, raw: &str) -> Result<(), DraftError> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.bonus_amount = None;
            return Ok(());
        }
        let amount = raw
            .parse::<u32>()
            .map_err(|_| DraftError::InvalidBonus(raw.to_string()))?;
        self.bonus_amount = Some(amount);
        Ok(())
    }

    /// Set the due date. Only days after `today` can be picked.
    pub fn set_due_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), DraftError> {
        if date <= today {
            return Err(DraftError::PastDueDate { date, today });
        }
        self.due_date = Some(date);
        Ok(())
    }

    /// Directory person's name, or the external name when inviting someone else
    pub fn recipient_name(&self) -> Option<&str> {
        match (&self.selected_person, self.is_external) {
            (Some(person), _) => Some(person.name.as_str()),
            (None, true) if !self.external_name.trim().is_empty() => {
                Some(self.external_name.as_str())
            }
            _ => None,
        }
    }

    fn person_ready(&self) -> bool {
        self.selected_person.is_some()
            || (self.is_external
                && !self.external_name.trim().is_empty()
                && !self.external_email.trim().is_empty())
    }

    /// Whether the form step `step_id` has what it needs
    pub fn step_ready(&self, step_id: &str) -> bool {
        match step_id {
            STEP_PERSON => self.person_ready(),
            STEP_TOPIC => !self.topic_name.trim().is_empty(),
            STEP_INCENTIVE => true,
            STEP_TIMELINE => self.due_date.is_some(),
            _ => false,
        }
    }

    /// Label/value rows of the review summary shown on the last step
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Person", self.recipient_name().unwrap_or_default().to_string()),
            ("Topic", self.topic_name.clone()),
        ];
        if let (true, Some(amount)) = (self.offer_bonus, self.bonus_amount) {
            rows.push(("Incentive", format!("${}", amount)));
        }
        rows.push((
            "Due Date",
            self.due_date
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| "Not set".to_string()),
        ));
        rows
    }
}

impl FlowGate for RequestDraft {
    fn allows(&self, step: &Step, _answers: &Answers) -> bool {
        self.step_ready(&step.id)
    }

    fn payload(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

pub fn request_flow() -> FlowDefinition {
    let mut flow = FlowDefinition::new(REQUEST_FLOW_ID, "New Knowledge Request");

    flow.sections = vec![
        Section::new(STEP_PERSON, "Select Person"),
        Section::new(STEP_TOPIC, "Knowledge Topics"),
        Section::new(STEP_INCENTIVE, "Incentive"),
        Section::new(STEP_TIMELINE, "Timeline"),
    ];

    flow.steps = vec![
        Step::new(STEP_PERSON, StepKind::Text, "Select Person", STEP_PERSON)
            .with_helper("Choose the employee or contractor who will document their knowledge"),
        Step::new(STEP_TOPIC, StepKind::LongText, "What Knowledge?", STEP_TOPIC)
            .with_helper("Specify what knowledge you need documented"),
        Step::new(STEP_INCENTIVE, StepKind::Text, "Completion Incentive", STEP_INCENTIVE)
            .with_helper("Optionally offer a bonus for thorough documentation"),
        Step::new(STEP_TIMELINE, StepKind::Text, "Timeline & Reminders", STEP_TIMELINE)
            .with_helper("Set the deadline and reminder preferences"),
    ];

    flow
}

/// Session whose gate is the request draft
pub type RequestWizard = WizardSession<RequestDraft>;

pub fn request_wizard() -> Result<RequestWizard, FlowError> {
    WizardSession::with_gate(request_flow(), RequestDraft::default())
}
