//! Knowledge capture interview.
//!
//! Ten steps across seven sections. Navigation is never gated; the only
//! completeness rule is that step 1 must be answered before submitting.

use crate::engine::WizardSession;
use crate::flow::{FlowDefinition, FlowError, Section, Step};
use crate::types::{StepKind, SubmitPolicy};

pub const CAPTURE_FLOW_ID: &str = "capture";

/// Incentive released over the interview, in whole dollars
pub const INCENTIVE_TOTAL: u32 = 500;

/// Options offered by the "which systems" step
pub const SYSTEM_OPTIONS: [&str; 8] = [
    "Stripe Dashboard",
    "PagerDuty",
    "AWS Console",
    "Datadog",
    "Slack",
    "GitHub",
    "Jira",
    "Confluence",
];

pub fn capture_flow() -> FlowDefinition {
    let mut flow = FlowDefinition::new(CAPTURE_FLOW_ID, "Payment Gateway Integration");
    flow.incentive_total = INCENTIVE_TOTAL;
    flow.submit_policy = SubmitPolicy::RequireMarked;

    flow.sections = vec![
        Section::new("admin", "Admin Questions"),
        Section::new("overview", "Project Overview"),
        Section::new("contacts", "Key Contacts"),
        Section::new("systems", "Systems & Access"),
        Section::new("issues", "Common Issues"),
        Section::new("videos", "Video Walkthroughs"),
        Section::new("review", "Final Review"),
    ];

    flow.steps = vec![
        Step::new(
            "1",
            StepKind::Text,
            "What is the most critical thing someone needs to know about this project?",
            "admin",
        )
        .with_helper("Think about what would cause the biggest problem if someone didn't know it")
        .required(),
        Step::new(
            "2",
            StepKind::Text,
            "Describe the Payment Gateway Integration project in your own words.",
            "overview",
        )
        .with_helper("Include its purpose, scope, and how it fits into the larger system"),
        Step::new(
            "3",
            StepKind::AiFollowup,
            "You mentioned Stripe as the payment processor. Can you explain how the webhook handling works?",
            "overview",
        ),
        Step::new(
            "4",
            StepKind::Text,
            "Who should someone contact when the Payment Gateway system has issues?",
            "contacts",
        )
        .with_helper("Include names, roles, and preferred contact methods"),
        Step::new(
            "5",
            StepKind::Multiselect,
            "Which systems do you use for this project?",
            "systems",
        )
        .with_options(SYSTEM_OPTIONS),
        Step::new(
            "6",
            StepKind::Text,
            "How do you access the production payment systems?",
            "systems",
        )
        .with_helper(
            "Include any VPN requirements, credentials locations, or special access procedures",
        ),
        Step::new(
            "7",
            StepKind::Text,
            "What are the most common issues that occur with the payment system?",
            "issues",
        )
        .with_helper("Include symptoms, root causes, and typical resolution steps"),
        Step::new(
            "8",
            StepKind::AiFollowup,
            "You mentioned PagerDuty for incident management. Can you explain the escalation process for critical payment failures?",
            "issues",
        ),
        Step::new(
            "9",
            StepKind::Video,
            "Walk us through how you debug a failed payment transaction.",
            "videos",
        )
        .with_helper("Videos are automatically transcribed and searchable"),
        Step::new(
            "10",
            StepKind::File,
            "Upload any relevant documentation, diagrams, or screenshots.",
            "videos",
        )
        .with_helper("This could include architecture diagrams, runbooks, or reference documents"),
    ];

    flow
}

/// Ungated session over [`capture_flow`]
pub fn capture_wizard() -> Result<WizardSession, FlowError> {
    WizardSession::new(capture_flow())
}
