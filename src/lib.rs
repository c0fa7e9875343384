//! nolly library
//!
//! A guided, multi-section wizard engine for capturing institutional
//! knowledge, with a terminal front-end. The engine ([`engine`]) is
//! independent of the terminal and can be driven directly.

pub mod app;
pub mod cli;
pub mod components;
pub mod engine;
pub mod error;
pub mod flow;
pub mod flows;
pub mod input;
pub mod submission;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use engine::{
    Answer, Answers, FlowGate, OpenGate, RequiredGate, WizardError, WizardResult, WizardSession,
};
pub use error::NollyError;
pub use flow::{FlowDefinition, FlowError, Section, Step};
pub use flows::request::{RequestDraft, RequestWizard};
pub use submission::{JsonFileSink, MemorySink, Submission, SubmissionSink};
pub use types::{Direction, ReminderFrequency, SectionStatus, StepKind, SubmitPolicy};
