//! Wizard engine: cursor navigation, typed answers, gates and the pending
//! recording slot.
//!
//! The engine knows nothing about terminals. The TUI and the tests drive it
//! through [`WizardSession`] alone.

pub mod answers;
pub mod gate;
pub mod pending;
pub mod session;

pub use answers::{Answer, Answers, FileHandle, MediaHandle};
pub use gate::{FlowGate, OpenGate, RequiredGate};
pub use pending::PendingRecording;
pub use session::{WizardError, WizardResult, WizardSession};
