//! Error handling module for nolly
//!
//! Engine and flow errors have their own enums next to the code that raises
//! them; this is the crate-wide type the binary and front-end work with.

use thiserror::Error;

use crate::engine::WizardError;
use crate::flow::FlowError;
use crate::flows::request::DraftError;

/// Main error type for nolly
#[derive(Error, Debug)]
pub enum NollyError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid flow definition
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// Rejected wizard operation
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Rejected request form edit
    #[error("Request error: {0}")]
    Draft(#[from] DraftError),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for nolly operations
pub type Result<T> = std::result::Result<T, NollyError>;

impl NollyError {
    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NollyError::terminal("Failed to enable raw mode");
        assert_eq!(err.to_string(), "Terminal error: Failed to enable raw mode");

        let err: NollyError = WizardError::NotAtFinalStep.into();
        assert_eq!(
            err.to_string(),
            "Wizard error: Submission is only possible from the final step"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NollyError = io_err.into();
        assert!(matches!(err, NollyError::Io(_)));
    }

    #[test]
    fn test_flow_error_conversion() {
        let err: NollyError = FlowError::BlankId.into();
        assert!(matches!(err, NollyError::Flow(FlowError::BlankId)));
    }
}
