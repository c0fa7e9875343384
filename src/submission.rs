//! Submission hand-off.
//!
//! When the user submits from the final step the session packages its
//! answers into a [`Submission`] and hands it to a [`SubmissionSink`]
//! exactly once. Where the submission goes is the sink's business.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::Answers;

/// Everything collected by one wizard run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub flow_id: String,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub answers: Answers,
    /// Flow-specific form state (e.g. the knowledge request draft)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Receiver of finished submissions
pub trait SubmissionSink {
    fn deliver(&mut self, submission: &Submission) -> Result<()>;
}

/// Writes the submission as pretty JSON to a file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubmissionSink for JsonFileSink {
    fn deliver(&mut self, submission: &Submission) -> Result<()> {
        let json = serde_json::to_string_pretty(submission)
            .context("Failed to serialize submission to JSON")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write submission to {:?}", self.path))?;

        tracing::info!(path = %self.path.display(), flow = %submission.flow_id, "Submission written");
        Ok(())
    }
}

/// Keeps submissions in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub delivered: Vec<Submission>,
}

impl SubmissionSink for MemorySink {
    fn deliver(&mut self, submission: &Submission) -> Result<()> {
        self.delivered.push(submission.clone());
        Ok(())
    }
}

/// Load a submission previously written by [`JsonFileSink`]
pub fn load_submission<P: AsRef<Path>>(path: P) -> Result<Submission> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read submission from {:?}", path.as_ref()))?;
    serde_json::from_str(&content).context("Failed to parse submission JSON")
}
