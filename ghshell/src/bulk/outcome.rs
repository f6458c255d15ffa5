//! Per-target outcome records.

use super::TargetError;
use std::fmt;
use std::path::PathBuf;

/// Whether a target succeeded.
#[derive(Debug)]
pub enum OutcomeStatus {
    Success,
    Failure(TargetError),
}

/// Result of running one operation against one target.
#[derive(Debug)]
pub struct OperationOutcome {
    /// Repository name.
    pub target: String,
    pub status: OutcomeStatus,
    /// Log file written for this target.
    pub log_path: PathBuf,
}

impl OperationOutcome {
    pub(crate) fn new(
        target: impl Into<String>,
        result: Result<(), TargetError>,
        log_path: PathBuf,
    ) -> Self {
        let status = match result {
            Ok(()) => OutcomeStatus::Success,
            Err(e) => OutcomeStatus::Failure(e),
        };
        Self {
            target: target.into(),
            status,
            log_path,
        }
    }

    /// Returns true if the target succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success)
    }

    /// The failure reason, if any.
    #[must_use]
    pub fn error(&self) -> Option<&TargetError> {
        match &self.status {
            OutcomeStatus::Success => None,
            OutcomeStatus::Failure(e) => Some(e),
        }
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            OutcomeStatus::Success => {
                write!(f, "✔ {} ({})", self.target, self.log_path.display())
            }
            OutcomeStatus::Failure(e) => {
                write!(f, "✘ {}: {} ({})", self.target, e, self.log_path.display())
            }
        }
    }
}
