//! Batch summary.

use super::OperationOutcome;
use std::fmt;

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of targets that succeeded.
    pub succeeded: usize,

    /// Number of targets that failed.
    pub failed: usize,
}

impl BatchSummary {
    /// Builds a summary from a batch's outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[OperationOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    /// Updates the summary with one outcome.
    pub fn record(&mut self, outcome: &OperationOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Returns true if any target failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)
    }
}
