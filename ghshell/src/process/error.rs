//! Process error types.

use thiserror::Error;

/// An external program could not be started.
#[derive(Debug, Error)]
#[error("Failed to execute {program}: {source}")]
pub struct SpawnError {
    /// Program that failed to start.
    pub program: String,
    #[source]
    pub source: std::io::Error,
}
