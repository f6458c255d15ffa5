//! Navigation error types.

use thiserror::Error;

/// Errors raised by scope transitions and command checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// The named organization or repository is not in the catalog.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// The command is not valid at the current level.
    #[error("Unsupported command: {command}")]
    Unsupported { command: String },
}
