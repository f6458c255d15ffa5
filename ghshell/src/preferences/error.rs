//! Preference store error types.

use thiserror::Error;

/// Errors from preference storage.
///
/// Messages never include stored values.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Failed to read or parse the preference file.
    #[error("failed to read preferences: {0}")]
    ReadError(String),

    /// Failed to write the preference file.
    #[error("failed to write preferences: {0}")]
    WriteError(String),
}
