//! Dispatcher error types.

use crate::api::AuthError;
use crate::config::ConfigError;
use crate::preferences::PreferenceError;
use crate::scope::ScopeError;
use thiserror::Error;

/// Failures of a single command.
///
/// Every variant except [`ShellError::Io`] is printed and the shell keeps
/// reading input.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A selector or name matched nothing.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// The command is not valid at the current level.
    #[error("Unsupported command: {command}")]
    Unsupported { command: String },

    /// The command needs an authenticated session.
    #[error("Not logged in, use `login` first")]
    NotAuthenticated,

    /// The command was given the wrong arguments.
    #[error("Usage: {0}")]
    Usage(String),

    /// The script's log would be the same file as the book's log.
    #[error("script `{name}` shares its log with `book`; rename it")]
    ReservedScript { name: String },

    /// Authentication failed.
    #[error("Login failed: {0}")]
    Auth(#[from] AuthError),

    /// The preference store could not be read or written.
    #[error(transparent)]
    Preferences(#[from] PreferenceError),

    /// Reading from the console failed.
    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that prevent the shell from starting or keep it from reading input.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No preference file location was configured and no home directory exists.
    #[error("cannot determine where to store preferences; set `preferences-path`")]
    NoPreferencesPath,

    /// Console I/O failure.
    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScopeError> for ShellError {
    fn from(error: ScopeError) -> Self {
        match error {
            ScopeError::NotFound { kind, name } => ShellError::NotFound { kind, name },
            ScopeError::Unsupported { command } => ShellError::Unsupported { command },
        }
    }
}
