//! Per-target failure types.

use crate::process::SpawnError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single target of a batch failed.
///
/// A target failure never stops its siblings.
#[derive(Debug, Error)]
pub enum TargetError {
    /// The target has no local clone yet.
    #[error("{target}: {hint}")]
    MissingPrerequisite { target: String, hint: &'static str },

    /// The external program could not be started.
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    /// The external program exited unsuccessfully.
    #[error("`{program}` exited with {}", exit_label(.code))]
    NonZeroExit { program: String, code: Option<i32> },

    /// Filesystem failure while preparing or logging the target.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A step of the book pipeline failed.
    #[error("book {step} failed: {message}")]
    BookStep { step: &'static str, message: String },
}

impl TargetError {
    /// Failure for a script or book requested before cloning.
    pub(crate) fn clone_first(target: &str) -> Self {
        TargetError::MissingPrerequisite {
            target: target.to_string(),
            hint: "clone first",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TargetError::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
