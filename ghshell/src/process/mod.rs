//! External process execution.

mod error;
mod system;

pub use error::SpawnError;
pub use system::SystemRunner;

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program, its arguments and the directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Runs `program` in the current directory with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: PathBuf::from("."),
        }
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = cwd.as_ref().to_path_buf();
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Process execution capability.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs an invocation to completion, buffering its output.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, SpawnError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_command_line() {
        let invocation = Invocation::new("git")
            .args(["clone", "https://github.com/acme/api.git", "api"]);
        assert_eq!(
            invocation.to_string(),
            "git clone https://github.com/acme/api.git api"
        );
    }

    #[test]
    fn success_requires_zero_exit() {
        let mut output = CommandOutput {
            code: Some(0),
            ..CommandOutput::default()
        };
        assert!(output.success());

        output.code = Some(128);
        assert!(!output.success());

        output.code = None;
        assert!(!output.success());
    }
}
