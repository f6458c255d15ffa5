//! Bulk operations over matched repositories.
//!
//! A batch runs one [`Operation`] against every target. Targets are
//! independent: each gets its own log file and outcome, and a failing
//! target never prevents the others from running.

mod book;
mod error;
mod layout;
mod log;
mod outcome;
mod summary;

pub use error::TargetError;
pub use layout::{BatchLayout, Placement};
pub use log::LogFile;
pub use outcome::{OperationOutcome, OutcomeStatus};
pub use summary::BatchSummary;

use crate::catalog::Repository;
use crate::config::{BookConfig, ShellConfig};
use crate::process::{CommandRunner, Invocation};
use crate::templates::BookRenderer;
use book::{BookJob, BOOK_LOG_TITLE};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// What to do with each target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Clone the repository.
    Clone,
    /// Run a script file line by line inside the clone.
    Script(PathBuf),
    /// Compile the target's logs into a book.
    Book,
}

impl Operation {
    /// Title part of the log file name, `<name>-<title>.log`.
    #[must_use]
    pub fn log_title(&self) -> String {
        match self {
            Operation::Clone => "clone".to_string(),
            Operation::Script(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "script".to_string()),
            Operation::Book => BOOK_LOG_TITLE.to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Clone => f.write_str("clone"),
            Operation::Script(path) => write!(f, "script {}", path.display()),
            Operation::Book => f.write_str("book"),
        }
    }
}

/// A repository selected for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub clone_url: String,
}

impl From<&Repository> for Target {
    fn from(repository: &Repository) -> Self {
        Self {
            name: repository.name.clone(),
            clone_url: repository.clone_url.clone(),
        }
    }
}

/// Settings for the bulk engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Directory batches are laid out under.
    workdir: PathBuf,
    /// Program used to clone.
    git_program: String,
    /// Shell used for script lines.
    shell_program: String,
    /// Maximum targets in flight.
    concurrency: usize,
    /// Book toolchain commands.
    book: BookConfig,
}

impl EngineSettings {
    /// Creates settings from the loaded configuration.
    pub fn from_config(config: &ShellConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            git_program: config.git_program.clone(),
            shell_program: config.shell_program.clone(),
            concurrency: config.concurrency,
            book: config.book.clone(),
        }
    }

    /// Overrides the batch width.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Runs clone, script and book batches.
pub struct BulkEngine {
    runner: Arc<dyn CommandRunner>,
    settings: EngineSettings,
    renderer: BookRenderer,
}

impl BulkEngine {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: EngineSettings) -> Self {
        Self {
            runner,
            settings,
            renderer: BookRenderer::new(),
        }
    }

    /// Runs `operation` against every target.
    ///
    /// Targets run concurrently up to the configured width; the returned
    /// outcomes are in target order.
    pub async fn run(
        &self,
        operation: &Operation,
        targets: &[Target],
        placement: &Placement,
    ) -> Vec<OperationOutcome> {
        let layout = BatchLayout::new(&self.settings.workdir, placement);
        let title = operation.log_title();
        info!(
            operation = %operation,
            targets = targets.len(),
            dir = %layout.base().display(),
            "Starting batch"
        );

        if let Err(e) = layout.ensure().await {
            error!(dir = %layout.base().display(), error = %e, "Failed to create batch directory");
            return targets
                .iter()
                .map(|target| {
                    let source = std::io::Error::new(e.kind(), e.to_string());
                    OperationOutcome::new(
                        &target.name,
                        Err(TargetError::io(layout.base(), source)),
                        layout.log_path(&target.name, &title),
                    )
                })
                .collect();
        }

        let batch: Vec<String> = targets.iter().map(|t| t.name.clone()).collect();
        let outcomes: Vec<OperationOutcome> = stream::iter(targets)
            .map(|target| {
                let span = info_span!("target", name = %target.name, operation = %operation);
                self.run_target(operation, target, &layout, &title, &batch)
                    .instrument(span)
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Finished batch"
        );
        outcomes
    }

    async fn run_target(
        &self,
        operation: &Operation,
        target: &Target,
        layout: &BatchLayout,
        title: &str,
        batch: &[String],
    ) -> OperationOutcome {
        let log = LogFile::new(layout.log_path(&target.name, title));
        let result = match operation {
            Operation::Clone => self.clone_target(target, layout, &log).await,
            Operation::Script(script) => self.script_target(target, script, layout, &log).await,
            Operation::Book => self.book_target(target, layout, batch, &log).await,
        };

        match &result {
            Ok(()) => info!("Target finished"),
            Err(e) => warn!(error = %e, "Target failed"),
        }
        OperationOutcome::new(&target.name, result, log.path().to_path_buf())
    }

    async fn clone_target(
        &self,
        target: &Target,
        layout: &BatchLayout,
        log: &LogFile,
    ) -> Result<(), TargetError> {
        let dir = layout.target_dir(&target.name);
        append(
            log,
            &format!("Cloning {} into {}", target.clone_url, dir.display()),
        )
        .await;

        let invocation = Invocation::new(self.settings.git_program.clone())
            .args(["clone", target.clone_url.as_str(), target.name.as_str()])
            .current_dir(layout.base());

        let output = match self.runner.run(&invocation).await {
            Ok(output) => output,
            Err(e) => {
                append(log, &e.to_string()).await;
                return Err(e.into());
            }
        };
        append(log, &output.stderr).await;

        if !output.success() {
            return Err(TargetError::NonZeroExit {
                program: invocation.program,
                code: output.code,
            });
        }
        append(log, "Clone complete").await;
        Ok(())
    }

    async fn script_target(
        &self,
        target: &Target,
        script: &Path,
        layout: &BatchLayout,
        log: &LogFile,
    ) -> Result<(), TargetError> {
        let dir = layout.target_dir(&target.name);
        if !is_dir(&dir).await {
            return Err(TargetError::clone_first(&target.name));
        }

        let contents = tokio::fs::read_to_string(script)
            .await
            .map_err(|e| TargetError::io(script, e))?;
        if let Some(file_name) = script.file_name() {
            let copy = dir.join(file_name);
            tokio::fs::write(&copy, &contents)
                .await
                .map_err(|e| TargetError::io(&copy, e))?;
        }

        // Lines of one target append to the same log, so each is awaited
        // before the next starts.
        for line in script_lines(&contents) {
            append(log, &format!("$ {line}")).await;
            let invocation = Invocation::new(self.settings.shell_program.clone())
                .args(["-c", line])
                .current_dir(&dir);

            match self.runner.run(&invocation).await {
                Ok(output) => {
                    append(log, &output.stdout).await;
                    append(log, &output.stderr).await;
                    if !output.success() {
                        let failure = TargetError::NonZeroExit {
                            program: line.to_string(),
                            code: output.code,
                        };
                        append(log, &failure.to_string()).await;
                    }
                }
                Err(e) => {
                    warn!(line = %line, error = %e, "Script line failed to start");
                    append(log, &e.to_string()).await;
                }
            }
        }
        Ok(())
    }

    async fn book_target(
        &self,
        target: &Target,
        layout: &BatchLayout,
        batch: &[String],
        log: &LogFile,
    ) -> Result<(), TargetError> {
        if !is_dir(&layout.target_dir(&target.name)).await {
            return Err(TargetError::clone_first(&target.name));
        }

        BookJob {
            runner: self.runner.as_ref(),
            renderer: &self.renderer,
            config: &self.settings.book,
            layout,
            name: &target.name,
            batch,
            log,
        }
        .run()
        .await
    }
}

/// Executable lines of a script: blank lines and `#` comments are skipped.
fn script_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn append(log: &LogFile, text: &str) {
    if let Err(e) = log.append(text).await {
        warn!(path = %log.path().display(), error = %e, "Failed to append to log");
    }
}
