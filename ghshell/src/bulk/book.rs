//! Book pipeline: scaffold, pages, summary, build, export.
//!
//! Every step is awaited in order and the first failing step ends the
//! pipeline for that target.

use super::{BatchLayout, LogFile, TargetError};
use crate::config::BookConfig;
use crate::process::{CommandRunner, Invocation};
use crate::templates::{page_title, BookPage, BookRenderer};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Title of the book's own log; never turned into a page.
pub(crate) const BOOK_LOG_TITLE: &str = "book";

pub(crate) struct BookJob<'a> {
    pub runner: &'a dyn CommandRunner,
    pub renderer: &'a BookRenderer,
    pub config: &'a BookConfig,
    pub layout: &'a BatchLayout,
    pub name: &'a str,
    /// Names of every target in the batch.
    pub batch: &'a [String],
    pub log: &'a LogFile,
}

impl BookJob<'_> {
    pub(crate) async fn run(&self) -> Result<(), TargetError> {
        let book_dir = self.layout.book_dir(self.name);

        self.scaffold(&book_dir).await?;
        let pages = self.write_pages(&book_dir).await?;
        self.write_summary(&book_dir, &pages).await?;
        self.run_tool("build", &self.config.build, &book_dir).await?;
        self.run_tool("export", &self.config.export, &book_dir).await?;

        self.note(&format!("book written to {}", book_dir.display()))
            .await;
        Ok(())
    }

    async fn scaffold(&self, book_dir: &Path) -> Result<(), TargetError> {
        tokio::fs::create_dir_all(book_dir)
            .await
            .map_err(step_error("scaffold"))?;
        let readme = self
            .renderer
            .render_readme(self.name)
            .map_err(step_error("scaffold"))?;
        tokio::fs::write(book_dir.join("README.md"), readme)
            .await
            .map_err(step_error("scaffold"))?;
        self.note("book scaffold created").await;
        Ok(())
    }

    async fn write_pages(&self, book_dir: &Path) -> Result<Vec<BookPage>, TargetError> {
        let logs = find_logs(self.layout.base(), self.name, self.batch, book_dir)
            .await
            .map_err(step_error("pages"))?;

        let mut pages: Vec<BookPage> = Vec::with_capacity(logs.len());
        for (suffix, path) in logs {
            if suffix == BOOK_LOG_TITLE {
                continue;
            }

            let title = page_title(&suffix).to_string();
            let body = tokio::fs::read_to_string(&path)
                .await
                .map_err(step_error("pages"))?;
            let page = self
                .renderer
                .render_page(&title, &body)
                .map_err(step_error("pages"))?;
            // Suffixes are unique per directory, titles are not.
            let file_name = format!("{suffix}.md");
            tokio::fs::write(book_dir.join(&file_name), page)
                .await
                .map_err(step_error("pages"))?;

            debug!(title = %title, "Wrote book page");
            pages.push(BookPage { title, file_name });
        }

        self.note(&format!("{} page(s) written", pages.len())).await;
        Ok(pages)
    }

    async fn write_summary(&self, book_dir: &Path, pages: &[BookPage]) -> Result<(), TargetError> {
        let summary = self
            .renderer
            .render_summary(self.name, pages)
            .map_err(step_error("summary"))?;
        tokio::fs::write(book_dir.join("SUMMARY.md"), summary)
            .await
            .map_err(step_error("summary"))?;
        Ok(())
    }

    async fn run_tool(
        &self,
        step: &'static str,
        argv: &[String],
        book_dir: &Path,
    ) -> Result<(), TargetError> {
        let argv = self
            .renderer
            .render_argv(argv, self.name)
            .map_err(step_error(step))?;
        let Some((program, args)) = argv.split_first() else {
            return Err(TargetError::BookStep {
                step,
                message: "no command configured".to_string(),
            });
        };

        let invocation = Invocation::new(program.clone())
            .args(args.iter().cloned())
            .current_dir(book_dir);
        self.note(&format!("$ {invocation}")).await;

        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(step_error(step))?;
        self.note(&output.stdout).await;
        self.note(&output.stderr).await;

        if !output.success() {
            let failure = TargetError::NonZeroExit {
                program: program.clone(),
                code: output.code,
            };
            return Err(step_error(step)(failure));
        }
        Ok(())
    }

    async fn note(&self, text: &str) {
        if let Err(e) = self.log.append(text).await {
            warn!(path = %self.log.path().display(), error = %e, "Failed to append to log");
        }
    }
}

fn step_error<E: Display>(step: &'static str) -> impl FnOnce(E) -> TargetError {
    move |e| TargetError::BookStep {
        step,
        message: e.to_string(),
    }
}

/// Logs of `name` in `dir`, as `(suffix, path)` sorted by suffix, where
/// the file is `<name>-<suffix>.log`.
///
/// A log that also fits a longer repository name, such as `hw1-alice`
/// next to `hw1`, belongs to that repository. Those names come from the
/// batch and from the clone directories in `dir`.
async fn find_logs(
    dir: &Path,
    name: &str,
    batch: &[String],
    book_dir: &Path,
) -> std::io::Result<Vec<(String, PathBuf)>> {
    let prefix = format!("{name}-");
    let mut longer: Vec<String> = batch
        .iter()
        .filter_map(|other| other.strip_prefix(&prefix))
        .map(str::to_string)
        .collect();
    let mut found = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(rest) = file_name.strip_prefix(&prefix) else {
            continue;
        };

        let file_type = entry.file_type().await?;
        if file_type.is_dir() {
            if entry.path() != book_dir {
                longer.push(rest.to_string());
            }
            continue;
        }
        if let Some(suffix) = rest.strip_suffix(".log") {
            if file_type.is_file() {
                found.push((suffix.to_string(), entry.path()));
            }
        }
    }

    found.retain(|(suffix, _)| {
        !longer.iter().any(|other| {
            suffix
                .strip_prefix(other.as_str())
                .is_some_and(|s| s.starts_with('-'))
        })
    });
    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}
