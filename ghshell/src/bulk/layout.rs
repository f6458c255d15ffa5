//! On-disk placement of a batch.

use std::io;
use std::path::{Path, PathBuf};

/// Where a batch lives relative to the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Organization folder, when run inside an organization.
    pub org: Option<String>,
    /// Assignment folder, when grouping by assignment.
    pub assignment: Option<String>,
}

impl Placement {
    pub fn new(org: Option<&str>, assignment: Option<&str>) -> Self {
        Self {
            org: org.map(str::to_string),
            assignment: assignment.map(str::to_string),
        }
    }
}

/// Resolved directory of a batch: `<workdir>[/<org>][/<assignment>]`.
///
/// Clones, logs and book scaffolds of every target sit side by side in
/// this directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLayout {
    base: PathBuf,
}

impl BatchLayout {
    pub fn new(workdir: &Path, placement: &Placement) -> Self {
        let mut base = workdir.to_path_buf();
        if let Some(org) = &placement.org {
            base.push(org);
        }
        if let Some(assignment) = &placement.assignment {
            base.push(assignment);
        }
        Self { base }
    }

    /// The log directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Creates the organization and assignment folders.
    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.base).await
    }

    /// Local clone directory of `name`.
    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    /// Log file `<name>-<title>.log`.
    pub fn log_path(&self, name: &str, title: &str) -> PathBuf {
        self.base.join(format!("{name}-{title}.log"))
    }

    /// Book scaffold directory of `name`.
    pub fn book_dir(&self, name: &str) -> PathBuf {
        self.base.join(format!("{name}-book"))
    }
}
