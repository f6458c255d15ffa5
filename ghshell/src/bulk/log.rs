//! Append-only, timestamped log files.

use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Timestamp prefix of every log line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A log file that is only ever appended to.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `text`, one timestamped line per input line.
    ///
    /// Creates the file if needed. Blank input writes nothing.
    pub async fn append(&self, text: &str) -> io::Result<()> {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut buffer = String::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            buffer.push_str(&format!("[{stamp}] {line}\n"));
        }
        if buffer.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await
    }
}
