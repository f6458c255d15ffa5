//! File-backed preference store.
//!
//! Values live in one TOML table keyed by the shell's namespace:
//!
//! ```toml
//! [ghshell]
//! token = "..."
//! username = "octocat"
//! ```
//!
//! On Unix the file is created with mode 0600, and every write replaces
//! the file atomically through a temp file in the same directory.

use super::{PreferenceError, PreferenceStore, NAMESPACE};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

type Tables = BTreeMap<String, BTreeMap<String, String>>;

/// Preference store persisted to a TOML file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Uses the file at `path`. It is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_tables(&self) -> Result<Tables, PreferenceError> {
        if !self.path.exists() {
            return Ok(Tables::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| PreferenceError::ReadError(format!("cannot read file: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| PreferenceError::ReadError(format!("cannot parse file: {e}")))
    }

    fn write_tables(&self, tables: &Tables) -> Result<(), PreferenceError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .map_err(|e| PreferenceError::WriteError(format!("cannot create directory: {e}")))?;

        let content = toml::to_string(tables)
            .map_err(|e| PreferenceError::WriteError(format!("cannot serialize: {e}")))?;

        let mut file = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| PreferenceError::WriteError(format!("cannot create temp file: {e}")))?;

        #[cfg(unix)]
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| PreferenceError::WriteError(format!("cannot set permissions: {e}")))?;

        file.write_all(content.as_bytes())
            .map_err(|e| PreferenceError::WriteError(format!("cannot write: {e}")))?;
        file.as_file()
            .sync_all()
            .map_err(|e| PreferenceError::WriteError(format!("cannot sync to disk: {e}")))?;

        file.persist(&self.path)
            .map_err(|e| PreferenceError::WriteError(format!("cannot replace file: {}", e.error)))?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let tables = self.read_tables()?;
        Ok(tables.get(NAMESPACE).and_then(|t| t.get(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut tables = self.read_tables()?;
        tables
            .entry(NAMESPACE.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.write_tables(&tables)
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        let mut tables = self.read_tables()?;
        let removed = tables
            .get_mut(NAMESPACE)
            .and_then(|t| t.remove(key))
            .is_some();
        if removed {
            self.write_tables(&tables)?;
        }
        Ok(())
    }
}
