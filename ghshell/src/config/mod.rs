//! Shell configuration.
//!
//! Settings are read from a TOML file. Every key is optional; missing keys
//! fall back to the defaults documented on [`ShellConfig`].
//!
//! ```toml
//! api-base = "https://github.example.com/api/v3"
//! per-page = 50
//! concurrency = 8
//! git-program = "git"
//! shell-program = "bash"
//!
//! [book]
//! build = ["gitbook", "build"]
//! export = ["gitbook", "pdf", ".", "{{name}}.pdf"]
//! ```

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable that points at a config file.
pub const CONFIG_ENV: &str = "GHSHELL_CONFIG";

/// Largest page size the GitHub REST API accepts.
const MAX_PER_PAGE: u8 = 100;

/// Runtime configuration for the shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ShellConfig {
    /// Alternative API root (GitHub Enterprise). `None` targets api.github.com.
    pub api_base: Option<String>,

    /// Items requested per page when listing.
    pub per_page: u8,

    /// Maximum number of targets processed at once within a batch.
    pub concurrency: usize,

    /// Program used to clone repositories.
    pub git_program: String,

    /// Shell used to run each script line (`<shell> -c <line>`).
    pub shell_program: String,

    /// Commands used to build and export books.
    pub book: BookConfig,

    /// Location of the preference file. Defaults to `~/.ghshell/preferences.toml`.
    pub preferences_path: Option<PathBuf>,
}

/// Book toolchain commands.
///
/// Each entry is an argv; arguments are handlebars templates rendered with
/// `name` set to the target repository name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    /// Builds the book inside its scaffold directory.
    pub build: Vec<String>,

    /// Exports the built book to a document.
    pub export: Vec<String>,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            build: vec!["gitbook".to_string(), "build".to_string()],
            export: vec![
                "gitbook".to_string(),
                "pdf".to_string(),
                ".".to_string(),
                "{{name}}.pdf".to_string(),
            ],
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            per_page: MAX_PER_PAGE,
            concurrency: 4,
            git_program: "git".to_string(),
            shell_program: "sh".to_string(),
            book: BookConfig::default(),
            preferences_path: None,
        }
    }
}

impl ShellConfig {
    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        let config: ShellConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::TomlError {
                path: path.display().to_string(),
                source,
            })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Finds the config to use for this run.
    ///
    /// Lookup order: `explicit`, then `$GHSHELL_CONFIG`, then
    /// `<config dir>/ghshell/config.toml` when it exists. Without any of
    /// those the defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the selected file is invalid. An explicit
    /// path that does not exist is an error; the default location is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Self::load(Path::new(&path));
        }

        if let Some(path) = default_config_path().filter(|p| p.is_file()) {
            info!(path = %path.display(), "Using default config file");
            return Self::load(&path);
        }

        Ok(Self::default())
    }

    /// Returns the preference file location, if one can be determined.
    #[must_use]
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path.clone().or_else(|| {
            dirs::home_dir().map(|home| home.join(".ghshell").join("preferences.toml"))
        })
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(invalid(format!(
                "per-page must be between 1 and {MAX_PER_PAGE}, got {}",
                self.per_page
            )));
        }

        if self.concurrency == 0 {
            return Err(invalid("concurrency must be at least 1".to_string()));
        }

        if self.git_program.trim().is_empty() {
            return Err(invalid("git-program is empty".to_string()));
        }

        if self.shell_program.trim().is_empty() {
            return Err(invalid("shell-program is empty".to_string()));
        }

        if self.book.build.is_empty() || self.book.export.is_empty() {
            return Err(invalid("book commands must not be empty".to_string()));
        }

        if let Some(base) = &self.api_base {
            url::Url::parse(base).map_err(|e| invalid(format!("invalid api-base '{base}': {e}")))?;
        }

        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ghshell").join("config.toml"))
}
