//! Navigation state.

use super::commands::Level;

/// Where the user currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeState {
    /// Top level.
    #[default]
    Main,
    /// Inside an organization.
    InOrg(String),
    /// Inside a repository of an organization.
    InOrgRepo(String, String),
    /// Inside one of the user's own repositories.
    InRepo(String),
}

impl ScopeState {
    /// Level of this state.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            ScopeState::Main => Level::Main,
            ScopeState::InOrg(_) => Level::Org,
            ScopeState::InOrgRepo(..) | ScopeState::InRepo(_) => Level::Repo,
        }
    }

    /// The active organization, if any.
    #[must_use]
    pub fn org(&self) -> Option<&str> {
        match self {
            ScopeState::InOrg(org) | ScopeState::InOrgRepo(org, _) => Some(org.as_str()),
            ScopeState::Main | ScopeState::InRepo(_) => None,
        }
    }

    /// The active repository, if any.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        match self {
            ScopeState::InOrgRepo(_, repo) | ScopeState::InRepo(repo) => Some(repo.as_str()),
            ScopeState::Main | ScopeState::InOrg(_) => None,
        }
    }

    /// Slash-separated location, `/` at the top level.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            ScopeState::Main => "/".to_string(),
            ScopeState::InOrg(org) => format!("/{org}"),
            ScopeState::InOrgRepo(org, repo) => format!("/{org}/{repo}"),
            ScopeState::InRepo(repo) => format!("/{repo}"),
        }
    }
}
