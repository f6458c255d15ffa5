//! Navigation between the top level, organizations and repositories.
//!
//! A single [`ScopeStack`] is owned by the shell. It only changes through
//! [`ScopeStack::enter_org`], [`ScopeStack::enter_repo`],
//! [`ScopeStack::back`] and [`ScopeStack::reset`].

mod commands;
mod error;
mod state;

pub use commands::{Command, Level};
pub use error::ScopeError;
pub use state::ScopeState;

use crate::catalog::Catalog;
use tracing::debug;

/// The active navigation state.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    state: ScopeState,
}

impl ScopeStack {
    /// Starts at the top level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ScopeState {
        &self.state
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.state.level()
    }

    /// Commands valid right now, in table order.
    pub fn valid_commands(&self) -> &'static [Command] {
        self.level().commands()
    }

    /// Resolves a typed command word against the current level.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Unsupported`] for unknown words and for
    /// commands that are not valid at this level.
    pub fn check(&self, word: &str) -> Result<Command, ScopeError> {
        Command::parse(word)
            .filter(|command| self.level().allows(*command))
            .ok_or_else(|| ScopeError::Unsupported {
                command: word.to_string(),
            })
    }

    /// Enters an organization.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NotFound`] if the catalog has no such organization.
    pub fn enter_org(&mut self, login: &str, catalog: &Catalog) -> Result<(), ScopeError> {
        if catalog.organization(login).is_none() {
            return Err(ScopeError::NotFound {
                kind: "organization",
                name: login.to_string(),
            });
        }

        self.transition(ScopeState::InOrg(login.to_string()));
        Ok(())
    }

    /// Enters a repository visible from the current scope.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NotFound`] if the repository is not visible.
    pub fn enter_repo(&mut self, name: &str, catalog: &Catalog) -> Result<(), ScopeError> {
        if catalog.find_repository(&self.state, name).is_none() {
            return Err(ScopeError::NotFound {
                kind: "repository",
                name: name.to_string(),
            });
        }

        let next = match self.state.org() {
            Some(org) => ScopeState::InOrgRepo(org.to_string(), name.to_string()),
            None => ScopeState::InRepo(name.to_string()),
        };
        self.transition(next);
        Ok(())
    }

    /// Moves one level up. Does nothing at the top level.
    pub fn back(&mut self) {
        let next = match &self.state {
            ScopeState::Main => return,
            ScopeState::InOrgRepo(org, _) => ScopeState::InOrg(org.clone()),
            ScopeState::InOrg(_) | ScopeState::InRepo(_) => ScopeState::Main,
        };
        self.transition(next);
    }

    /// Returns to the top level.
    pub fn reset(&mut self) {
        self.transition(ScopeState::Main);
    }

    /// Prompt text reflecting the scope.
    pub fn prompt(&self) -> String {
        match &self.state {
            ScopeState::Main => "ghshell > ".to_string(),
            ScopeState::InOrg(org) => format!("ghshell:{org} > "),
            ScopeState::InOrgRepo(org, repo) => format!("ghshell:{org}/{repo} > "),
            ScopeState::InRepo(repo) => format!("ghshell:{repo} > "),
        }
    }

    fn transition(&mut self, next: ScopeState) {
        debug!(from = %self.state.path(), to = %next.path(), "Scope transition");
        self.state = next;
    }
}
