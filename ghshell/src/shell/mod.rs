//! The interactive dispatcher.
//!
//! [`Shell::handle`] processes one input line at a time: the first word is
//! checked against the commands valid at the current level, then routed to
//! its operation. Failures are printed and never end the session; only a
//! console I/O error escapes.

mod console;
mod error;
mod help;

pub use console::Console;
pub use error::{LaunchError, ShellError};
pub use help::{entry as help_entry, HelpEntry};

use crate::api::{AuthError, Authenticator, Credentials, Session};
use crate::bulk::{BatchSummary, BulkEngine, Operation, Placement, Target};
use crate::catalog::Catalog;
use crate::matcher::{self, derive_assignment_name, filter_names, MatchMode, Selector};
use crate::preferences::{PreferenceStore, TOKEN_KEY, USERNAME_KEY};
use crate::scope::{Command, ScopeStack};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Login attempts before giving up on bad credentials.
const MAX_LOGIN_ATTEMPTS: usize = 3;

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Shell state for one interactive session.
pub struct Shell {
    scope: ScopeStack,
    catalog: Catalog,
    session: Option<Session>,
    authenticator: Arc<dyn Authenticator>,
    preferences: Box<dyn PreferenceStore>,
    engine: BulkEngine,
    console: Box<dyn Console>,
}

impl Shell {
    /// Creates a logged-out shell at the top level.
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        preferences: Box<dyn PreferenceStore>,
        engine: BulkEngine,
        console: Box<dyn Console>,
    ) -> Self {
        Self {
            scope: ScopeStack::new(),
            catalog: Catalog::new(),
            session: None,
            authenticator,
            preferences,
            engine,
            console,
        }
    }

    pub fn scope(&self) -> &ScopeStack {
        &self.scope
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The authenticated session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Prompt text for the next line.
    pub fn prompt(&self) -> String {
        self.scope.prompt()
    }

    /// Authenticates without prompting.
    ///
    /// `token_override` wins over the stored token and is not persisted.
    /// Returns true if a session was established; failures are printed.
    pub async fn restore_session(&mut self, token_override: Option<String>) -> bool {
        let credentials = match token_override {
            Some(token) => Credentials::new(None, token),
            None => match self.stored_credentials() {
                Ok(Some(credentials)) => credentials,
                Ok(None) => return false,
                Err(e) => {
                    self.console.print_line(&e.to_string());
                    return false;
                }
            },
        };

        match self.authenticator.authenticate(&credentials).await {
            Ok(session) => {
                self.establish(session).await;
                true
            }
            Err(e) => {
                warn!(error = %e, "Could not restore session");
                self.console
                    .print_line(&format!("Could not restore session ({e}), use `login`"));
                false
            }
        }
    }

    /// Reads and dispatches lines until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the console fails.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            let prompt = self.prompt();
            let Some(line) = self.console.read_line(&prompt).await? else {
                return Ok(());
            };
            if self.handle(&line).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Dispatches one input line.
    ///
    /// # Errors
    ///
    /// Only console failures are returned; every other error is printed.
    pub async fn handle(&mut self, line: &str) -> io::Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = words.collect();

        match self.dispatch(word, &args).await {
            Ok(flow) => Ok(flow),
            Err(ShellError::Io(e)) => Err(e),
            Err(e) => {
                debug!(command = %word, error = %e, "Command failed");
                self.console.print_line(&e.to_string());
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(&mut self, word: &str, args: &[&str]) -> Result<Flow, ShellError> {
        let command = self.scope.check(word)?;
        debug!(command = %command, args = ?args, scope = %self.scope.state().path(), "Dispatching");

        match command {
            Command::Help => self.help(args.first().copied())?,
            Command::Login => self.login().await?,
            Command::Logout => self.logout()?,
            Command::Orgs => self.organizations(args.first().copied()).await?,
            Command::Repos => self.repositories(args.first().copied()).await?,
            Command::Clone => self.clone_repositories(args.first().copied()).await?,
            Command::Script => self.script(args).await?,
            Command::Book => self.book(args.first().copied()).await?,
            Command::Assignments => self.assignments(args).await?,
            Command::Owner => self.owner().await?,
            Command::Pwd => {
                let path = self.scope.state().path();
                self.console.print_line(&path);
            }
            Command::Back => self.scope.back(),
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn help(&mut self, topic: Option<&str>) -> Result<(), ShellError> {
        let text = match topic {
            Some(word) => help::entry(self.scope.check(word)?).to_string(),
            None => self
                .scope
                .valid_commands()
                .iter()
                .map(|c| help::entry(*c).to_string())
                .collect(),
        };
        self.console.print_line(text.trim_end());
        Ok(())
    }

    async fn login(&mut self) -> Result<(), ShellError> {
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            let Some(username) = self.console.read_line("User: ").await? else {
                return Ok(());
            };
            let Some(token) = self.console.read_secret("Token: ").await? else {
                return Ok(());
            };
            let token = token.trim();
            if token.is_empty() {
                return Err(ShellError::Usage("a personal access token is required".to_string()));
            }

            let username = Some(username.trim().to_string()).filter(|u| !u.is_empty());
            let credentials = Credentials::new(username, token);
            match self.authenticator.authenticate(&credentials).await {
                Ok(session) => {
                    self.preferences.set(TOKEN_KEY, &session.token)?;
                    self.preferences.set(USERNAME_KEY, &session.login)?;
                    self.establish(session).await;
                    return Ok(());
                }
                Err(AuthError::Unauthorized) if attempt < MAX_LOGIN_ATTEMPTS => {
                    info!(attempt, "Login rejected");
                    self.console
                        .print_line(&format!("{}, try again", AuthError::Unauthorized));
                }
                Err(AuthError::AlreadyExists) => {
                    self.console.print_line(&AuthError::AlreadyExists.to_string());
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AuthError::Unauthorized.into())
    }

    fn logout(&mut self) -> Result<(), ShellError> {
        self.preferences.delete(TOKEN_KEY)?;
        self.preferences.delete(USERNAME_KEY)?;
        self.session = None;
        self.catalog = Catalog::new();
        self.scope.reset();
        info!("Logged out");
        self.console.print_line("Logged out");
        Ok(())
    }

    async fn organizations(&mut self, arg: Option<&str>) -> Result<(), ShellError> {
        self.require_session()?;

        match arg {
            None => {
                let Some(login) = self.ask("Organization: ").await? else {
                    return Ok(());
                };
                self.scope.enter_org(&login, &self.catalog)?;
            }
            Some("-l") => {
                let names: Vec<String> = self
                    .catalog
                    .organizations()
                    .iter()
                    .map(|o| o.login().to_string())
                    .collect();
                self.print_names(&names);
            }
            Some(selector) => {
                let logins = self.catalog.organizations().iter().map(|o| o.login());
                let names = filter_names(&Selector::parse(selector), logins, MatchMode::Exact);
                if names.is_empty() {
                    return Err(not_found("organization", selector));
                }
                self.print_names(&names);
            }
        }
        Ok(())
    }

    async fn repositories(&mut self, arg: Option<&str>) -> Result<(), ShellError> {
        self.require_session()?;

        match arg {
            None => {
                let Some(name) = self.ask("Repository: ").await? else {
                    return Ok(());
                };
                self.scope.enter_repo(&name, &self.catalog)?;
            }
            Some("-l") => {
                let names: Vec<String> = self
                    .catalog
                    .visible_repositories(self.scope.state())
                    .iter()
                    .map(|r| r.name.clone())
                    .collect();
                self.print_names(&names);
            }
            Some(selector) => {
                let names = self.resolve(Some(selector), MatchMode::Exact);
                if names.is_empty() {
                    return Err(not_found("repository", selector));
                }
                self.print_names(&names);
            }
        }
        Ok(())
    }

    async fn clone_repositories(&mut self, selector: Option<&str>) -> Result<(), ShellError> {
        let names = self.resolve_targets(Command::Clone, selector)?;
        self.run_batch(&Operation::Clone, &names, None).await;
        Ok(())
    }

    async fn script(&mut self, args: &[&str]) -> Result<(), ShellError> {
        let usage = || ShellError::Usage(help::entry(Command::Script).usage_line());
        let script = args.first().map(|a| script_path(a)).ok_or_else(usage)?;
        if args.len() > 2 {
            return Err(usage());
        }
        let names = self.resolve_targets(Command::Script, args.get(1).copied())?;
        check_script(&script)?;

        self.run_batch(&Operation::Script(script), &names, None).await;
        Ok(())
    }

    async fn book(&mut self, selector: Option<&str>) -> Result<(), ShellError> {
        let names = self.resolve_targets(Command::Book, selector)?;
        self.run_batch(&Operation::Book, &names, None).await;
        Ok(())
    }

    async fn assignments(&mut self, args: &[&str]) -> Result<(), ShellError> {
        self.require_session()?;
        let usage = || ShellError::Usage(help::entry(Command::Assignments).usage_line());

        let (selector, action) = args.split_first().ok_or_else(usage)?;
        let operation = match action {
            [] => None,
            ["clone"] => Some(Operation::Clone),
            ["book"] => Some(Operation::Book),
            ["script", file] => {
                let script = script_path(file);
                check_script(&script)?;
                Some(Operation::Script(script))
            }
            _ => return Err(usage()),
        };

        let names = self.resolve(Some(*selector), MatchMode::Assignment);
        let Some(assignment) = derive_assignment_name(&names) else {
            return Err(not_found("assignment", selector));
        };

        match operation {
            None => {
                self.console.print_line(&format!(
                    "{assignment} ({} repositories)",
                    names.len()
                ));
                self.print_names(&names);
            }
            Some(operation) => {
                self.run_batch(&operation, &names, Some(&assignment)).await;
            }
        }
        Ok(())
    }

    async fn owner(&mut self) -> Result<(), ShellError> {
        self.require_session()?;
        let state = self.scope.state();
        let Some(name) = state.repository() else {
            return Err(ShellError::Usage(help::entry(Command::Owner).usage_line()));
        };
        let Some(repository) = self.catalog.find_repository(state, name) else {
            return Err(not_found("repository", name));
        };

        let owner = repository.owner.clone();
        let contributors = repository.contributors.snapshot().await;
        self.console.print_line(&format!("Owner: {owner}"));
        if contributors.is_empty() {
            self.console.print_line("Contributors: none known yet");
        } else {
            self.console
                .print_line(&format!("Contributors: {}", contributors.join(", ")));
        }
        Ok(())
    }

    /// Resolves the targets of `clone`, `script` or `book`.
    fn resolve_targets(
        &self,
        command: Command,
        selector: Option<&str>,
    ) -> Result<Vec<String>, ShellError> {
        self.require_session()?;
        let names = self.resolve(selector, MatchMode::Exact);
        if names.is_empty() {
            return Err(match selector {
                Some(selector) => not_found("repository", selector),
                None => ShellError::Usage(help::entry(command).usage_line()),
            });
        }
        Ok(names)
    }

    fn resolve(&self, selector: Option<&str>, mode: MatchMode) -> Vec<String> {
        matcher::resolve(selector, self.scope.state(), &self.catalog, mode)
    }

    async fn run_batch(&mut self, operation: &Operation, names: &[String], assignment: Option<&str>) {
        let state = self.scope.state();
        let targets: Vec<Target> = names
            .iter()
            .filter_map(|name| self.catalog.find_repository(state, name))
            .map(Target::from)
            .collect();
        let placement = Placement::new(state.org(), assignment);

        let outcomes = self.engine.run(operation, &targets, &placement).await;
        for outcome in &outcomes {
            self.console.print_line(&outcome.to_string());
        }
        let summary = BatchSummary::from_outcomes(&outcomes);
        self.console.print_line(&summary.to_string());
    }

    /// Prompts for a name. `None` when the input is empty or ends.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        let answer = self.console.read_line(prompt).await?;
        Ok(answer
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()))
    }

    async fn establish(&mut self, session: Session) {
        self.catalog = Catalog::populate(Arc::clone(&session.api)).await;
        self.scope.reset();
        info!(
            login = %session.login,
            organizations = self.catalog.organizations().len(),
            repositories = self.catalog.owned_repositories().len(),
            "Session established"
        );
        self.console
            .print_line(&format!("Logged in as {}", session.login));
        self.session = Some(session);
    }

    fn stored_credentials(&self) -> Result<Option<Credentials>, ShellError> {
        let Some(token) = self.preferences.get(TOKEN_KEY)? else {
            return Ok(None);
        };
        let username = self.preferences.get(USERNAME_KEY)?;
        Ok(Some(Credentials::new(username, token)))
    }

    fn require_session(&self) -> Result<&Session, ShellError> {
        self.session.as_ref().ok_or(ShellError::NotAuthenticated)
    }

    fn print_names(&mut self, names: &[String]) {
        for name in names {
            self.console.print_line(name);
        }
    }
}

fn not_found(kind: &'static str, name: &str) -> ShellError {
    ShellError::NotFound {
        kind,
        name: name.to_string(),
    }
}

/// Script argument with surrounding quotes removed.
fn script_path(arg: &str) -> PathBuf {
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| arg.strip_prefix(*q).and_then(|a| a.strip_suffix(*q)))
        .unwrap_or(arg);
    PathBuf::from(unquoted)
}

fn check_script(script: &std::path::Path) -> Result<(), ShellError> {
    if !script.is_file() {
        return Err(not_found("script", &script.display().to_string()));
    }
    let operation = Operation::Script(script.to_path_buf());
    if operation.log_title() == Operation::Book.log_title() {
        return Err(ShellError::ReservedScript {
            name: script.display().to_string(),
        });
    }
    Ok(())
}
