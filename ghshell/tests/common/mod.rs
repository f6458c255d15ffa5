//! Shared fakes for driving the shell end to end.
//!
//! Add `mod common;` to a test file and build a [`Harness`].

#![allow(dead_code)]

use async_trait::async_trait;
use ghshell::{
    ApiError, AuthError, Authenticator, BulkEngine, CommandOutput, CommandRunner, Console,
    Credentials, EngineSettings, Flow, HostingApi, Invocation, ListPage, MemoryPreferenceStore,
    OrgListing, PreferenceError, PreferenceStore, RepoListing, Session, Shell, ShellConfig,
    SpawnError,
};
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Token the fake authenticator accepts.
pub const GOOD_TOKEN: &str = "ghp_good";

/// Token the fake authenticator answers with HTTP 422.
pub const EXISTING_TOKEN: &str = "ghp_existing";

/// Login of the fake account.
pub const LOGIN: &str = "octocat";

pub fn listing(owner: &str, name: &str) -> RepoListing {
    RepoListing {
        name: name.to_string(),
        clone_url: format!("https://github.com/{owner}/{name}.git"),
        owner: owner.to_string(),
    }
}

/// In-memory hosting API serving every listing as a single page.
#[derive(Default)]
pub struct FakeApi {
    orgs: Vec<(String, Vec<RepoListing>)>,
    owned: Vec<RepoListing>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org(mut self, login: &str, repos: &[&str]) -> Self {
        let repos = repos.iter().map(|name| listing(login, name)).collect();
        self.orgs.push((login.to_string(), repos));
        self
    }

    pub fn with_owned(mut self, repos: &[&str]) -> Self {
        self.owned
            .extend(repos.iter().map(|name| listing(LOGIN, name)));
        self
    }
}

#[async_trait]
impl HostingApi for FakeApi {
    async fn organizations(&self, _page: u32) -> Result<ListPage<OrgListing>, ApiError> {
        let orgs = self
            .orgs
            .iter()
            .map(|(login, _)| OrgListing {
                login: login.clone(),
            })
            .collect();
        Ok(ListPage::last(orgs))
    }

    async fn org_repositories(
        &self,
        org: &str,
        _page: u32,
    ) -> Result<ListPage<RepoListing>, ApiError> {
        let repos = self
            .orgs
            .iter()
            .find(|(login, _)| login == org)
            .map(|(_, repos)| repos.clone())
            .unwrap_or_default();
        Ok(ListPage::last(repos))
    }

    async fn owned_repositories(&self, _page: u32) -> Result<ListPage<RepoListing>, ApiError> {
        Ok(ListPage::last(self.owned.clone()))
    }

    async fn contributors(
        &self,
        owner: &str,
        _repo: &str,
        _page: u32,
    ) -> Result<ListPage<String>, ApiError> {
        Ok(ListPage::last(vec![owner.to_string()]))
    }
}

/// Accepts [`GOOD_TOKEN`], answers 422 for [`EXISTING_TOKEN`], and 401
/// for anything else.
pub struct FakeAuthenticator {
    api: Arc<FakeApi>,
    attempts: Mutex<Vec<Credentials>>,
}

impl FakeAuthenticator {
    pub fn new(api: FakeApi) -> Self {
        Self {
            api: Arc::new(api),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<Credentials> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.attempts.lock().unwrap().push(credentials.clone());
        match credentials.token.as_str() {
            GOOD_TOKEN => Ok(Session {
                login: LOGIN.to_string(),
                token: credentials.token.clone(),
                api: self.api.clone(),
            }),
            EXISTING_TOKEN => Err(AuthError::AlreadyExists),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

/// Records invocations and succeeds. A `git clone` creates the clone
/// directory so later scripts and books find it.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, SpawnError> {
        self.calls.lock().unwrap().push(invocation.clone());
        if invocation.program == "git" && invocation.args.first().map(String::as_str) == Some("clone")
        {
            if let Some(name) = invocation.args.get(2) {
                std::fs::create_dir_all(invocation.cwd.join(name)).unwrap();
            }
        }
        Ok(CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: format!("{invocation}\n"),
        })
    }
}

/// Console fed from a queue of input lines, collecting every output line.
#[derive(Clone, Default)]
pub struct ScriptedConsole {
    inputs: Arc<Mutex<VecDeque<String>>>,
    output: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConsole {
    pub fn push_input(&self, line: &str) {
        self.inputs.lock().unwrap().push_back(line.to_string());
    }

    /// Output printed since the last call.
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *self.output.lock().unwrap())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_input(&self, prompt: &str) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.inputs.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.next_input(prompt))
    }

    async fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.next_input(prompt))
    }

    fn print_line(&mut self, text: &str) {
        self.output
            .lock()
            .unwrap()
            .extend(text.lines().map(str::to_string));
    }
}

/// Preference store the test keeps a handle to.
#[derive(Clone, Default)]
pub struct SharedPreferences(Arc<MemoryPreferenceStore>);

impl PreferenceStore for SharedPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.0.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.0.delete(key)
    }
}

/// A shell wired to fakes, working inside a temp directory.
pub struct Harness {
    pub shell: Shell,
    pub console: ScriptedConsole,
    pub runner: Arc<RecordingRunner>,
    pub auth: Arc<FakeAuthenticator>,
    pub preferences: SharedPreferences,
    pub workdir: TempDir,
}

impl Harness {
    /// A logged-out shell.
    pub fn new(api: FakeApi) -> Self {
        let workdir = TempDir::new().unwrap();
        let console = ScriptedConsole::default();
        let runner = Arc::new(RecordingRunner::default());
        let auth = Arc::new(FakeAuthenticator::new(api));
        let preferences = SharedPreferences::default();

        let settings = EngineSettings::from_config(&ShellConfig::default(), workdir.path());
        let shell = Shell::new(
            auth.clone(),
            Box::new(preferences.clone()),
            BulkEngine::new(runner.clone(), settings),
            Box::new(console.clone()),
        );

        Self {
            shell,
            console,
            runner,
            auth,
            preferences,
            workdir,
        }
    }

    /// A shell logged in with [`GOOD_TOKEN`], output cleared.
    pub async fn logged_in(api: FakeApi) -> Self {
        let mut harness = Self::new(api);
        assert!(
            harness
                .shell
                .restore_session(Some(GOOD_TOKEN.to_string()))
                .await
        );
        harness.console.take_output();
        harness
    }

    /// Dispatches one line and returns what it printed.
    pub async fn line(&mut self, line: &str) -> Vec<String> {
        let flow = self.shell.handle(line).await.unwrap();
        assert_eq!(flow, Flow::Continue, "unexpected exit on {line:?}");
        self.console.take_output()
    }

    pub fn path(&self) -> &Path {
        self.workdir.path()
    }
}
