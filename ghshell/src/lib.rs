#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod api;
pub mod bulk;
pub mod catalog;
pub mod config;
pub mod matcher;
pub mod preferences;
pub mod process;
pub mod scope;
pub mod shell;
pub mod templates;

pub use api::{
    ApiError, AuthError, Authenticator, Credentials, GitHubApi, GitHubAuthenticator, HostingApi,
    ListPage, OrgListing, RepoListing, Session,
};
pub use bulk::{
    BatchLayout, BatchSummary, BulkEngine, EngineSettings, LogFile, Operation, OperationOutcome,
    OutcomeStatus, Placement, Target, TargetError,
};
pub use catalog::{drain_pages, Catalog, ContributorList, Drained, Organization, Repository};
pub use config::{BookConfig, ConfigError, ShellConfig, CONFIG_ENV};
pub use matcher::{
    assignment_prefix, derive_assignment_name, filter_names, resolve, MatchMode, MatchResult,
    Selector,
};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore,
};
pub use process::{CommandOutput, CommandRunner, Invocation, SpawnError, SystemRunner};
pub use scope::{Command, Level, ScopeError, ScopeStack, ScopeState};
pub use shell::{Console, Flow, HelpEntry, LaunchError, Shell, ShellError};
pub use templates::{create_handlebars_registry, BookPage, BookRenderer, TemplateError};
