//! CLI for ghshell.
//!
//! Starts an interactive shell over the authenticated user's GitHub
//! organizations and repositories, reading commands from stdin.

use async_trait::async_trait;
use clap::Parser;
use ghshell::{
    BulkEngine, Console, EngineSettings, FilePreferenceStore, GitHubAuthenticator, LaunchError,
    Shell, ShellConfig, SystemRunner,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ghshell - Browse GitHub organizations and clone, script or document repositories in bulk.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory clones, logs and books are written under.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Maximum repositories processed at once (overrides the config file).
    #[arg(long)]
    concurrency: Option<usize>,

    /// GitHub Personal Access Token. Used instead of the stored token and never saved.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Diagnostics go to stderr so they never mix with shell output, and default
/// to warnings only; use `RUST_LOG=info` or `RUST_LOG=debug` for more.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<(), LaunchError> {
    let config = ShellConfig::discover(args.config.as_deref())?;
    let preferences_path = config
        .preferences_path()
        .ok_or(LaunchError::NoPreferencesPath)?;

    let mut settings = EngineSettings::from_config(&config, args.workdir);
    if let Some(concurrency) = args.concurrency {
        settings = settings.with_concurrency(concurrency);
    }

    let mut shell = Shell::new(
        Arc::new(GitHubAuthenticator::new(
            config.api_base.clone(),
            config.per_page,
        )),
        Box::new(FilePreferenceStore::new(preferences_path)),
        BulkEngine::new(Arc::new(SystemRunner), settings),
        Box::new(StdConsole::new()),
    );

    print_banner();
    shell.restore_session(args.token).await;
    shell.run().await?;
    println!();
    Ok(())
}

fn print_banner() {
    println!("----------------------------");
    println!("|          GHSHELL         |");
    println!("----------------------------");
    println!("Type `help` for the available commands.");
    println!();
}

/// Console over the process's stdin and stdout.
struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
    interactive: bool,
}

impl StdConsole {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            interactive: io::stdin().is_terminal(),
        }
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        self.lines.next_line().await
    }

    async fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        // Piped input has no terminal to hide the echo on.
        if !self.interactive {
            return self.read_line(prompt).await;
        }

        let prompt = prompt.to_string();
        let secret = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
            .await
            .map_err(io::Error::other)??;
        Ok(Some(secret))
    }

    fn print_line(&mut self, text: &str) {
        println!("{text}");
    }
}
