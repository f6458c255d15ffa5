mod common;

use common::{FakeApi, Harness, EXISTING_TOKEN, GOOD_TOKEN, LOGIN};
use ghshell::preferences::{TOKEN_KEY, USERNAME_KEY};
use ghshell::{Flow, Level, PreferenceStore, ScopeState};

fn owned_repos() -> FakeApi {
    FakeApi::new().with_owned(&["repo1", "repo2"])
}

fn classroom() -> FakeApi {
    FakeApi::new()
        .with_org("acme", &["hw1-alice", "hw1-bob", "project-carol"])
        .with_owned(&["repo1"])
}

async fn enter_acme(harness: &mut Harness) {
    harness.console.push_input("acme");
    harness.line("orgs").await;
    assert_eq!(
        harness.shell.scope().state(),
        &ScopeState::InOrg("acme".to_string())
    );
}

#[tokio::test]
async fn clone_by_name_spawns_exactly_one_clone() {
    let mut harness = Harness::logged_in(owned_repos()).await;

    let output = harness.line("clone repo1").await;

    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "git");
    assert_eq!(
        calls[0].args,
        vec!["clone", "https://github.com/octocat/repo1.git", "repo1"]
    );
    assert!(harness.path().join("repo1-clone.log").is_file());
    assert!(output[0].starts_with("✔ repo1"));
    assert_eq!(output.last().unwrap(), "1 succeeded, 0 failed");
}

#[tokio::test]
async fn clone_without_matches_reports_not_found() {
    let mut harness = Harness::logged_in(owned_repos()).await;

    let output = harness.line("clone /nope/").await;

    assert_eq!(output, vec!["repository not found: /nope/"]);
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn clone_by_pattern_reports_in_catalog_order() {
    let mut harness = Harness::logged_in(owned_repos()).await;

    let output = harness.line("clone /repo[12]/").await;

    assert!(output[0].starts_with("✔ repo1"), "{output:?}");
    assert!(output[1].starts_with("✔ repo2"), "{output:?}");
    assert_eq!(output.last().unwrap(), "2 succeeded, 0 failed");

    let mut cloned: Vec<String> = harness
        .runner
        .calls()
        .iter()
        .map(|c| c.args[2].clone())
        .collect();
    cloned.sort();
    assert_eq!(cloned, vec!["repo1", "repo2"]);
}

#[tokio::test]
async fn assignment_clone_groups_into_org_folder() {
    let mut harness = Harness::logged_in(classroom()).await;
    enter_acme(&mut harness).await;

    let output = harness.line("assignments hw1 clone").await;

    let folder = harness.path().join("acme").join("hw1");
    assert!(folder.is_dir());
    assert!(folder.join("hw1-alice").is_dir());
    assert!(folder.join("hw1-bob").is_dir());
    assert!(folder.join("hw1-alice-clone.log").is_file());

    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.cwd == folder));
    assert_eq!(output.last().unwrap(), "2 succeeded, 0 failed");
}

#[tokio::test]
async fn assignments_without_action_lists_members() {
    let mut harness = Harness::logged_in(classroom()).await;
    enter_acme(&mut harness).await;

    let output = harness.line("assignments hw1").await;

    assert_eq!(output, vec!["hw1 (2 repositories)", "hw1-alice", "hw1-bob"]);
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn navigation_round_trip_returns_to_main() {
    let mut harness = Harness::logged_in(classroom()).await;
    enter_acme(&mut harness).await;
    assert_eq!(harness.shell.prompt(), "ghshell:acme > ");

    harness.console.push_input("hw1-alice");
    harness.line("repos").await;
    assert_eq!(harness.shell.prompt(), "ghshell:acme/hw1-alice > ");
    assert_eq!(
        harness.line("pwd").await,
        vec!["Unsupported command: pwd"]
    );

    harness.line("back").await;
    assert_eq!(harness.shell.prompt(), "ghshell:acme > ");
    assert_eq!(
        harness.line("pwd").await,
        vec!["Unsupported command: pwd"]
    );
    harness.line("back").await;
    assert_eq!(harness.line("pwd").await, vec!["/"]);

    assert_eq!(harness.shell.scope().state(), &ScopeState::Main);
    assert_eq!(
        harness.shell.scope().valid_commands(),
        Level::Main.commands()
    );

    // Already at the top.
    harness.line("back").await;
    assert_eq!(harness.shell.scope().state(), &ScopeState::Main);
}

#[tokio::test]
async fn inside_repository_clone_needs_no_selector() {
    let mut harness = Harness::logged_in(classroom()).await;
    enter_acme(&mut harness).await;
    harness.console.push_input("project-carol");
    harness.line("repos").await;

    harness.line("clone").await;

    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[2], "project-carol");
    assert_eq!(calls[0].cwd, harness.path().join("acme"));
}

#[tokio::test]
async fn empty_answer_cancels_navigation() {
    let mut harness = Harness::logged_in(classroom()).await;

    harness.console.push_input("");
    let output = harness.line("orgs").await;

    assert!(output.is_empty());
    assert_eq!(harness.shell.scope().state(), &ScopeState::Main);
}

#[tokio::test]
async fn unknown_organization_leaves_scope_unchanged() {
    let mut harness = Harness::logged_in(classroom()).await;

    harness.console.push_input("globex");
    let output = harness.line("orgs").await;

    assert_eq!(output, vec!["organization not found: globex"]);
    assert_eq!(harness.shell.scope().state(), &ScopeState::Main);
}

#[tokio::test]
async fn listing_flags_and_selectors() {
    let mut harness = Harness::logged_in(classroom()).await;

    assert_eq!(harness.line("orgs -l").await, vec!["acme"]);
    assert_eq!(harness.line("orgs /ac/").await, vec!["acme"]);
    assert_eq!(harness.line("repos -l").await, vec!["repo1"]);

    enter_acme(&mut harness).await;
    assert_eq!(
        harness.line("repos -l").await,
        vec!["hw1-alice", "hw1-bob", "project-carol"]
    );
    assert_eq!(
        harness.line("repos /^hw1-/").await,
        vec!["hw1-alice", "hw1-bob"]
    );
    assert_eq!(
        harness.line("repos hw1").await,
        vec!["repository not found: hw1"]
    );
}

#[tokio::test]
async fn unsupported_commands_are_reported() {
    let mut harness = Harness::logged_in(classroom()).await;

    assert_eq!(
        harness.line("owner").await,
        vec!["Unsupported command: owner"]
    );
    assert_eq!(
        harness.line("frobnicate now").await,
        vec!["Unsupported command: frobnicate"]
    );

    enter_acme(&mut harness).await;
    assert_eq!(
        harness.line("login").await,
        vec!["Unsupported command: login"]
    );
}

#[tokio::test]
async fn script_before_clone_asks_to_clone_first() {
    let mut harness = Harness::logged_in(owned_repos()).await;
    let script = harness.path().join("setup.sh");
    std::fs::write(&script, "echo hello\n").unwrap();

    let output = harness
        .line(&format!("script {} repo1", script.display()))
        .await;

    assert!(output[0].contains("clone first"), "{output:?}");
    assert_eq!(output.last().unwrap(), "0 succeeded, 1 failed");
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn script_after_clone_runs_every_line() {
    let mut harness = Harness::logged_in(owned_repos()).await;
    let script = harness.path().join("setup.sh");
    std::fs::write(&script, "# install\nmake deps\nmake test\n").unwrap();

    harness.line("clone repo1").await;
    let output = harness
        .line(&format!("script '{}' repo1", script.display()))
        .await;

    assert_eq!(output.last().unwrap(), "1 succeeded, 0 failed");
    let lines: Vec<String> = harness
        .runner
        .calls()
        .iter()
        .skip(1)
        .map(|c| c.args[1].clone())
        .collect();
    assert_eq!(lines, vec!["make deps", "make test"]);
    assert!(harness.path().join("repo1-setup.log").is_file());
    assert!(harness.path().join("repo1").join("setup.sh").is_file());
}

#[tokio::test]
async fn script_needs_a_file() {
    let mut harness = Harness::logged_in(owned_repos()).await;

    let output = harness.line("script").await;
    assert!(output[0].starts_with("Usage: script <file>"));

    let output = harness.line("script missing.sh repo1").await;
    assert_eq!(output, vec!["script not found: missing.sh"]);
}

#[tokio::test]
async fn commands_need_a_session() {
    let mut harness = Harness::new(owned_repos());

    assert_eq!(
        harness.line("clone repo1").await,
        vec!["Not logged in, use `login` first"]
    );
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn login_retries_after_bad_credentials() {
    let mut harness = Harness::new(owned_repos());
    for input in [LOGIN, "ghp_wrong", LOGIN, GOOD_TOKEN] {
        harness.console.push_input(input);
    }

    let output = harness.line("login").await;

    assert_eq!(harness.auth.attempts().len(), 2);
    assert!(output[0].starts_with("Bad credentials"));
    assert_eq!(output.last().unwrap(), &format!("Logged in as {LOGIN}"));
    assert!(harness.shell.session().is_some());
    assert_eq!(
        harness.preferences.get(TOKEN_KEY).unwrap().as_deref(),
        Some(GOOD_TOKEN)
    );
    assert_eq!(
        harness.preferences.get(USERNAME_KEY).unwrap().as_deref(),
        Some(LOGIN)
    );
    assert_eq!(
        harness.console.prompts(),
        vec!["User: ", "Token: ", "User: ", "Token: "]
    );
}

#[tokio::test]
async fn login_gives_up_after_three_attempts() {
    let mut harness = Harness::new(owned_repos());
    for _ in 0..3 {
        harness.console.push_input(LOGIN);
        harness.console.push_input("ghp_wrong");
    }

    let output = harness.line("login").await;

    assert_eq!(harness.auth.attempts().len(), 3);
    assert_eq!(output.last().unwrap(), "Login failed: Bad credentials");
    assert!(harness.shell.session().is_none());
}

#[tokio::test]
async fn existing_token_is_informational() {
    let mut harness = Harness::new(owned_repos());
    harness.console.push_input(LOGIN);
    harness.console.push_input(EXISTING_TOKEN);

    let output = harness.line("login").await;

    assert_eq!(output, vec!["A token already exists for this account"]);
    assert_eq!(harness.auth.attempts().len(), 1);
}

#[tokio::test]
async fn stored_token_restores_session() {
    let mut harness = Harness::new(owned_repos());
    harness.preferences.set(TOKEN_KEY, GOOD_TOKEN).unwrap();
    harness.preferences.set(USERNAME_KEY, LOGIN).unwrap();

    assert!(harness.shell.restore_session(None).await);

    let attempts = harness.auth.attempts();
    assert_eq!(attempts[0].username.as_deref(), Some(LOGIN));
    assert_eq!(
        harness.console.take_output(),
        vec![format!("Logged in as {LOGIN}")]
    );
    assert_eq!(harness.line("repos -l").await, vec!["repo1", "repo2"]);
}

#[tokio::test]
async fn without_stored_token_nothing_is_attempted() {
    let mut harness = Harness::new(owned_repos());

    assert!(!harness.shell.restore_session(None).await);
    assert!(harness.auth.attempts().is_empty());
}

#[tokio::test]
async fn logout_forgets_everything() {
    let mut harness = Harness::new(classroom());
    harness.console.push_input(LOGIN);
    harness.console.push_input(GOOD_TOKEN);
    harness.line("login").await;
    enter_acme(&mut harness).await;
    harness.line("back").await;

    assert_eq!(harness.line("logout").await, vec!["Logged out"]);

    assert!(harness.shell.session().is_none());
    assert!(harness.shell.catalog().organizations().is_empty());
    assert_eq!(harness.shell.scope().state(), &ScopeState::Main);
    assert!(harness.preferences.get(TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn owner_shows_repository_owner() {
    let mut harness = Harness::logged_in(classroom()).await;
    enter_acme(&mut harness).await;
    harness.console.push_input("hw1-bob");
    harness.line("repos").await;

    let output = harness.line("owner").await;

    assert_eq!(output[0], "Owner: acme");
    assert!(output[1].starts_with("Contributors: "));
}

#[tokio::test]
async fn help_follows_the_current_level() {
    let mut harness = Harness::logged_in(classroom()).await;

    let output = harness.line("help").await;
    assert!(output.contains(&"login".to_string()));
    assert!(!output.contains(&"owner".to_string()));

    assert_eq!(
        harness.line("help owner").await,
        vec!["Unsupported command: owner"]
    );

    let output = harness.line("help clone").await;
    assert_eq!(output[0], "clone");
}

#[tokio::test]
async fn exit_stops_the_shell() {
    let mut harness = Harness::logged_in(classroom()).await;

    assert_eq!(harness.shell.handle("exit").await.unwrap(), Flow::Exit);
    assert_eq!(harness.shell.handle("   ").await.unwrap(), Flow::Continue);
}

#[tokio::test]
async fn run_reads_until_exit() {
    let mut harness = Harness::logged_in(owned_repos()).await;
    for input in ["pwd", "exit", "pwd"] {
        harness.console.push_input(input);
    }

    harness.shell.run().await.unwrap();

    assert_eq!(harness.console.take_output(), vec!["/"]);
    assert_eq!(harness.console.prompts(), vec!["ghshell > ", "ghshell > "]);
}
