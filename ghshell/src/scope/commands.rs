//! Shell commands and the per-level command table.

use std::fmt;

/// Every command the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Login,
    Logout,
    Orgs,
    Repos,
    Clone,
    Script,
    Book,
    Pwd,
    Assignments,
    Owner,
    Back,
    Exit,
}

impl Command {
    /// All commands, in help order.
    pub const ALL: [Command; 13] = [
        Command::Help,
        Command::Login,
        Command::Logout,
        Command::Orgs,
        Command::Repos,
        Command::Back,
        Command::Clone,
        Command::Script,
        Command::Assignments,
        Command::Book,
        Command::Owner,
        Command::Pwd,
        Command::Exit,
    ];

    /// The word typed to invoke this command.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Login => "login",
            Command::Logout => "logout",
            Command::Orgs => "orgs",
            Command::Repos => "repos",
            Command::Clone => "clone",
            Command::Script => "script",
            Command::Book => "book",
            Command::Pwd => "pwd",
            Command::Assignments => "assignments",
            Command::Owner => "owner",
            Command::Back => "back",
            Command::Exit => "exit",
        }
    }

    /// Parses a command word. Matching is exact.
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == word)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Navigation level, which determines the valid command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Main,
    Org,
    Repo,
}

const MAIN_COMMANDS: &[Command] = &[
    Command::Help,
    Command::Login,
    Command::Logout,
    Command::Orgs,
    Command::Repos,
    Command::Clone,
    Command::Script,
    Command::Book,
    Command::Pwd,
    Command::Assignments,
    Command::Exit,
];

const ORG_COMMANDS: &[Command] = &[
    Command::Back,
    Command::Clone,
    Command::Repos,
    Command::Assignments,
    Command::Script,
    Command::Book,
    Command::Exit,
    Command::Help,
];

const REPO_COMMANDS: &[Command] = &[
    Command::Back,
    Command::Clone,
    Command::Script,
    Command::Owner,
    Command::Book,
    Command::Exit,
    Command::Help,
];

impl Level {
    /// Commands valid at this level, in table order.
    #[must_use]
    pub fn commands(self) -> &'static [Command] {
        match self {
            Level::Main => MAIN_COMMANDS,
            Level::Org => ORG_COMMANDS,
            Level::Repo => REPO_COMMANDS,
        }
    }

    /// Whether `command` may run at this level.
    #[must_use]
    pub fn allows(self, command: Command) -> bool {
        self.commands().contains(&command)
    }
}
