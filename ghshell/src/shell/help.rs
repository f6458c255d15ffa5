//! Help text for every command.

use crate::scope::Command;
use std::fmt;

/// Description and usage lines of one command.
#[derive(Debug, Clone, Copy)]
pub struct HelpEntry {
    pub command: Command,
    pub description: &'static [&'static str],
    pub usage: &'static [&'static str],
}

impl HelpEntry {
    /// Usage lines joined for an error message.
    pub fn usage_line(&self) -> String {
        self.usage.join(" | ")
    }
}

impl fmt::Display for HelpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.command)?;
        for line in self.description {
            writeln!(f, "    {line}")?;
        }
        for (i, line) in self.usage.iter().enumerate() {
            let label = if i == 0 { "usage:" } else { "      " };
            writeln!(f, "    {label} {line}")?;
        }
        Ok(())
    }
}

/// Help for `command`.
#[must_use]
pub fn entry(command: Command) -> HelpEntry {
    let (description, usage): (&[&str], &[&str]) = match command {
        Command::Help => (
            &["show help for the commands available here"],
            &["help", "help <command>"],
        ),
        Command::Login => (&["sign in to GitHub with a personal access token"], &["login"]),
        Command::Logout => (&["sign out and forget the stored token"], &["logout"]),
        Command::Orgs => (
            &[
                "enter one of your organizations",
                "list your organizations",
                "list the organizations matching a name or /regexp/",
            ],
            &["orgs", "orgs -l", "orgs <name | /regexp/>"],
        ),
        Command::Repos => (
            &[
                "enter a repository",
                "list the repositories in scope",
                "list the repositories matching a name or /regexp/",
            ],
            &["repos", "repos -l", "repos <name | /regexp/>"],
        ),
        Command::Back => (
            &["leave the current repository or organization"],
            &["back"],
        ),
        Command::Clone => (
            &[
                "clone the current repository",
                "clone the repositories matching a name or /regexp/",
            ],
            &["clone", "clone <name | /regexp/>"],
        ),
        Command::Script => (
            &[
                "run a script inside the current repository's clone",
                "run a script inside the clones matching a name or /regexp/",
                "each line runs as its own shell command",
            ],
            &["script <file>", "script <file> <name | /regexp/>"],
        ),
        Command::Assignments => (
            &[
                "list the assignment matching a prefix or /regexp/",
                "clone, script or build a book for every repository of the assignment",
            ],
            &[
                "assignments <prefix | /regexp/>",
                "assignments <prefix | /regexp/> clone",
                "assignments <prefix | /regexp/> script <file>",
                "assignments <prefix | /regexp/> book",
            ],
        ),
        Command::Book => (
            &[
                "build a book from the current repository's logs",
                "build books for the repositories matching a name or /regexp/",
            ],
            &["book", "book <name | /regexp/>"],
        ),
        Command::Owner => (
            &["show the owner and contributors of the current repository"],
            &["owner"],
        ),
        Command::Pwd => (&["show the current scope path"], &["pwd"]),
        Command::Exit => (&["leave ghshell"], &["exit"]),
    };

    HelpEntry {
        command,
        description,
        usage,
    }
}
