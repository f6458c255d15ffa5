//! Selector grammar.
//!
//! A selector is a regular expression only when written in delimited form,
//! `/pattern/flags`, with flags drawn from `gimsuyx`. Anything else, and
//! any delimited pattern that fails to compile, is a literal name.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Flags accepted after the closing delimiter.
const KNOWN_FLAGS: &str = "gimsuyx";

/// A parsed selector.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Delimited regular expression.
    Pattern(Regex),
    /// Plain name.
    Literal(String),
}

impl Selector {
    /// Parses user input into a selector.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match split_delimited(raw).and_then(|(pattern, flags)| compile(pattern, flags)) {
            Some(regex) => Selector::Pattern(regex),
            None => Selector::Literal(raw.to_string()),
        }
    }

    /// Whether this selector is a regular expression.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        matches!(self, Selector::Pattern(_))
    }
}

/// Splits `/pattern/flags` into its parts.
fn split_delimited(raw: &str) -> Option<(&str, &str)> {
    let body = raw.strip_prefix('/')?;
    let close = body.rfind('/')?;
    let (pattern, flags) = (&body[..close], &body[close + 1..]);

    if pattern.is_empty() || !flags.chars().all(|c| KNOWN_FLAGS.contains(c)) {
        return None;
    }
    Some((pattern, flags))
}

/// Compiles a pattern, mapping flags onto regex options.
///
/// `g`, `u` and `y` have no effect on a whole-name test and are accepted
/// for familiarity only.
fn compile(pattern: &str, flags: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()
        .map_err(|e| debug!(pattern, error = %e, "Treating selector as literal"))
        .ok()
}
