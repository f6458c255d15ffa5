//! Assignment grouping.
//!
//! An assignment is never stored: it is the dash-delimited name prefix a
//! set of repositories share, e.g. `hw1` for `hw1-alice` and `hw1-bob`.

/// Prefix of a repository name up to the first `-`.
#[must_use]
pub fn assignment_prefix(name: &str) -> &str {
    name.split('-').next().unwrap_or(name)
}

/// Derives the folder name for a group of matched repositories.
///
/// The name is the tokens (split on `-`) common to every match, in the
/// order they appear in the first match. With a single match, or when
/// the matches share no token, the first match's leading token is used.
#[must_use]
pub fn derive_assignment_name(matches: &[String]) -> Option<String> {
    let (first, rest) = matches.split_first()?;
    let leading = assignment_prefix(first).to_string();

    if rest.is_empty() {
        return Some(leading);
    }

    let common: Vec<&str> = first
        .split('-')
        .filter(|token| !token.is_empty())
        .filter(|token| rest.iter().all(|name| name.split('-').any(|t| t == *token)))
        .collect();

    if common.is_empty() {
        Some(leading)
    } else {
        Some(common.join("-"))
    }
}
