//! Target selection.
//!
//! Resolves a selector against the names visible from the current scope.
//! Results keep catalog insertion order; sorting is left to callers.

mod assignment;
mod selector;

pub use assignment::{assignment_prefix, derive_assignment_name};
pub use selector::Selector;

use crate::catalog::Catalog;
use crate::scope::ScopeState;

/// Names satisfying a selector, in catalog order. May be empty.
pub type MatchResult = Vec<String>;

/// How literal selectors are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Name equals the selector.
    Exact,
    /// Name's prefix before the first `-` equals the selector.
    Assignment,
}

/// Filters `names` by a parsed selector.
///
/// Patterns match when they are found anywhere in the name; the mode only
/// affects literal selectors.
pub fn filter_names<'a, I>(selector: &Selector, names: I, mode: MatchMode) -> MatchResult
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| match selector {
            Selector::Pattern(regex) => regex.is_match(name),
            Selector::Literal(literal) => match mode {
                MatchMode::Exact => name == literal,
                MatchMode::Assignment => assignment_prefix(name) == literal,
            },
        })
        .map(str::to_string)
        .collect()
}

/// Resolves a selector against the repositories visible from `scope`.
///
/// Without a selector, a scope inside a repository resolves to that
/// repository and any other scope to nothing.
pub fn resolve(
    selector: Option<&str>,
    scope: &ScopeState,
    catalog: &Catalog,
    mode: MatchMode,
) -> MatchResult {
    let Some(raw) = selector else {
        return scope.repository().map(str::to_string).into_iter().collect();
    };

    let names = catalog
        .visible_repositories(scope)
        .iter()
        .map(|r| r.name.as_str());
    filter_names(&Selector::parse(raw), names, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RepoListing;
    use crate::catalog::Repository;

    fn listing(owner: &str, name: &str) -> RepoListing {
        RepoListing {
            name: name.to_string(),
            clone_url: format!("https://github.com/{owner}/{name}.git"),
            owner: owner.to_string(),
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let org = catalog.insert_organization("acme");
        for name in ["proj-b", "proj-a", "other-c", "proj"] {
            org.insert_repository(Repository::from(listing("acme", name)));
        }
        for name in ["repo1", "repo2"] {
            catalog.insert_owned(listing("me", name));
        }
        catalog
    }

    fn in_acme() -> ScopeState {
        ScopeState::InOrg("acme".to_string())
    }

    #[test]
    fn pattern_returns_every_match_in_insertion_order() {
        let result = resolve(Some("/^proj-/"), &in_acme(), &catalog(), MatchMode::Exact);
        assert_eq!(result, vec!["proj-b", "proj-a"]);
    }

    #[test]
    fn pattern_is_a_search_not_a_full_match() {
        let result = resolve(Some("/th/"), &in_acme(), &catalog(), MatchMode::Exact);
        assert_eq!(result, vec!["other-c"]);
    }

    #[test]
    fn exact_literal_matches_one_name() {
        let result = resolve(Some("proj-a"), &in_acme(), &catalog(), MatchMode::Exact);
        assert_eq!(result, vec!["proj-a"]);

        let result = resolve(Some("proj-z"), &in_acme(), &catalog(), MatchMode::Exact);
        assert!(result.is_empty());
    }

    #[test]
    fn assignment_literal_matches_prefix() {
        let mut catalog = Catalog::new();
        let org = catalog.insert_organization("acme");
        for name in ["proj-a", "proj-b", "other-c"] {
            org.insert_repository(Repository::from(listing("acme", name)));
        }

        let result = resolve(Some("proj"), &in_acme(), &catalog, MatchMode::Assignment);
        assert_eq!(result, vec!["proj-a", "proj-b"]);
    }

    #[test]
    fn scope_limits_visible_names() {
        let result = resolve(Some("/repo/"), &ScopeState::Main, &catalog(), MatchMode::Exact);
        assert_eq!(result, vec!["repo1", "repo2"]);

        let result = resolve(Some("/repo/"), &in_acme(), &catalog(), MatchMode::Exact);
        assert!(result.is_empty());
    }

    #[test]
    fn missing_selector_uses_current_repository() {
        let scope = ScopeState::InOrgRepo("acme".to_string(), "proj-a".to_string());
        let result = resolve(None, &scope, &catalog(), MatchMode::Exact);
        assert_eq!(result, vec!["proj-a"]);

        let result = resolve(None, &in_acme(), &catalog(), MatchMode::Assignment);
        assert!(result.is_empty());
    }

    #[test]
    fn filter_names_works_on_any_name_set() {
        let orgs = ["acme", "acme-labs", "globex"];
        let result = filter_names(&Selector::parse("/^acme/"), orgs, MatchMode::Exact);
        assert_eq!(result, vec!["acme", "acme-labs"]);
    }
}
