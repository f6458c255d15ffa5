//! Catalog entities.

use crate::api::RepoListing;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Contributor logins of a repository, filled in the background.
///
/// Clones share the same list, so a fetch that completes after the
/// repository was handed out is still visible to every holder.
#[derive(Debug, Clone, Default)]
pub struct ContributorList(Arc<RwLock<Vec<String>>>);

impl ContributorList {
    /// Returns the logins known so far. May be incomplete while loading.
    pub async fn snapshot(&self) -> Vec<String> {
        self.0.read().await.clone()
    }

    pub(crate) async fn extend(&self, logins: impl IntoIterator<Item = String>) {
        self.0.write().await.extend(logins);
    }
}

/// A repository known to the catalog.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Repository name, unique within its containing bucket.
    pub name: String,
    /// HTTPS clone URL.
    pub clone_url: String,
    /// Owning user or organization login.
    pub owner: String,
    /// Contributors; see [`ContributorList`].
    pub contributors: ContributorList,
}

impl From<RepoListing> for Repository {
    fn from(listing: RepoListing) -> Self {
        Self {
            name: listing.name,
            clone_url: listing.clone_url,
            owner: listing.owner,
            contributors: ContributorList::default(),
        }
    }
}

/// An organization and its repositories in listing order.
#[derive(Debug, Clone)]
pub struct Organization {
    login: String,
    repositories: Vec<Repository>,
}

impl Organization {
    /// Creates an organization with no repositories.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            repositories: Vec::new(),
        }
    }

    /// Organization login.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Repositories in insertion order.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Looks up a repository by exact, case-sensitive name.
    pub fn repository(&self, name: &str) -> Option<&Repository> {
        find(&self.repositories, name)
    }

    /// Adds a repository unless one with the same name exists.
    ///
    /// Returns `false` when the name was already taken.
    pub fn insert_repository(&mut self, repository: Repository) -> bool {
        insert_unique(&mut self.repositories, repository)
    }
}

pub(crate) fn find<'a>(repositories: &'a [Repository], name: &str) -> Option<&'a Repository> {
    repositories.iter().find(|r| r.name == name)
}

pub(crate) fn insert_unique(repositories: &mut Vec<Repository>, repository: Repository) -> bool {
    if find(repositories, &repository.name).is_some() {
        return false;
    }
    repositories.push(repository);
    true
}
