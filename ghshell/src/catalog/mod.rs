//! In-memory index of organizations, repositories and contributors.
//!
//! The catalog is built once per session by draining every listing the
//! hosting API offers. Repositories are stored in listing order, which is
//! the order every match result is reported in.

mod model;
mod pagination;

pub use model::{ContributorList, Organization, Repository};
pub use pagination::{drain_pages, Drained};

use crate::api::{HostingApi, RepoListing};
use crate::scope::ScopeState;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

/// Organizations and owned repositories of the authenticated user.
#[derive(Default)]
pub struct Catalog {
    organizations: Vec<Organization>,
    owned: Vec<Repository>,
    contributor_fetches: JoinSet<()>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from every listing the API provides.
    ///
    /// Organizations, their repositories and the user's own repositories
    /// are drained before this returns. Contributors are fetched by
    /// background tasks, so repositories may report partial contributor
    /// lists for a while; see [`Catalog::settle_contributors`].
    ///
    /// A failing page stops pagination of its bucket only. Whatever was
    /// collected up to that point stays in the catalog.
    pub async fn populate(api: Arc<dyn HostingApi>) -> Self {
        let span = info_span!("populate_catalog");

        async {
            let mut catalog = Catalog::new();
            let provider: &dyn HostingApi = api.as_ref();

            let orgs = drain_pages(move |page| provider.organizations(page)).await;
            if let Some(error) = &orgs.error {
                warn!(bucket = "organizations", error = %error, "Stopped listing early");
            }

            for listing in orgs.items {
                let login = listing.login;
                let repos = {
                    let org: &str = &login;
                    drain_pages(move |page| provider.org_repositories(org, page)).await
                };
                if let Some(error) = &repos.error {
                    warn!(bucket = %login, error = %error, "Stopped listing early");
                }
                debug!(org = %login, count = repos.items.len(), "Listed organization repositories");

                let organization = catalog.insert_organization(&login);
                for repo in repos.items {
                    organization.insert_repository(Repository::from(repo));
                }
            }

            let owned = drain_pages(move |page| provider.owned_repositories(page)).await;
            if let Some(error) = &owned.error {
                warn!(bucket = "owned", error = %error, "Stopped listing early");
            }
            for repo in owned.items {
                catalog.insert_owned(repo);
            }

            catalog.spawn_contributor_fetches(&api);

            info!(
                organizations = catalog.organizations.len(),
                owned = catalog.owned.len(),
                "Catalog populated"
            );
            catalog
        }
        .instrument(span)
        .await
    }

    /// Adds an organization, or returns the existing one with that login.
    pub fn insert_organization(&mut self, login: &str) -> &mut Organization {
        let index = match self.organizations.iter().position(|o| o.login() == login) {
            Some(index) => index,
            None => {
                self.organizations.push(Organization::new(login));
                self.organizations.len() - 1
            }
        };
        &mut self.organizations[index]
    }

    /// Adds a repository owned by the user. Returns `false` on a duplicate name.
    pub fn insert_owned(&mut self, listing: RepoListing) -> bool {
        model::insert_unique(&mut self.owned, Repository::from(listing))
    }

    /// Organizations in listing order.
    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    /// Looks up an organization by exact login.
    pub fn organization(&self, login: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.login() == login)
    }

    /// Repositories owned by the user, in listing order.
    pub fn owned_repositories(&self) -> &[Repository] {
        &self.owned
    }

    /// Repositories visible from a scope.
    ///
    /// Inside an organization these are the organization's repositories;
    /// everywhere else the user's own.
    pub fn visible_repositories(&self, scope: &ScopeState) -> &[Repository] {
        match scope.org() {
            Some(login) => self
                .organization(login)
                .map(Organization::repositories)
                .unwrap_or(&[]),
            None => &self.owned,
        }
    }

    /// Finds a repository visible from a scope.
    pub fn find_repository(&self, scope: &ScopeState, name: &str) -> Option<&Repository> {
        model::find(self.visible_repositories(scope), name)
    }

    /// Waits for every background contributor fetch to finish.
    pub async fn settle_contributors(&mut self) {
        while let Some(result) = self.contributor_fetches.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Contributor fetch task failed");
            }
        }
    }

    fn spawn_contributor_fetches(&mut self, api: &Arc<dyn HostingApi>) {
        let repositories = self
            .organizations
            .iter()
            .flat_map(|o| o.repositories().iter())
            .chain(self.owned.iter());

        for repository in repositories {
            let api = Arc::clone(api);
            let owner = repository.owner.clone();
            let name = repository.name.clone();
            let contributors = repository.contributors.clone();

            self.contributor_fetches.spawn(async move {
                let provider: &dyn HostingApi = api.as_ref();
                let (owner_ref, name_ref) = (owner.as_str(), name.as_str());
                let drained =
                    drain_pages(move |page| provider.contributors(owner_ref, name_ref, page)).await;

                if let Some(error) = &drained.error {
                    debug!(repo = %name, error = %error, "Contributor listing incomplete");
                }
                contributors.extend(drained.items).await;
            });
        }
    }
}
