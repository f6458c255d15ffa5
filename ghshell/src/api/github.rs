//! GitHub implementation of the hosting capabilities, backed by octocrab.

use super::rate_limit::ensure_core_rate_limit;
use super::{
    ApiError, AuthError, Authenticator, Credentials, HostingApi, ListPage, OrgListing,
    RepoListing, Session,
};
use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Query for plain paginated endpoints.
#[derive(Debug, Serialize)]
struct PageQuery {
    per_page: u8,
    page: u32,
}

/// Query for `/user/repos`, restricted to repositories the user owns.
#[derive(Debug, Serialize)]
struct OwnedReposQuery {
    affiliation: &'static str,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct OrgItem {
    login: String,
}

#[derive(Debug, Deserialize)]
struct OwnerItem {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    name: String,
    clone_url: Option<String>,
    owner: Option<OwnerItem>,
}

#[derive(Debug, Deserialize)]
struct ContributorItem {
    login: String,
}

impl RepoItem {
    fn into_listing(self, fallback_owner: &str) -> RepoListing {
        let owner = self
            .owner
            .map(|o| o.login)
            .unwrap_or_else(|| fallback_owner.to_string());
        let clone_url = self
            .clone_url
            .unwrap_or_else(|| format!("https://github.com/{owner}/{}.git", self.name));

        RepoListing {
            name: self.name,
            clone_url,
            owner,
        }
    }
}

/// Listing capability over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubApi {
    octocrab: Octocrab,
    per_page: u8,
    login: String,
}

impl GitHubApi {
    /// Wraps an authenticated client.
    pub fn new(octocrab: Octocrab, login: impl Into<String>, per_page: u8) -> Self {
        Self {
            octocrab,
            per_page,
            login: login.into(),
        }
    }

    async fn fetch_page<T, Q>(&self, route: &str, query: &Q) -> Result<ListPage<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync,
    {
        ensure_core_rate_limit(&self.octocrab).await?;
        debug!(route, "Fetching page");

        let page: Page<T> = self.octocrab.get(route, Some(query)).await?;
        Ok(ListPage {
            has_next: page.next.is_some(),
            items: page.items,
        })
    }

    fn page_query(&self, page: u32) -> PageQuery {
        PageQuery {
            per_page: self.per_page,
            page,
        }
    }
}

#[async_trait]
impl HostingApi for GitHubApi {
    async fn organizations(&self, page: u32) -> Result<ListPage<OrgListing>, ApiError> {
        let orgs: ListPage<OrgItem> = self.fetch_page("/user/orgs", &self.page_query(page)).await?;
        Ok(ListPage {
            has_next: orgs.has_next,
            items: orgs
                .items
                .into_iter()
                .map(|o| OrgListing { login: o.login })
                .collect(),
        })
    }

    async fn org_repositories(
        &self,
        org: &str,
        page: u32,
    ) -> Result<ListPage<RepoListing>, ApiError> {
        let route = format!("/orgs/{org}/repos");
        let repos: ListPage<RepoItem> = self.fetch_page(&route, &self.page_query(page)).await?;
        Ok(ListPage {
            has_next: repos.has_next,
            items: repos
                .items
                .into_iter()
                .map(|r| r.into_listing(org))
                .collect(),
        })
    }

    async fn owned_repositories(&self, page: u32) -> Result<ListPage<RepoListing>, ApiError> {
        let query = OwnedReposQuery {
            affiliation: "owner",
            per_page: self.per_page,
            page,
        };
        let repos: ListPage<RepoItem> = self.fetch_page("/user/repos", &query).await?;
        Ok(ListPage {
            has_next: repos.has_next,
            items: repos
                .items
                .into_iter()
                .map(|r| r.into_listing(&self.login))
                .collect(),
        })
    }

    async fn contributors(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<ListPage<String>, ApiError> {
        let route = format!("/repos/{owner}/{repo}/contributors");
        let contributors: ListPage<ContributorItem> =
            self.fetch_page(&route, &self.page_query(page)).await?;
        Ok(ListPage {
            has_next: contributors.has_next,
            items: contributors.items.into_iter().map(|c| c.login).collect(),
        })
    }
}

/// Token authentication against GitHub.
///
/// A session is established by calling `GET /user` with the token; the
/// returned login becomes the session owner.
#[derive(Debug, Clone)]
pub struct GitHubAuthenticator {
    api_base: Option<String>,
    per_page: u8,
}

impl GitHubAuthenticator {
    /// Creates an authenticator for api.github.com or an enterprise root.
    pub fn new(api_base: Option<String>, per_page: u8) -> Self {
        Self { api_base, per_page }
    }

    fn build_client(&self, token: &str) -> Result<Octocrab, octocrab::Error> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(base) = &self.api_base {
            builder = builder.base_uri(base.as_str())?;
        }
        builder.build()
    }
}

#[async_trait]
impl Authenticator for GitHubAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let octocrab = self.build_client(&credentials.token)?;
        let user = octocrab
            .current()
            .user()
            .await
            .map_err(AuthError::from_octocrab)?;

        if let Some(username) = &credentials.username {
            if !username.eq_ignore_ascii_case(&user.login) {
                warn!(
                    typed = %username,
                    login = %user.login,
                    "Token belongs to a different account than the typed user"
                );
            }
        }

        info!(login = %user.login, "Authenticated");
        let api = GitHubApi::new(octocrab, user.login.clone(), self.per_page);
        Ok(Session {
            login: user.login,
            token: credentials.token.clone(),
            api: Arc::new(api),
        })
    }
}
