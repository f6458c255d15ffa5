//! Remote hosting capabilities.
//!
//! The shell only needs three listings (organizations, repositories and
//! contributors) plus a way to turn credentials into an authenticated
//! [`Session`]. Both are traits so the catalog and the dispatcher can be
//! driven by in-memory providers in tests.

mod error;
mod github;
mod rate_limit;

pub use error::{ApiError, AuthError};
pub use github::{GitHubApi, GitHubAuthenticator};
pub use rate_limit::{ensure_core_rate_limit, CoreBudget};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// An organization visible to the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgListing {
    /// Organization login.
    pub login: String,
}

/// A repository as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoListing {
    /// Repository name.
    pub name: String,
    /// HTTPS clone URL.
    pub clone_url: String,
    /// Login of the owning user or organization.
    pub owner: String,
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Whether the provider reported another page after this one.
    pub has_next: bool,
}

impl<T> ListPage<T> {
    /// Creates a page that is the final one of its listing.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_next: false,
        }
    }
}

/// Paginated listing capability.
///
/// Pages are numbered from 1. Implementations return one page per call;
/// draining is the caller's job (see [`crate::catalog::drain_pages`]).
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Organizations the authenticated user belongs to.
    async fn organizations(&self, page: u32) -> Result<ListPage<OrgListing>, ApiError>;

    /// Repositories of an organization.
    async fn org_repositories(
        &self,
        org: &str,
        page: u32,
    ) -> Result<ListPage<RepoListing>, ApiError>;

    /// Repositories owned by the authenticated user.
    async fn owned_repositories(&self, page: u32) -> Result<ListPage<RepoListing>, ApiError>;

    /// Contributor logins of a repository.
    async fn contributors(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<ListPage<String>, ApiError>;
}

/// Credentials collected by `login` or restored from preferences.
#[derive(Clone)]
pub struct Credentials {
    /// Username typed by the user, if any.
    pub username: Option<String>,
    /// Personal access token.
    pub token: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: Option<String>, token: impl Into<String>) -> Self {
        Self {
            username,
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// An authenticated session.
#[derive(Clone)]
pub struct Session {
    /// Login of the authenticated account.
    pub login: String,
    /// Token that authenticated this session.
    pub token: String,
    /// Listing capability bound to this session.
    pub api: Arc<dyn HostingApi>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

/// Authentication capability.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchanges credentials for a session.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}
