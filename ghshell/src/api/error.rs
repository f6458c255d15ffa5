//! Hosting API error types.

use thiserror::Error;

/// Errors returned by the listing capability.
#[derive(Debug, Error)]
pub enum ApiError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The provider could not serve the request.
    #[error("Hosting provider unavailable: {message}")]
    Unavailable { message: String },
}

/// Errors returned by the authentication capability.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials were rejected (HTTP 401).
    #[error("Bad credentials")]
    Unauthorized,

    /// A token already exists for this account (HTTP 422).
    #[error("A token already exists for this account")]
    AlreadyExists,

    /// Any other rejection by the provider.
    #[error("Authentication rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Transport or client construction failure.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),
}

impl AuthError {
    /// Classifies an octocrab failure by its HTTP status.
    pub(crate) fn from_octocrab(error: octocrab::Error) -> Self {
        let rejection = match &error {
            octocrab::Error::GitHub { source, .. } => {
                Some((source.status_code.as_u16(), source.message.clone()))
            }
            _ => None,
        };

        match rejection {
            Some((401, _)) => AuthError::Unauthorized,
            Some((422, _)) => AuthError::AlreadyExists,
            Some((status, message)) => AuthError::Rejected { status, message },
            None => AuthError::GitHubError(error),
        }
    }
}
