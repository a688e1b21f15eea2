//! Error types for ghprs

use thiserror::Error as ThisError;

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the crate surfaces
#[derive(Debug, ThisError)]
pub enum Error {
    /// No token could be resolved; fatal before any network call
    #[error("no GitHub credential: set GH_TOKEN/GITHUB_TOKEN or run 'gh auth login'")]
    CredentialMissing,

    /// The GitHub API refused or failed a request
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// A response arrived but could not be decoded
    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    /// Error from the octocrab client (boxed, the type is large)
    #[error(transparent)]
    Octocrab(#[from] Box<octocrab::Error>),

    /// Invalid invocation or arguments
    #[error("{0}")]
    Usage(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::Octocrab(Box::new(e))
    }
}
