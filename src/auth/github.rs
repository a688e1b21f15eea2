//! GitHub token resolution
//!
//! Order: `GH_TOKEN`, then `GITHUB_TOKEN`, then `gh auth token`. Resolution
//! happens once, before any network call, and a missing credential is fatal.

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables consulted, in order.
const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// A resolved GitHub credential
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// The token value
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a GitHub token from the environment or the gh CLI.
///
/// Returns [`Error::CredentialMissing`] when neither yields a non-empty
/// value; callers must fail fast on that before touching the network.
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var, "using token from environment");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = gh_cli_token().await {
        debug!("using token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::CredentialMissing)
}

async fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
