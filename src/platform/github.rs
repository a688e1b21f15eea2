//! GitHub implementation of [`PullRequestSource`]
//!
//! Uses octocrab for the squash merge and the ready-for-review GraphQL
//! mutation; raw reqwest for the endpoints octocrab does not model the way we
//! need them (PR snapshot with `mergeable_state`, reviews, requested
//! reviewers, check runs, the author search, branch deletion).

use crate::error::{Error, Result};
use crate::platform::PullRequestSource;
use crate::types::{
    CheckRun, MergeOptions, MergeOutcome, PrListItem, PrSnapshot, RepoId, RequestedReviewers,
    ReviewSubmission, ReviewVerdict,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use urlencoding::encode;

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = "ghprs";

// Wire types for the raw REST endpoints

#[derive(Deserialize)]
struct PrWire {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    user: UserWire,
    head: HeadWire,
    #[serde(default)]
    mergeable: Option<bool>,
    #[serde(default)]
    mergeable_state: String,
    #[serde(default)]
    node_id: Option<String>,
}

#[derive(Deserialize, Default)]
struct UserWire {
    #[serde(default)]
    login: String,
}

#[derive(Deserialize)]
struct HeadWire {
    sha: String,
    #[serde(rename = "ref", default)]
    ref_field: String,
}

#[derive(Deserialize)]
struct ReviewWire {
    #[serde(default)]
    user: Option<UserWire>,
    #[serde(default)]
    state: String,
}

#[derive(Deserialize)]
struct SearchWire {
    #[serde(default)]
    items: Vec<SearchItemWire>,
}

#[derive(Deserialize)]
struct SearchItemWire {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Deserialize, Default)]
struct RequestedReviewersWire {
    #[serde(default)]
    users: Vec<UserWire>,
    #[serde(default)]
    teams: Vec<TeamWire>,
}

#[derive(Deserialize)]
struct TeamWire {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct CheckRunsWire {
    #[serde(default)]
    check_runs: Vec<CheckRunWire>,
}

#[derive(Deserialize)]
struct CheckRunWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    conclusion: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

// GraphQL response types for the ready-for-review mutation

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadyForReviewData {
    #[allow(dead_code)]
    mark_pull_request_ready_for_review: serde_json::Value,
}

impl From<PrWire> for PrSnapshot {
    fn from(pr: PrWire) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            state: pr.state,
            draft: pr.draft,
            html_url: pr.html_url,
            author: pr.user.login,
            head_sha: pr.head.sha,
            head_ref: pr.head.ref_field,
            mergeable: pr.mergeable,
            mergeable_state: pr.mergeable_state,
            node_id: pr.node_id,
        }
    }
}

/// GitHub service using octocrab plus raw HTTP
pub struct GitHubService {
    client: Octocrab,
    repo: RepoId,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base for raw requests (overridable for tests)
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service against api.github.com
    pub fn new(token: &str, repo: RepoId) -> Result<Self> {
        Self::with_api_base(token, repo, GITHUB_API.to_string())
    }

    fn with_api_base(token: &str, repo: RepoId, api_base: String) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if api_base != GITHUB_API {
            builder = builder
                .base_uri(&api_base)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }
        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::GitHubApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            repo,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{path}",
            self.api_base, self.repo.owner, self.repo.repo
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::GitHubApi(format!("{status} for {url}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// Delete the head branch after a merge. Best effort: the branch may
    /// already be gone or protected, and the merge itself has succeeded.
    async fn delete_branch(&self, branch: &str) {
        let url = self.repo_url(&format!("git/refs/heads/{branch}"));
        let result = self
            .http_client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                debug!(branch, "deleted head branch");
            }
            Ok(response) => {
                debug!(branch, status = %response.status(), "branch delete refused");
            }
            Err(e) => {
                debug!(branch, error = %e, "branch delete failed");
            }
        }
    }
}

#[async_trait]
impl PullRequestSource for GitHubService {
    async fn fetch_snapshot(&self, pr_number: u64) -> Result<PrSnapshot> {
        debug!(pr_number, "fetching PR snapshot");
        let wire: PrWire = self.get_json(&self.repo_url(&format!("pulls/{pr_number}"))).await?;
        let snapshot = PrSnapshot::from(wire);
        debug!(
            pr_number,
            state = %snapshot.state,
            mergeable_state = %snapshot.mergeable_state,
            "fetched PR snapshot"
        );
        Ok(snapshot)
    }

    async fn fetch_reviews(&self, pr_number: u64) -> Result<Vec<ReviewSubmission>> {
        debug!(pr_number, "fetching reviews");
        let wire: Vec<ReviewWire> = self
            .get_json(&self.repo_url(&format!("pulls/{pr_number}/reviews")))
            .await?;

        let submissions: Vec<ReviewSubmission> = wire
            .into_iter()
            .filter_map(|review| {
                // Reviews from deleted accounts come back with a null user
                let reviewer = review.user.map(|u| u.login)?;
                if reviewer.is_empty() {
                    return None;
                }
                Some(ReviewSubmission {
                    reviewer,
                    verdict: ReviewVerdict::parse(&review.state),
                })
            })
            .collect();
        debug!(pr_number, count = submissions.len(), "fetched reviews");
        Ok(submissions)
    }

    async fn fetch_requested_reviewers(&self, pr_number: u64) -> Result<RequestedReviewers> {
        debug!(pr_number, "fetching requested reviewers");
        let wire: RequestedReviewersWire = self
            .get_json(&self.repo_url(&format!("pulls/{pr_number}/requested_reviewers")))
            .await?;
        Ok(RequestedReviewers {
            users: wire.users.into_iter().map(|u| u.login).collect(),
            teams: wire.teams.into_iter().map(|t| t.name).collect(),
        })
    }

    async fn fetch_checks(&self, commit_sha: &str) -> Result<Vec<CheckRun>> {
        debug!(commit_sha, "fetching check runs");
        let wire: CheckRunsWire = self
            .get_json(&self.repo_url(&format!("commits/{commit_sha}/check-runs")))
            .await?;
        let runs: Vec<CheckRun> = wire
            .check_runs
            .into_iter()
            .map(|run| CheckRun {
                name: run.name,
                status: run.status,
                conclusion: run.conclusion,
                html_url: run.html_url,
            })
            .collect();
        debug!(commit_sha, count = runs.len(), "fetched check runs");
        Ok(runs)
    }

    async fn mark_ready(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "marking PR ready for review");
        // The GraphQL mutation addresses the PR by node ID
        let snapshot = self.fetch_snapshot(pr_number).await?;
        let node_id = snapshot.node_id.as_ref().ok_or_else(|| {
            Error::GitHubApi("PR missing node_id for GraphQL mutation".to_string())
        })?;

        let response: GraphQlResponse<MarkReadyForReviewData> = self
            .client
            .graphql(&serde_json::json!({
                "query": r"
                    mutation MarkPullRequestReadyForReview($pullRequestId: ID!) {
                        markPullRequestReadyForReview(input: { pullRequestId: $pullRequestId }) {
                            pullRequest { number isDraft }
                        }
                    }
                ",
                "variables": {
                    "pullRequestId": node_id
                }
            }))
            .await
            .map_err(|e| Error::GitHubApi(format!("GraphQL mutation failed: {e}")))?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        response
            .data
            .ok_or_else(|| Error::GitHubApi("no data in GraphQL response".to_string()))?;

        debug!(pr_number, "marked PR ready for review");
        Ok(())
    }

    async fn merge(&self, pr_number: u64, options: &MergeOptions) -> Result<MergeOutcome> {
        debug!(pr_number, "merging PR");

        // Fresh details: the squash commit uses the PR title and body
        let snapshot = self.fetch_snapshot(pr_number).await?;

        let pulls = self.client.pulls(&self.repo.owner, &self.repo.repo);
        let mut builder = pulls
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Squash)
            .title(format!("{} (#{pr_number})", snapshot.title));
        if let Some(ref body) = snapshot.body {
            builder = builder.message(body);
        }
        let result = builder.send().await?;

        let outcome = MergeOutcome {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        if outcome.merged && options.delete_branch && !snapshot.head_ref.is_empty() {
            self.delete_branch(&snapshot.head_ref).await;
        }

        debug!(pr_number, merged = outcome.merged, sha = ?outcome.sha, "merge complete");
        Ok(outcome)
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<PrListItem>> {
        debug!(author, "listing PRs by author");
        let query = format!("repo:{} is:pr author:{author}", self.repo);
        let url = format!("{}/search/issues?q={}", self.api_base, encode(&query));
        let wire: SearchWire = self.get_json(&url).await?;

        let items: Vec<PrListItem> = wire
            .items
            .into_iter()
            .map(|item| PrListItem {
                number: item.number,
                title: item.title,
                state: item.state,
                html_url: item.html_url,
            })
            .collect();
        debug!(author, count = items.len(), "listed PRs by author");
        Ok(items)
    }

    fn repo(&self) -> &RepoId {
        &self.repo
    }
}
