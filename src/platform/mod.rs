//! Platform access for pull-request data and mutations
//!
//! The watch loop talks to GitHub only through [`PullRequestSource`], which
//! keeps the decision logic testable against a mock.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CheckRun, MergeOptions, MergeOutcome, PrListItem, PrSnapshot, RepoId, RequestedReviewers,
    ReviewSubmission,
};
use async_trait::async_trait;

/// Data source and mutation executor for one repository's pull requests
///
/// Fetch methods return fresh data on every call; implementations must not
/// cache across calls, because the watch loop relies on each poll seeing the
/// current remote state.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch a fresh snapshot of the PR
    async fn fetch_snapshot(&self, pr_number: u64) -> Result<PrSnapshot>;

    /// Fetch all review submissions in chronological (API) order
    async fn fetch_reviews(&self, pr_number: u64) -> Result<Vec<ReviewSubmission>>;

    /// Fetch reviewers with an outstanding review request
    ///
    /// Callers treat a failure here as "no requests" rather than aborting the
    /// evaluation; approvals already fetched are not discarded because this
    /// secondary signal is unavailable.
    async fn fetch_requested_reviewers(&self, pr_number: u64) -> Result<RequestedReviewers>;

    /// Fetch the check runs attached to a commit
    ///
    /// Callers must fail closed: an error here means not-green, never
    /// vacuously passing.
    async fn fetch_checks(&self, commit_sha: &str) -> Result<Vec<CheckRun>>;

    /// Convert a draft PR to ready-for-review
    async fn mark_ready(&self, pr_number: u64) -> Result<()>;

    /// Squash-merge the PR
    async fn merge(&self, pr_number: u64, options: &MergeOptions) -> Result<MergeOutcome>;

    /// List PRs in the repository by author login (newest first)
    async fn list_by_author(&self, author: &str) -> Result<Vec<PrListItem>>;

    /// The repository this source is bound to
    fn repo(&self) -> &RepoId;
}
