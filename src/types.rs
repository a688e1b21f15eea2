//! Core types for ghprs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::Error;

/// A GitHub repository identity (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoId {
    /// Create a repository identity from owner and name parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::Usage(format!(
                "repository must be 'owner/repo', got '{s}'"
            ))),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A fresh snapshot of one pull request
///
/// Fetched anew on every evaluation pass; never merged with a previous
/// snapshot. The raw `mergeable` flag is advisory only (GitHub populates it
/// asynchronously) and must not be used as a blocking signal by itself;
/// `mergeable_state` is the authoritative branch-eligibility signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrSnapshot {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body/description (used as the squash commit message)
    pub body: Option<String>,
    /// Lifecycle state ("open", "closed")
    pub state: String,
    /// Whether the PR is a draft
    pub draft: bool,
    /// Web URL for the PR
    pub html_url: String,
    /// Author login
    pub author: String,
    /// Head commit SHA (check runs are attached to this)
    pub head_sha: String,
    /// Head branch name
    pub head_ref: String,
    /// Raw mergeability tri-state: `Some(true)`, `Some(false)`, or `None`
    /// while GitHub is still computing
    pub mergeable: Option<bool>,
    /// Branch merge eligibility: "clean", "blocked", "dirty", "unstable",
    /// "unknown", ...
    pub mergeable_state: String,
    /// GraphQL node ID (used for the ready-for-review mutation)
    pub node_id: Option<String>,
}

/// Final verdict attributed to one reviewer
///
/// Wire strings go through [`ReviewVerdict::parse`], which is where the
/// case-insensitivity lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    /// Reviewer approved the PR
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Reviewer commented without a verdict
    Commented,
    /// A prior verdict was dismissed
    Dismissed,
    /// Review started but not submitted
    Pending,
    /// Review was requested but nothing has been submitted yet
    Requested,
    /// Verdict string we do not recognize
    Unknown,
}

impl ReviewVerdict {
    /// Parse a verdict string case-insensitively; unrecognized input maps to
    /// [`ReviewVerdict::Unknown`]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            "REQUESTED" => Self::Requested,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ReviewVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Requested => "requested",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// One submitted review, in API (chronological) order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    /// Reviewer login
    pub reviewer: String,
    /// The submitted verdict
    pub verdict: ReviewVerdict,
}

impl ReviewSubmission {
    /// Convenience constructor
    pub fn new(reviewer: impl Into<String>, verdict: ReviewVerdict) -> Self {
        Self {
            reviewer: reviewer.into(),
            verdict,
        }
    }
}

/// Reviewers whose review is requested but not yet submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedReviewers {
    /// Requested user logins
    pub users: Vec<String>,
    /// Requested team names (display only, never counted)
    pub teams: Vec<String>,
}

/// Reduction of all review activity to one verdict per reviewer
#[derive(Debug, Clone, Default)]
pub struct ReviewSummary {
    /// Final verdict per reviewer identity (a later submission always
    /// supersedes an earlier one; requested-only identities show as
    /// [`ReviewVerdict::Requested`])
    pub verdicts: BTreeMap<String, ReviewVerdict>,
    /// Teams with an outstanding review request (display only)
    pub team_requests: Vec<String>,
    /// At least one reviewer's final verdict is APPROVED
    pub any_approved: bool,
    /// At least one reviewer's final verdict is CHANGES_REQUESTED
    pub any_changes_requested: bool,
}

/// One automated check run attached to a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name (e.g. "build", "test")
    pub name: String,
    /// "queued", "in_progress", or "completed"
    pub status: String,
    /// "success", "failure", "neutral", "cancelled", "skipped",
    /// "timed_out", "action_required"; absent until completed
    pub conclusion: Option<String>,
    /// Web URL for the run (display)
    pub html_url: Option<String>,
}

impl CheckRun {
    /// The state to display: conclusion once present, otherwise status
    pub fn display_state(&self) -> &str {
        match self.conclusion.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => &self.status,
        }
    }
}

/// The merge-readiness decision for one evaluation pass
///
/// Derived from a fresh snapshot plus the review and check summaries;
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct ReadinessDecision {
    /// Whether the PR may be merged right now
    pub ready: bool,
    /// One line per failing condition, in diagnostic priority order
    pub reasons: Vec<String>,
}

/// Options for a merge mutation
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Delete the head branch after a successful merge
    pub delete_branch: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            delete_branch: true,
        }
    }
}

/// Result of a merge mutation
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Whether the merge went through
    pub merged: bool,
    /// SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the API (especially on failure)
    pub message: Option<String>,
}

/// One entry in an author's PR listing
#[derive(Debug, Clone)]
pub struct PrListItem {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Lifecycle state
    pub state: String,
    /// Web URL
    pub html_url: String,
}

/// Everything one polling pass produced, handed to the renderer
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// The fresh snapshot this pass evaluated
    pub snapshot: PrSnapshot,
    /// Review reduction
    pub reviews: ReviewSummary,
    /// Raw check runs, for display
    pub checks: Vec<CheckRun>,
    /// The readiness decision
    pub decision: ReadinessDecision,
    /// Whether the session keeps polling after this pass
    pub watching: bool,
}
