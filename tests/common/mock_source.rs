//! Mock pull-request source for watch-loop tests
//!
//! Manually implements `PullRequestSource` with response queues, call
//! tracking, and error injection, so tests can script what successive polls
//! observe and verify which mutations were (or were not) attempted.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ghprs::error::{Error, Result};
use ghprs::platform::PullRequestSource;
use ghprs::types::{
    CheckRun, MergeOptions, MergeOutcome, PrListItem, PrSnapshot, RepoId, RequestedReviewers,
    ReviewSubmission,
};

/// Call record for `merge`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub pr_number: u64,
    pub delete_branch: bool,
}

/// Scriptable mock source
pub struct MockSource {
    repo: RepoId,
    /// Snapshots handed out in order; the last one repeats once drained
    snapshots: Mutex<VecDeque<PrSnapshot>>,
    reviews: Mutex<Vec<ReviewSubmission>>,
    requested: Mutex<RequestedReviewers>,
    checks: Mutex<Vec<CheckRun>>,
    merge_outcome: Mutex<MergeOutcome>,
    listing: Mutex<Vec<PrListItem>>,
    // Error injection
    error_on_snapshot: Mutex<Option<String>>,
    error_on_reviews: Mutex<Option<String>>,
    error_on_requested: Mutex<Option<String>>,
    error_on_checks: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
    error_on_mark_ready: Mutex<Option<String>>,
    // Call tracking
    snapshot_calls: Mutex<u64>,
    merge_calls: Mutex<Vec<MergeCall>>,
    mark_ready_calls: Mutex<Vec<u64>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            repo: RepoId::new("acme", "widgets"),
            snapshots: Mutex::new(VecDeque::new()),
            reviews: Mutex::new(Vec::new()),
            requested: Mutex::new(RequestedReviewers::default()),
            checks: Mutex::new(Vec::new()),
            merge_outcome: Mutex::new(MergeOutcome {
                merged: true,
                sha: Some("merged_sha".to_string()),
                message: None,
            }),
            listing: Mutex::new(Vec::new()),
            error_on_snapshot: Mutex::new(None),
            error_on_reviews: Mutex::new(None),
            error_on_requested: Mutex::new(None),
            error_on_checks: Mutex::new(None),
            error_on_merge: Mutex::new(None),
            error_on_mark_ready: Mutex::new(None),
            snapshot_calls: Mutex::new(0),
            merge_calls: Mutex::new(Vec::new()),
            mark_ready_calls: Mutex::new(Vec::new()),
        }
    }

    // === Scripting ===

    /// Queue a snapshot for the next fetch; the last queued one repeats
    pub fn push_snapshot(&self, snapshot: PrSnapshot) {
        self.snapshots.lock().unwrap().push_back(snapshot);
    }

    pub fn set_reviews(&self, reviews: Vec<ReviewSubmission>) {
        *self.reviews.lock().unwrap() = reviews;
    }

    pub fn set_requested(&self, requested: RequestedReviewers) {
        *self.requested.lock().unwrap() = requested;
    }

    pub fn set_checks(&self, checks: Vec<CheckRun>) {
        *self.checks.lock().unwrap() = checks;
    }

    pub fn set_merge_outcome(&self, outcome: MergeOutcome) {
        *self.merge_outcome.lock().unwrap() = outcome;
    }

    pub fn set_listing(&self, items: Vec<PrListItem>) {
        *self.listing.lock().unwrap() = items;
    }

    // === Error injection ===

    pub fn fail_snapshot(&self, msg: &str) {
        *self.error_on_snapshot.lock().unwrap() = Some(msg.to_string());
    }

    pub fn clear_snapshot_failure(&self) {
        *self.error_on_snapshot.lock().unwrap() = None;
    }

    pub fn fail_reviews(&self, msg: &str) {
        *self.error_on_reviews.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_requested(&self, msg: &str) {
        *self.error_on_requested.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_checks(&self, msg: &str) {
        *self.error_on_checks.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_mark_ready(&self, msg: &str) {
        *self.error_on_mark_ready.lock().unwrap() = Some(msg.to_string());
    }

    // === Verification ===

    pub fn snapshot_call_count(&self) -> u64 {
        *self.snapshot_calls.lock().unwrap()
    }

    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn mark_ready_calls(&self) -> Vec<u64> {
        self.mark_ready_calls.lock().unwrap().clone()
    }

    pub fn assert_merge_not_called(&self) {
        let calls = self.merge_calls();
        assert!(
            calls.is_empty(),
            "expected merge NOT to be called but got: {calls:?}"
        );
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Option<Error> {
    slot.lock().unwrap().as_ref().map(|msg| Error::GitHubApi(msg.clone()))
}

#[async_trait]
impl PullRequestSource for MockSource {
    async fn fetch_snapshot(&self, pr_number: u64) -> Result<PrSnapshot> {
        *self.snapshot_calls.lock().unwrap() += 1;
        if let Some(e) = injected(&self.error_on_snapshot) {
            return Err(e);
        }
        let mut queue = self.snapshots.lock().unwrap();
        let snapshot = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| panic!("no snapshot scripted for PR #{pr_number}"))
        };
        Ok(snapshot)
    }

    async fn fetch_reviews(&self, _pr_number: u64) -> Result<Vec<ReviewSubmission>> {
        if let Some(e) = injected(&self.error_on_reviews) {
            return Err(e);
        }
        Ok(self.reviews.lock().unwrap().clone())
    }

    async fn fetch_requested_reviewers(&self, _pr_number: u64) -> Result<RequestedReviewers> {
        if let Some(e) = injected(&self.error_on_requested) {
            return Err(e);
        }
        Ok(self.requested.lock().unwrap().clone())
    }

    async fn fetch_checks(&self, _commit_sha: &str) -> Result<Vec<CheckRun>> {
        if let Some(e) = injected(&self.error_on_checks) {
            return Err(e);
        }
        Ok(self.checks.lock().unwrap().clone())
    }

    async fn mark_ready(&self, pr_number: u64) -> Result<()> {
        self.mark_ready_calls.lock().unwrap().push(pr_number);
        if let Some(e) = injected(&self.error_on_mark_ready) {
            return Err(e);
        }
        Ok(())
    }

    async fn merge(&self, pr_number: u64, options: &MergeOptions) -> Result<MergeOutcome> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            pr_number,
            delete_branch: options.delete_branch,
        });
        if let Some(e) = injected(&self.error_on_merge) {
            return Err(e);
        }
        Ok(self.merge_outcome.lock().unwrap().clone())
    }

    async fn list_by_author(&self, _author: &str) -> Result<Vec<PrListItem>> {
        Ok(self.listing.lock().unwrap().clone())
    }

    fn repo(&self) -> &RepoId {
        &self.repo
    }
}
