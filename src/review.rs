//! Review summarization - pure reduction of review activity
//!
//! Collapses a chronological sequence of review submissions into one final
//! verdict per reviewer, then aggregates to the two booleans the readiness
//! decision consumes. No I/O happens here.

use crate::types::{RequestedReviewers, ReviewSubmission, ReviewSummary, ReviewVerdict};

/// Reduce review submissions and outstanding review requests to a
/// [`ReviewSummary`].
///
/// Submissions arrive in API order, which is chronological, so a plain
/// last-write-wins fold per reviewer identity is correct: a reviewer who
/// requested changes and later approved counts as approved. Requested
/// reviewers are unioned in as [`ReviewVerdict::Requested`] only when that
/// identity has no submission; a pending request never downgrades a
/// submitted verdict. Team requests are carried for display and never
/// contribute to the aggregate booleans.
#[must_use]
pub fn summarize_reviews(
    submissions: &[ReviewSubmission],
    requested: &RequestedReviewers,
) -> ReviewSummary {
    let mut summary = ReviewSummary::default();

    for submission in submissions {
        summary
            .verdicts
            .insert(submission.reviewer.clone(), submission.verdict);
    }

    for user in &requested.users {
        summary
            .verdicts
            .entry(user.clone())
            .or_insert(ReviewVerdict::Requested);
    }

    summary.team_requests = requested.teams.clone();
    summary.any_approved = summary
        .verdicts
        .values()
        .any(|v| *v == ReviewVerdict::Approved);
    summary.any_changes_requested = summary
        .verdicts
        .values()
        .any(|v| *v == ReviewVerdict::ChangesRequested);

    summary
}
