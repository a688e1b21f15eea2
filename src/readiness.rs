//! Merge-readiness evaluation - the pure decision function
//!
//! Total and side-effect free: hand it a snapshot and the two summaries and
//! it produces the decision plus one reason line per failing condition, in
//! diagnostic priority order. The raw `mergeable` tri-state is advisory only
//! (GitHub populates it late) and never blocks on its own; `mergeable_state`
//! is what must read "clean".

use crate::types::{PrSnapshot, ReadinessDecision, ReviewSummary};

/// Evaluate whether a PR may be merged right now.
///
/// Pure conjunction of five conditions, checked in reason-priority order:
///
/// 1. the PR is open,
/// 2. `mergeable_state` is "clean",
/// 3. no reviewer's final verdict is CHANGES_REQUESTED,
/// 4. at least one reviewer's final verdict is APPROVED,
/// 5. every check run is green.
///
/// `ready` is true iff `reasons` comes back empty.
#[must_use]
pub fn evaluate(
    snapshot: &PrSnapshot,
    reviews: &ReviewSummary,
    checks_green: bool,
) -> ReadinessDecision {
    let mut reasons = Vec::new();

    if !snapshot.state.eq_ignore_ascii_case("open") {
        reasons.push(format!("PR is {} (must be open)", snapshot.state));
    }
    if !snapshot.mergeable_state.eq_ignore_ascii_case("clean") {
        reasons.push(format!(
            "mergeable state: {} (must be clean)",
            snapshot.mergeable_state
        ));
    }
    if reviews.any_changes_requested {
        reasons.push("changes requested by reviewers".to_string());
    }
    if !reviews.any_approved {
        reasons.push("missing required approvals".to_string());
    }
    if !checks_green {
        reasons.push("checks are not all passing".to_string());
    }

    ReadinessDecision {
        ready: reasons.is_empty(),
        reasons,
    }
}
