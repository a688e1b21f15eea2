//! Check summarization - pure reduction of check runs to green/not-green
//!
//! One red or unfinished check blocks the whole request regardless of how
//! many others are green. Callers that fail to fetch check data must treat
//! the result as not-green (fail closed), never as vacuously passing.

use crate::types::CheckRun;

/// Conclusions that count as passing for a completed run.
const PASSING_CONCLUSIONS: [&str; 3] = ["success", "neutral", "skipped"];

/// Whether every check run has completed with a passing conclusion.
///
/// Short-circuits on the first run whose status is not "completed" or whose
/// conclusion falls outside {success, neutral, skipped}, case-insensitively.
/// An empty check set is vacuously green.
#[must_use]
pub fn all_green(runs: &[CheckRun]) -> bool {
    runs.iter().all(|run| {
        if !run.status.eq_ignore_ascii_case("completed") {
            return false;
        }
        run.conclusion.as_deref().is_some_and(|conclusion| {
            PASSING_CONCLUSIONS
                .iter()
                .any(|ok| conclusion.eq_ignore_ascii_case(ok))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, status: &str, conclusion: Option<&str>) -> CheckRun {
        CheckRun {
            name: name.to_string(),
            status: status.to_string(),
            conclusion: conclusion.map(ToString::to_string),
            html_url: None,
        }
    }

    #[test]
    fn empty_set_is_vacuously_green() {
        assert!(all_green(&[]));
    }

    #[test]
    fn neutral_and_success_are_green() {
        let runs = [
            run("lint", "completed", Some("neutral")),
            run("build", "completed", Some("success")),
        ];
        assert!(all_green(&runs));
    }

    #[test]
    fn in_progress_forces_not_green() {
        let runs = [
            run("build", "completed", Some("success")),
            run("test", "in_progress", None),
            run("lint", "completed", Some("success")),
        ];
        assert!(!all_green(&runs));
    }

    #[test]
    fn one_failure_blocks_everything() {
        let runs = [
            run("build", "completed", Some("success")),
            run("test", "completed", Some("failure")),
        ];
        assert!(!all_green(&runs));
    }

    #[test]
    fn skipped_passes_cancelled_does_not() {
        assert!(all_green(&[run("a", "completed", Some("skipped"))]));
        assert!(!all_green(&[run("a", "completed", Some("cancelled"))]));
        assert!(!all_green(&[run("a", "completed", Some("timed_out"))]));
        assert!(!all_green(&[run("a", "completed", Some("action_required"))]));
    }

    #[test]
    fn completed_without_conclusion_is_not_green() {
        assert!(!all_green(&[run("a", "completed", None)]));
        assert!(!all_green(&[run("a", "completed", Some(""))]));
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert!(all_green(&[run("a", "COMPLETED", Some("Success"))]));
    }
}
