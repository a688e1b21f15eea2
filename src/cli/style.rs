//! Terminal styling helpers for the CLI
//!
//! Coloring is unconditional here; output goes through `anstream`, which
//! strips escape sequences when stdout is not a terminal.

use owo_colors::OwoColorize;
use terminal_link::Link;

/// Convenience styling methods for anything displayable
pub trait Stylize: std::fmt::Display {
    /// De-emphasized secondary text
    fn muted(&self) -> String {
        format!("{}", self.dimmed())
    }

    /// Emphasized text
    fn emphasis(&self) -> String {
        format!("{}", self.bold())
    }

    /// Highlighted value (names, numbers)
    fn accent(&self) -> String {
        format!("{}", self.bright_cyan())
    }

    /// Positive outcome
    fn success(&self) -> String {
        format!("{}", self.bright_green())
    }

    /// Something needing attention
    fn warn(&self) -> String {
        format!("{}", self.yellow())
    }

    /// Failure
    fn error(&self) -> String {
        format!("{}", self.bright_red())
    }
}

impl<T: std::fmt::Display> Stylize for T {}

/// Color a review/check/PR state string by its severity.
///
/// Green for passing/open states, red for failing/closed states, yellow for
/// the in-between ones, unstyled for anything unrecognized.
pub fn colorize_state(state: &str) -> String {
    match state.to_ascii_lowercase().as_str() {
        "success" | "approved" | "open" => state.success(),
        "failure" | "changes_requested" | "closed" => state.error(),
        "cancelled" | "skipped" | "neutral" | "requested" | "in_progress" | "queued"
        | "action_required" | "timed_out" | "pending" => state.warn(),
        _ => state.to_string(),
    }
}

/// OSC 8 hyperlink when the terminal supports it, plain text otherwise.
pub fn link(text: &str, url: &str) -> String {
    if url.is_empty() || !supports_hyperlinks::supports_hyperlinks() {
        text.to_string()
    } else {
        Link::new(text, url).to_string()
    }
}

/// Sort rank for check-run display: failures first, successes last.
pub fn check_state_rank(state: &str) -> u8 {
    match state.to_ascii_lowercase().as_str() {
        "failure" | "timed_out" | "action_required" => 0,
        "success" => 2,
        _ => 1,
    }
}
