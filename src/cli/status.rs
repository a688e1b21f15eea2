//! Status command - render PR status, drive the watch session
//!
//! All terminal output for the status command lives here; the watch loop in
//! the library decides when to draw, this module decides how it looks.

use anstream::println;
use chrono::Local;
use ghprs::error::Result;
use ghprs::notify::DesktopNotifier;
use ghprs::platform::PullRequestSource;
use ghprs::types::{ReviewVerdict, StatusReport};
use ghprs::watch::{
    POLL_INTERVAL, StatusView, WatchOptions, WatchOutcome, WatchSession, spawn_command_reader,
};
use tokio::sync::mpsc;

use crate::cli::style::{Stylize, check_state_rank, colorize_state, link};

/// Console renderer for watch passes
struct ConsoleView;

impl StatusView for ConsoleView {
    fn begin_pass(&self) {
        // Clear screen, cursor home
        print!("\x1b[H\x1b[2J");
    }

    fn render(&self, report: &StatusReport) {
        render_report(report);
    }

    fn message(&self, text: &str) {
        println!("{text}");
    }
}

/// Run the status command for one PR, one-shot or watching.
pub async fn run_pr_status(
    source: &dyn PullRequestSource,
    pr_number: u64,
    watch: bool,
) -> Result<WatchOutcome> {
    let notifier = DesktopNotifier;
    let view = ConsoleView;
    let options = WatchOptions {
        watch,
        poll_interval: POLL_INTERVAL,
    };
    let mut session = WatchSession::new(source, &notifier, &view, pr_number, options);

    let mut commands = if watch {
        spawn_command_reader()
    } else {
        // One-shot never reads commands; a closed channel keeps run() simple
        let (_tx, rx) = mpsc::channel(1);
        rx
    };

    session.run(&mut commands).await
}

/// List a repository's PRs by author login.
pub async fn run_author_listing(source: &dyn PullRequestSource, author: &str) -> Result<()> {
    let items = source.list_by_author(author).await?;
    if items.is_empty() {
        println!("{}", format!("no PRs by {author} in {}", source.repo()).muted());
        return Ok(());
    }
    for item in items {
        println!(
            "{} {} ({})",
            link(&format!("#{}", item.number), &item.html_url),
            item.title,
            colorize_state(&item.state)
        );
    }
    Ok(())
}

fn render_report(report: &StatusReport) {
    let snapshot = &report.snapshot;

    println!(
        "{} {} ({})",
        link(&format!("#{}", snapshot.number), &snapshot.html_url),
        snapshot.title,
        colorize_state(&snapshot.state)
    );
    println!("Author: {}", snapshot.author);

    println!("Reviewers:");
    if report.reviews.verdicts.is_empty() && report.reviews.team_requests.is_empty() {
        println!("  {}", "(none)".muted());
    }
    for (reviewer, verdict) in &report.reviews.verdicts {
        println!(
            "  - {reviewer} ({})",
            colorize_state(&verdict.to_string())
        );
    }
    for team in &report.reviews.team_requests {
        println!(
            "  - Team: {team} ({})",
            ReviewVerdict::Requested.to_string().warn()
        );
    }

    if !report.checks.is_empty() {
        // Failures first, then the in-between states, successes last
        let mut rows: Vec<_> = report.checks.iter().collect();
        rows.sort_by(|a, b| {
            check_state_rank(a.display_state())
                .cmp(&check_state_rank(b.display_state()))
                .then_with(|| a.name.cmp(&b.name))
        });

        println!("GitHub Actions:");
        for run in rows {
            println!(
                "  - {}: {}",
                link(&run.name, run.html_url.as_deref().unwrap_or_default()),
                colorize_state(run.display_state())
            );
        }
    }

    if report.watching {
        println!();
        if snapshot.draft {
            println!("{}", "PR is in DRAFT mode".warn());
            println!("{}", "Type 'ready' to mark it as ready for review".accent());
            println!("{}", "Type 'merge' to attempt merge anyway".accent());
        } else if report.decision.ready {
            println!("{}", "PR is READY to merge!".success());
            println!("{}", "Type 'merge' to merge now".accent());
        } else {
            println!("{}", "Waiting for PR to be ready...".warn());
            for reason in &report.decision.reasons {
                println!("  {}", format!("- {reason}").muted());
            }
            println!("{}", "Type 'merge' to attempt merge anyway".accent());
        }
        println!();
        println!(
            "{} {}",
            Local::now().format("%H:%M:%S"),
            "refreshing in 60s...".muted()
        );
    }
}
