//! Watch loop - poll, render, notify on transition, react to commands
//!
//! The control loop alternates between a Polling pass (fetch fresh data, run
//! the summarizers and the readiness evaluation, render, notify on a
//! false→true transition) and a bounded wait that races a timer against one
//! line of operator input. Mutations ("merge", "ready") always re-fetch
//! before acting; the last poll is never trusted because the command may
//! arrive long after it.

use std::time::Duration;

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, warn};

use crate::checks::all_green;
use crate::error::Result;
use crate::notify::Notifier;
use crate::platform::PullRequestSource;
use crate::readiness::evaluate;
use crate::review::summarize_reviews;
use crate::types::{MergeOptions, ReadinessDecision, RequestedReviewers, StatusReport};

/// Default interval between polling passes in watch mode
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Pause after reporting a refused or failed mutation, so the operator can
/// read the output before the next pass clears the screen
const REPORT_PAUSE: Duration = Duration::from_secs(3);

/// Operator command, classified from one trimmed, case-insensitive input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Attempt a squash merge now
    Merge,
    /// Convert a draft PR to ready-for-review
    Ready,
    /// Anything unrecognized; ignored without re-polling
    Noop,
}

impl Command {
    /// Classify one line of operator input
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "merge" => Self::Merge,
            "ready" => Self::Ready,
            _ => Self::Noop,
        }
    }
}

/// Renderer the watch loop hands each pass's data to
///
/// Rendering is plumbing; the loop only decides *when* to draw. The CLI
/// implements this with colors and hyperlinks, tests with a recording stub.
pub trait StatusView: Send + Sync {
    /// Called at the start of each polling pass (e.g. clear the screen)
    fn begin_pass(&self) {}

    /// Render one full status report
    fn render(&self, report: &StatusReport);

    /// Print a one-off line (errors, mutation results)
    fn message(&self, text: &str);
}

/// Options for a watch session
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Keep polling (false = one-shot: terminate after a single pass)
    pub watch: bool,
    /// Interval between polling passes
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            watch: false,
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Why the control loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A merge went through; one merge per invocation
    Merged,
    /// One-shot pass completed
    OneShot,
}

/// Whether the loop keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// Re-enter polling
    Continue,
    /// The session is done
    Finished,
}

/// One `status --pr N` session: identity, collaborators, and the only piece
/// of mutable state the loop owns (`last_ready`)
pub struct WatchSession<'a> {
    source: &'a dyn PullRequestSource,
    notifier: &'a dyn Notifier,
    view: &'a dyn StatusView,
    pr_number: u64,
    options: WatchOptions,
    /// Last known readiness; owned exclusively by this loop, so a ready →
    /// not-ready → ready cycle re-notifies on each rising edge
    last_ready: bool,
}

impl<'a> WatchSession<'a> {
    /// Create a session over the given collaborators
    pub fn new(
        source: &'a dyn PullRequestSource,
        notifier: &'a dyn Notifier,
        view: &'a dyn StatusView,
        pr_number: u64,
        options: WatchOptions,
    ) -> Self {
        Self {
            source,
            notifier,
            view,
            pr_number,
            options,
            last_ready: false,
        }
    }

    /// Run the session to completion.
    ///
    /// In one-shot mode this is a single polling pass. In watch mode the loop
    /// polls, then waits on whichever fires first: the poll timer or an
    /// operator command from `commands`. Fetch and mutation failures are
    /// reported and the loop continues; only a successful merge ends it.
    pub async fn run(&mut self, commands: &mut Receiver<String>) -> Result<WatchOutcome> {
        loop {
            self.view.begin_pass();
            match self.poll_pass().await {
                Ok(_) => {}
                Err(e) if self.options.watch => {
                    // Transient: report and keep watching
                    self.view.message(&format!("error: {e}"));
                }
                Err(e) => return Err(e),
            }

            if !self.options.watch {
                return Ok(WatchOutcome::OneShot);
            }

            if let Some(command) = self.await_command(commands).await
                && self.run_command(command).await == SessionStep::Finished
            {
                return Ok(WatchOutcome::Merged);
            }
        }
    }

    /// One Polling pass: fetch fresh, evaluate, render, notify on the
    /// false→true edge, and update `last_ready` unconditionally.
    pub async fn poll_pass(&mut self) -> Result<ReadinessDecision> {
        let report = self.fetch_report().await?;
        self.view.render(&report);

        if report.decision.ready && !self.last_ready {
            self.notifier
                .notify(&format!("PR #{} is READY to merge", report.snapshot.number));
        }
        self.last_ready = report.decision.ready;

        Ok(report.decision)
    }

    /// Execute one already-classified operator command.
    pub async fn run_command(&mut self, command: Command) -> SessionStep {
        match command {
            Command::Merge => self.execute_merge().await,
            Command::Ready => {
                self.execute_ready().await;
                SessionStep::Continue
            }
            Command::Noop => SessionStep::Continue,
        }
    }

    /// Block until either one actionable command line arrives or the poll
    /// timer fires. Unrecognized lines re-enter the wait without re-polling.
    async fn await_command(&self, commands: &mut Receiver<String>) -> Option<Command> {
        loop {
            tokio::select! {
                () = tokio::time::sleep(self.options.poll_interval) => return None,
                line = commands.recv() => match line {
                    Some(line) => match Command::parse(&line) {
                        Command::Noop => debug!(line, "ignoring unrecognized command"),
                        command => return Some(command),
                    },
                    None => {
                        // Input closed (EOF / non-interactive): timer only
                        tokio::time::sleep(self.options.poll_interval).await;
                        return None;
                    }
                }
            }
        }
    }

    /// Fetch everything fresh and evaluate.
    ///
    /// A failed requested-reviewers fetch degrades to empty rather than
    /// discarding the verdicts already fetched; a failed check fetch is an
    /// error so callers never read "green" out of missing data.
    async fn fetch_report(&self) -> Result<StatusReport> {
        let snapshot = self.source.fetch_snapshot(self.pr_number).await?;
        let submissions = self.source.fetch_reviews(self.pr_number).await?;
        let requested = match self.source.fetch_requested_reviewers(self.pr_number).await {
            Ok(requested) => requested,
            Err(e) => {
                warn!(error = %e, "requested reviewers unavailable, continuing without");
                RequestedReviewers::default()
            }
        };
        // Check runs hang off the head commit, so this fetch cannot start
        // until the snapshot is known.
        let checks = self.source.fetch_checks(&snapshot.head_sha).await?;

        let reviews = summarize_reviews(&submissions, &requested);
        let decision = evaluate(&snapshot, &reviews, all_green(&checks));

        Ok(StatusReport {
            snapshot,
            reviews,
            checks,
            decision,
            watching: self.options.watch,
        })
    }

    async fn execute_merge(&mut self) -> SessionStep {
        let report = match self.fetch_report().await {
            Ok(report) => report,
            Err(e) => {
                self.view.message(&format!("error fetching PR: {e}"));
                self.pause().await;
                return SessionStep::Continue;
            }
        };

        if !report.decision.ready {
            self.view.message("PR is NOT ready to merge:");
            for reason in &report.decision.reasons {
                self.view.message(&format!("  - {reason}"));
            }
            self.pause().await;
            return SessionStep::Continue;
        }

        self.view
            .message(&format!("merging PR #{} with squash...", self.pr_number));
        match self
            .source
            .merge(self.pr_number, &MergeOptions::default())
            .await
        {
            Ok(outcome) if outcome.merged => {
                self.view.message("squash merge completed successfully");
                SessionStep::Finished
            }
            Ok(outcome) => {
                let detail = outcome.message.unwrap_or_else(|| "no detail".to_string());
                self.view.message(&format!("merge refused: {detail}"));
                self.pause().await;
                SessionStep::Continue
            }
            Err(e) => {
                self.view.message(&format!("merge failed: {e}"));
                self.pause().await;
                SessionStep::Continue
            }
        }
    }

    async fn execute_ready(&mut self) {
        let snapshot = match self.source.fetch_snapshot(self.pr_number).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.view.message(&format!("error fetching PR: {e}"));
                self.pause().await;
                return;
            }
        };

        if !snapshot.draft {
            self.view
                .message("PR is already ready for review (not a draft)");
            self.pause().await;
            return;
        }

        self.view
            .message(&format!("marking PR #{} as ready for review...", self.pr_number));
        match self.source.mark_ready(self.pr_number).await {
            Ok(()) => self.view.message("PR is now ready for review"),
            Err(e) => self.view.message(&format!("failed to mark ready: {e}")),
        }
        self.pause().await;
    }

    async fn pause(&self) {
        tokio::time::sleep(REPORT_PAUSE).await;
    }
}

/// Spawn the background task that forwards stdin lines to the control loop.
///
/// Single producer, single consumer, capacity 1: the reader task awaits each
/// send, so a burst of lines backpressures the task instead of deadlocking or
/// dropping input. The task exits when stdin closes or the receiver drops.
#[must_use]
pub fn spawn_command_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    rx
}
