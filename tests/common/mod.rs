//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_source;

use std::sync::Mutex;

use ghprs::notify::Notifier;
use ghprs::types::{CheckRun, PrSnapshot, ReviewSubmission, ReviewVerdict, StatusReport};
use ghprs::watch::StatusView;

/// An open, clean, non-draft snapshot; tweak fields per test.
pub fn open_clean_snapshot(number: u64) -> PrSnapshot {
    PrSnapshot {
        number,
        title: format!("PR {number}"),
        body: Some("PR body".to_string()),
        state: "open".to_string(),
        draft: false,
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        author: "alice".to_string(),
        head_sha: "abc123".to_string(),
        head_ref: format!("feature-{number}"),
        mergeable: Some(true),
        mergeable_state: "clean".to_string(),
        node_id: Some(format!("PR_node_{number}")),
    }
}

pub fn approval(reviewer: &str) -> ReviewSubmission {
    ReviewSubmission::new(reviewer, ReviewVerdict::Approved)
}

pub fn passing_check(name: &str) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status: "completed".to_string(),
        conclusion: Some("success".to_string()),
        html_url: None,
    }
}

/// Notifier that records every message it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// View that records messages and rendered decisions instead of printing
#[derive(Default)]
pub struct RecordingView {
    messages: Mutex<Vec<String>>,
    rendered: Mutex<Vec<StatusReport>>,
}

impl RecordingView {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }
}

impl StatusView for RecordingView {
    fn render(&self, report: &StatusReport) {
        self.rendered.lock().unwrap().push(report.clone());
    }

    fn message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}
