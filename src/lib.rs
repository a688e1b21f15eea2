//! ghprs - watch GitHub pull request status and merge from the terminal
//!
//! The library carries the core logic: the pure merge-readiness evaluation
//! ([`readiness`]), the review and check summarizers ([`review`], [`checks`]),
//! and the watch-loop state machine ([`watch`]). GitHub access, credential
//! resolution, and notifications are collaborators behind small seams
//! ([`platform`], [`auth`], [`notify`]); rendering lives in the binary.

pub mod auth;
pub mod checks;
pub mod error;
pub mod notify;
pub mod platform;
pub mod readiness;
pub mod review;
pub mod types;
pub mod watch;

pub use error::{Error, Result};
