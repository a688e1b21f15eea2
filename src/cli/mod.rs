//! CLI commands and terminal presentation

mod status;
mod style;

pub use status::{run_author_listing, run_pr_status};
