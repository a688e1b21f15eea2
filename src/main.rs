//! ghprs binary entry point

mod cli;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use ghprs::auth::get_github_auth;
use ghprs::platform::GitHubService;
use ghprs::types::RepoId;

#[derive(Parser)]
#[command(name = "ghprs", version, about = "Show PR status by number or author")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show status for one PR (optionally watching it) or list PRs by author
    Status(StatusArgs),
}

#[derive(Args)]
struct StatusArgs {
    /// Repository as owner/repo
    repository: Option<String>,

    /// owner/repo (overrides the positional argument)
    #[arg(long)]
    repo: Option<String>,

    /// PR number (takes priority over --author)
    #[arg(long)]
    pr: Option<u64>,

    /// Author login (list that author's PRs once)
    #[arg(long)]
    author: Option<String>,

    /// Refresh every minute and notify when merge-ready; only meaningful
    /// with --pr
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status(args) => run_status(args).await,
    }
}

async fn run_status(args: StatusArgs) -> anyhow::Result<()> {
    let Some(repo_spec) = args.repo.or(args.repository) else {
        bail!("repository required: ghprs status <owner/repo>");
    };
    let repo: RepoId = repo_spec.parse()?;

    // Fail fast before any network call
    let auth = get_github_auth().await?;
    let source = GitHubService::new(&auth.token, repo)?;

    match (args.pr, args.author) {
        (Some(pr_number), _) => {
            cli::run_pr_status(&source, pr_number, args.watch).await?;
        }
        (None, Some(author)) => {
            // --watch is list-once only here, so it is ignored
            cli::run_author_listing(&source, &author).await?;
        }
        (None, None) => bail!("need --pr or --author"),
    }

    Ok(())
}
