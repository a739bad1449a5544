//! CLI for Github Hammer.
//!
//! Github Hammer is not meant to hammer GitHub, but rather a hammer for
//! making changes to a large number of GitHub repositories. It is also
//! meant as a reporting tool for gathering information from repositories.

use clap::{Parser, Subcommand};
use github_hammer::{
    build_client, load_archive_targets, run_archive, run_report, run_scanner, HammerConfig,
    RepoListOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Github Hammer - bulk changes and reporting across an organization's repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Organization to use when performing operations.
    #[arg(long, env = "GITHUB_ORGANIZATION")]
    organization: String,

    /// GitHub API token for interaction with GitHub.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set the status of a list of repositories to archived.
    ///
    /// Either a file with one repo per line, or a list of repositories as
    /// arguments, can be specified.
    Archive {
        /// Path to file containing list of repos to archive (one repo per line).
        #[arg(long)]
        file: Option<PathBuf>,

        /// Limit action to this many repositories.
        #[arg(long, default_value_t = 5000)]
        limit: usize,

        /// Repositories to archive.
        repos: Vec<String>,
    },

    /// Enable vulnerability scanning.
    Scanner {
        /// Limit action to this many repositories.
        #[arg(long, default_value_t = 5000)]
        limit: usize,
    },

    /// Display vulnerability report.
    ///
    /// Information is laid out to make triage easy; output is suitable for
    /// pasting into a document.
    Report {
        /// Include archived repositories in report.
        #[arg(long)]
        include_archived: bool,

        /// Limit report to this many repositories.
        #[arg(long, default_value_t = 5000)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Dispatches the parsed command.
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = HammerConfig::new(args.organization, args.token);
    let octocrab = build_client(&config)?;

    match args.command {
        Command::Archive { file, limit, repos } => {
            let targets = load_archive_targets(file.as_deref(), &repos)?;
            let options = RepoListOptions {
                limit,
                include_archived: false,
            };
            run_archive(&octocrab, &config, &options, &targets).await?;
        }
        Command::Scanner { limit } => {
            let options = RepoListOptions {
                limit,
                include_archived: false,
            };
            run_scanner(&octocrab, &config, &options).await?;
        }
        Command::Report {
            include_archived,
            limit,
        } => {
            let options = RepoListOptions {
                limit,
                include_archived,
            };
            run_report(&octocrab, &config, &options).await?;
        }
    }

    Ok(())
}
