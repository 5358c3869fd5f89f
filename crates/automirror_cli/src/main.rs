//! Automirror CLI - mirror tagged GitLab projects into a GitHub organization.

mod commands;
mod progress;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use automirror::MirrorSettings;
use automirror::sync::DEFAULT_CONCURRENCY;
use clap::Parser;
use console::{Term, style};
use tracing_subscriber::EnvFilter;

use crate::commands::mirror::{MirrorArgs, handle_mirror};

#[derive(Parser)]
#[command(name = "automirror")]
#[command(version)]
#[command(about = "Mirror tagged GitLab projects into a GitHub organization")]
#[command(
    long_about = "Automirror lists the public projects of a GitLab instance that carry a \
selector topic, creates or refreshes a same-named repository in a GitHub organization, \
and registers a push mirror from each project to its GitHub repository. Running it again \
changes nothing that is already in place."
)]
#[command(after_long_help = r#"EXAMPLES
    Mirror everything tagged with the selector topic:
        $ automirror

    Show what would be mirrored without changing anything:
        $ automirror --plan

    Dispatch without waiting (unfinished repositories are abandoned on exit):
        $ automirror --detach

    Use a different env file and fewer parallel repositories:
        $ automirror --env-file /etc/automirror.env --concurrency 4

CONFIGURATION
    Settings are read from environment variables. A .env file in the current
    directory (or the file given with --env-file) is loaded first; variables
    already set in the environment take precedence.

ENVIRONMENT VARIABLES
    GITHUB_ORGANIZATION         Destination organization
    GITHUB_USERNAME             User embedded in the push mirror URL
    GITHUB_TOKEN                Token for the GitHub API and the push mirror
    GITHUB_HOST                 Destination host (default: github.com)
    GITLAB_HOST                 Source instance, e.g. https://gitlab.example.com
    GITLAB_TOKEN                Token for the GitLab remote mirror API
    GITLAB_REPOSITORY_SELECTOR  Topic that selects projects to mirror
    MIRROR_EXCLUDE              Comma-separated source paths to skip
    MIRROR_ONLY                 Comma-separated source paths; when set, only these are mirrored
"#)]
struct Cli {
    /// List what would be mirrored without making changes
    #[arg(short = 'n', long)]
    plan: bool,

    /// Return once every repository is dispatched instead of waiting.
    ///
    /// The process exits right after dispatching, so repositories still in
    /// progress at that point are abandoned, possibly between creating the
    /// GitHub repository and registering its mirror. A later run picks them up.
    #[arg(long)]
    detach: bool,

    /// Maximum repositories processed concurrently
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    concurrency: usize,

    /// Env file loaded before reading settings
    #[arg(short = 'e', long, default_value = ".env")]
    env_file: PathBuf,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(short = 't', long)]
    timeout: Option<u64>,
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let env_file = dotenvy::from_path(&cli.env_file);

    // Initialize tracing for non-TTY mode (structured logging)
    let is_tty = Term::stdout().is_term();
    if !is_tty {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("automirror=info,automirror_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    if let Err(e) = env_file
        && !e.not_found()
    {
        tracing::warn!(path = %cli.env_file.display(), error = %e, "Could not load env file");
        if is_tty {
            eprintln!(
                "{} could not load {}: {}",
                style("warning:").yellow().bold(),
                cli.env_file.display(),
                e
            );
        }
    }

    let settings = match MirrorSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            if is_tty {
                eprintln!("{} {}", style("error:").red().bold(), e);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let shutdown = shutdown::setup_shutdown_handler();

    let args = MirrorArgs {
        plan: cli.plan,
        detach: cli.detach,
        concurrency: cli.concurrency,
        timeout: cli.timeout.map(Duration::from_secs),
    };

    handle_mirror(args, settings, shutdown).await
}
