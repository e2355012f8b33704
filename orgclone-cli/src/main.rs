//! Orgclone CLI - Clone every repository of a GitHub organization

mod commands;
mod reporter;

use std::path::PathBuf;

use clap::Parser;
use orgclone_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::CloneArgs;

/// Clone all repositories from a GitHub organization
#[derive(Parser, Debug)]
#[command(name = "orgclone")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  orgclone microsoft
  orgclone facebook --token your_github_token
  orgclone google --target-dir ./google-repos --ssh
  orgclone netflix --no-forks --no-archived")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/orgclone/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the GitHub API (overrides config and env)
    #[arg(long, env = "ORGCLONE_API_URL")]
    api_url: Option<String>,

    /// Path to git executable (overrides config and env)
    #[arg(long, env = "ORGCLONE_GIT_PATH")]
    git_path: Option<String>,

    #[command(flatten)]
    args: CloneArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load configuration with overrides
    let config = Config::load_with_overrides(
        cli.config.as_deref(),
        cli.api_url.clone(),
        cli.git_path.clone(),
    )?;

    if cli.verbose {
        tracing::info!(
            api_url = %config.github.api_url,
            git_path = %config.clone.git_path,
            "Configuration loaded"
        );
    }

    cli.args.execute(&config).await
}
