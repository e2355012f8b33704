//! Clone command - list an organization and clone every repository

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use orgclone_core::{AssumeYes, Config, Confirm, Pipeline, RunOptions, TokioRunner};
use orgclone_github::{ClientConfig, GitHubClient};

use crate::reporter::{ConsoleReporter, StdinConfirm};

/// Arguments for cloning an organization
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// GitHub organization name
    #[arg(required = true)]
    pub organization: String,

    /// GitHub personal access token (recommended)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory to clone repositories into (default: organization name)
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Use SSH URLs instead of HTTPS
    #[arg(long)]
    pub ssh: bool,

    /// Exclude forked repositories
    #[arg(long)]
    pub no_forks: bool,

    /// Exclude archived repositories
    #[arg(long)]
    pub no_archived: bool,

    /// Continue without asking when the SSH agent has no keys
    #[arg(short, long)]
    pub yes: bool,

    /// Print ASCII markers instead of emoji
    #[arg(long)]
    pub no_emoji: bool,
}

impl CloneArgs {
    /// Options for the pipeline derived from the flags
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            organization: self.organization.clone(),
            target_dir: self.target_dir.clone(),
            use_ssh: self.ssh,
            include_forks: !self.no_forks,
            include_archived: !self.no_archived,
            assume_yes: self.yes,
        }
    }

    /// Execute the clone command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = GitHubClient::new(ClientConfig::new(&config.github, self.token.clone()))?;
        if !client.is_authenticated() {
            println!("Warning: No GitHub token provided. API rate limits will be lower.");
        }

        let pipeline = Pipeline::new(
            Arc::new(client.into_lister()),
            Arc::new(TokioRunner::new()),
            config,
            self.run_options(),
        );

        let reporter = ConsoleReporter::new(self.no_emoji);
        let confirm: &dyn Confirm = if self.yes { &AssumeYes } else { &StdinConfirm };

        let Some(summary) = pipeline.run(&reporter, confirm).await? else {
            println!("Aborted. No repositories were cloned.");
            return Ok(());
        };

        if summary.client_missing > 0 {
            anyhow::bail!(
                "git executable '{}' not found; install git or set --git-path",
                config.clone.git_path
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: CloneArgs,
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = TestCli::parse_from([
            "orgclone",
            "netflix",
            "--target-dir",
            "./netflix-repos",
            "--ssh",
            "--no-forks",
            "--no-archived",
            "--yes",
        ]);
        let options = cli.args.run_options();

        assert_eq!(options.organization, "netflix");
        assert_eq!(options.target_dir, Some(PathBuf::from("./netflix-repos")));
        assert!(options.use_ssh);
        assert!(!options.include_forks);
        assert!(!options.include_archived);
        assert!(options.assume_yes);
    }

    #[test]
    fn test_defaults_include_everything() {
        let cli = TestCli::parse_from(["orgclone", "microsoft"]);
        let options = cli.args.run_options();

        assert!(options.target_dir.is_none());
        assert!(!options.use_ssh);
        assert!(options.include_forks);
        assert!(options.include_archived);
        assert!(!options.assume_yes);
    }

    #[test]
    fn test_organization_required() {
        assert!(TestCli::try_parse_from(["orgclone"]).is_err());
    }
}
