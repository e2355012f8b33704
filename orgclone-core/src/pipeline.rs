//! The sequential list → filter → clone → summarize pipeline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::git::{CloneFailure, CloneOutcome, Cloner};
use crate::process::ProcessRunner;
use crate::ssh::{probe_ssh_agent, SshAgentStatus};
use crate::{validate_org_name, Config, Exclusion, FilterOptions, RepositoryDescriptor, Result};

/// Anything that can list the repositories of an organization
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetch every repository of `org`, reporting page progress to `observer`
    async fn list_repositories(
        &self,
        org: &str,
        observer: &dyn RunObserver,
    ) -> Result<Vec<RepositoryDescriptor>>;
}

/// Answers yes/no questions put to the user
pub trait Confirm {
    /// Return true to continue
    fn confirm(&self, question: &str) -> bool;
}

/// [`Confirm`] that always answers yes
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}

/// Progress callbacks emitted while the pipeline runs
///
/// Every method has an empty default so observers only implement what they show.
pub trait RunObserver: Sync {
    /// Target directory resolved and created
    fn target_dir(&self, _path: &Path) {}

    /// Result of the SSH agent probe
    fn ssh_agent(&self, _status: SshAgentStatus) {}

    /// About to fetch the repository list
    fn listing_started(&self, _org: &str) {}

    /// About to request listing page `page` (1-based)
    fn page_started(&self, _org: &str, _page: u32) {}

    /// Listing page `page` returned `count` repositories
    fn page_fetched(&self, _org: &str, _page: u32, _count: usize) {}

    /// Listing finished with `count` repositories
    fn listed(&self, _org: &str, _count: usize) {}

    /// Repository dropped by the filter
    fn excluded(&self, _repo: &RepositoryDescriptor, _reason: Exclusion) {}

    /// Number of repositories that will be cloned
    fn planned(&self, _count: usize) {}

    /// About to clone repository `index` (1-based) of `total`
    fn clone_started(&self, _index: usize, _total: usize, _repo: &RepositoryDescriptor) {}

    /// Clone attempt finished
    fn clone_finished(&self, _repo: &RepositoryDescriptor, _outcome: &CloneOutcome) {}

    /// Run complete
    fn finished(&self, _summary: &RunSummary) {}
}

impl RunObserver for () {}

/// Caller choices for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Organization to clone
    pub organization: String,
    /// Destination root, defaults to the organization name
    pub target_dir: Option<PathBuf>,
    /// Clone over SSH instead of HTTPS
    pub use_ssh: bool,
    /// Keep forks
    pub include_forks: bool,
    /// Keep archived repositories
    pub include_archived: bool,
    /// Continue past the SSH agent warning without asking
    pub assume_yes: bool,
}

impl RunOptions {
    /// Options that clone everything of `organization` over HTTPS
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            target_dir: None,
            use_ssh: false,
            include_forks: true,
            include_archived: true,
            assume_yes: false,
        }
    }

    /// Destination root after applying the default
    pub fn resolved_target_dir(&self) -> PathBuf {
        self.target_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.organization))
    }

    /// Filter derived from the include flags
    pub fn filter(&self) -> FilterOptions {
        FilterOptions::new(self.include_forks, self.include_archived)
    }
}

/// Tally of clone outcomes for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories considered after filtering
    pub total: usize,
    /// Newly cloned
    pub cloned: usize,
    /// Skipped because the destination already existed
    pub already_present: usize,
    /// Failed for any reason
    pub failed: usize,
    /// Failures caused by a missing git executable
    pub client_missing: usize,
}

impl RunSummary {
    /// Count one outcome
    pub fn record(&mut self, outcome: &CloneOutcome) {
        self.total += 1;
        match outcome {
            CloneOutcome::Cloned => self.cloned += 1,
            CloneOutcome::AlreadyExists => self.already_present += 1,
            CloneOutcome::Failed(failure) => {
                self.failed += 1;
                if matches!(failure, CloneFailure::ClientMissing { .. }) {
                    self.client_missing += 1;
                }
            }
        }
    }

    /// Cloned plus already present
    pub fn succeeded(&self) -> usize {
        self.cloned + self.already_present
    }

    /// Whether no repository failed
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Runs one organization clone from listing to summary
pub struct Pipeline {
    source: Arc<dyn RepositorySource>,
    runner: Arc<dyn ProcessRunner>,
    cloner: Cloner,
    ssh_add_path: String,
    options: RunOptions,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("cloner", &self.cloner)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline from its collaborators
    pub fn new(
        source: Arc<dyn RepositorySource>,
        runner: Arc<dyn ProcessRunner>,
        config: &Config,
        options: RunOptions,
    ) -> Self {
        Self {
            cloner: Cloner::new(runner.clone(), &config.clone),
            source,
            runner,
            ssh_add_path: config.clone.ssh_add_path.clone(),
            options,
        }
    }

    /// Options this pipeline was built with
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Execute the run
    ///
    /// Returns `Ok(None)` when the user declined to continue after the SSH
    /// agent warning. Listing errors abort the run; clone failures are
    /// recorded in the summary and the run continues.
    pub async fn run(
        &self,
        observer: &dyn RunObserver,
        confirm: &dyn Confirm,
    ) -> Result<Option<RunSummary>> {
        let org = self.options.organization.as_str();
        validate_org_name(org)?;

        let target_dir = self.options.resolved_target_dir();
        std::fs::create_dir_all(&target_dir)?;
        let display_dir = std::fs::canonicalize(&target_dir).unwrap_or_else(|_| target_dir.clone());
        observer.target_dir(&display_dir);

        if self.options.use_ssh {
            let status = probe_ssh_agent(self.runner.as_ref(), &self.ssh_add_path).await;
            observer.ssh_agent(status);

            if !status.is_ready() {
                warn!(?status, "SSH issues detected");
                if !self.options.assume_yes && !confirm.confirm("Continue anyway?") {
                    info!("Run declined after SSH agent warning");
                    return Ok(None);
                }
            }
        }

        observer.listing_started(org);
        let repos = self.source.list_repositories(org, observer).await?;
        observer.listed(org, repos.len());

        let filter = self.options.filter();
        let mut selected = Vec::with_capacity(repos.len());
        for repo in repos {
            match filter.exclusion_reason(&repo) {
                Some(reason) => observer.excluded(&repo, reason),
                None => selected.push(repo),
            }
        }

        observer.planned(selected.len());
        info!(org = %org, count = selected.len(), "Cloning repositories");

        let mut summary = RunSummary::default();
        for (i, repo) in selected.iter().enumerate() {
            observer.clone_started(i + 1, selected.len(), repo);
            let outcome = self
                .cloner
                .clone_one(repo, &target_dir, self.options.use_ssh)
                .await;
            summary.record(&outcome);
            observer.clone_finished(repo, &outcome);
        }

        info!(
            total = summary.total,
            cloned = summary.cloned,
            already_present = summary.already_present,
            failed = summary.failed,
            "Run finished"
        );
        observer.finished(&summary);

        Ok(Some(summary))
    }
}
