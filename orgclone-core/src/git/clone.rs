//! Cloning a single repository through the git executable

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::CloneConfig;
use crate::process::{LaunchError, LaunchSpec, ProcessRunner};
use crate::RepositoryDescriptor;

use super::repo::is_git_repo;

/// Guidance appended to SSH permission failures
pub const SSH_AUTH_HINT: &str =
    "Make sure ssh-agent is running and your key is loaded (try: ssh-add ~/.ssh/id_ed25519)";

/// Why a clone did not produce a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneFailure {
    /// The git executable could not be found
    ClientMissing {
        /// Program that was requested
        program: String,
    },
    /// git ran past the clone timeout and was killed
    Timeout(Duration),
    /// git exited unsuccessfully
    Exit {
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Trimmed standard error of git
        stderr: String,
        /// Whether the failure looks like SSH key authentication
        ssh_auth: bool,
    },
    /// The repository name cannot be used as a directory name
    InvalidName(String),
    /// Spawning or waiting on git failed for another reason
    Launch(String),
}

impl fmt::Display for CloneFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneFailure::ClientMissing { program } => {
                write!(f, "client not installed: '{}' is not in PATH", program)
            }
            CloneFailure::Timeout(after) => write!(f, "timeout after {}s", after.as_secs()),
            CloneFailure::Exit {
                stderr,
                ssh_auth: true,
                ..
            } => write!(f, "SSH authentication failed. {}: {}", SSH_AUTH_HINT, stderr),
            CloneFailure::Exit { code, stderr, .. } => match code {
                Some(code) => write!(f, "git exited with status {}: {}", code, stderr),
                None => write!(f, "git was terminated: {}", stderr),
            },
            CloneFailure::InvalidName(name) => write!(f, "invalid repository name '{}'", name),
            CloneFailure::Launch(msg) => write!(f, "failed to run git: {}", msg),
        }
    }
}

/// Result of attempting to clone one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// git clone completed
    Cloned,
    /// The destination already existed; git was not run
    AlreadyExists,
    /// The clone failed
    Failed(CloneFailure),
}

impl CloneOutcome {
    /// Cloned and already-present both count as success
    pub fn is_success(&self) -> bool {
        !matches!(self, CloneOutcome::Failed(_))
    }
}

/// Clones repositories by launching `git clone`
#[derive(Clone)]
pub struct Cloner {
    runner: Arc<dyn ProcessRunner>,
    git_path: String,
    timeout: Duration,
    ssh_command: String,
}

impl std::fmt::Debug for Cloner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloner")
            .field("git_path", &self.git_path)
            .field("timeout", &self.timeout)
            .field("ssh_command", &self.ssh_command)
            .finish_non_exhaustive()
    }
}

impl Cloner {
    /// Create a cloner using the given runner and clone settings
    pub fn new(runner: Arc<dyn ProcessRunner>, config: &CloneConfig) -> Self {
        Self {
            runner,
            git_path: config.git_path.clone(),
            timeout: config.timeout,
            ssh_command: config.ssh_command.clone(),
        }
    }

    /// Destination directory for `repo` under `target_dir`
    pub fn destination(target_dir: &Path, repo: &RepositoryDescriptor) -> PathBuf {
        target_dir.join(&repo.name)
    }

    /// Build the launch spec for cloning `repo` into `dest`
    pub fn launch_spec(&self, repo: &RepositoryDescriptor, dest: &Path, use_ssh: bool) -> LaunchSpec {
        let mut spec = LaunchSpec::new(&self.git_path, self.timeout)
            .arg("clone")
            .arg(repo.clone_url_for(use_ssh))
            .arg(dest.as_os_str());

        if use_ssh {
            // No host-key or passphrase prompts; a prompt would hang until the timeout
            spec = spec.env("GIT_SSH_COMMAND", &self.ssh_command);
        }

        spec
    }

    /// Clone `repo` into `target_dir/<name>` unless that path already exists
    pub async fn clone_one(
        &self,
        repo: &RepositoryDescriptor,
        target_dir: &Path,
        use_ssh: bool,
    ) -> CloneOutcome {
        if !is_valid_dir_name(&repo.name) {
            return CloneOutcome::Failed(CloneFailure::InvalidName(repo.name.clone()));
        }

        let dest = Self::destination(target_dir, repo);

        if dest.exists() {
            if !is_git_repo(&dest) {
                warn!(path = %dest.display(), "Destination exists but is not a git repository");
            }
            debug!(repo = %repo.name, "Destination exists, skipping clone");
            return CloneOutcome::AlreadyExists;
        }

        let spec = self.launch_spec(repo, &dest, use_ssh);
        debug!(repo = %repo.name, url = %repo.clone_url_for(use_ssh), "Cloning");

        match self.runner.run(&spec).await {
            Ok(output) if output.success() => CloneOutcome::Cloned,
            Ok(output) => {
                let stderr = output.stderr.trim().to_string();
                let ssh_auth = use_ssh && stderr.contains("Permission denied");
                CloneOutcome::Failed(CloneFailure::Exit {
                    code: output.code,
                    stderr,
                    ssh_auth,
                })
            }
            Err(LaunchError::NotFound { program }) => {
                CloneOutcome::Failed(CloneFailure::ClientMissing { program })
            }
            Err(LaunchError::TimedOut(after)) => CloneOutcome::Failed(CloneFailure::Timeout(after)),
            Err(LaunchError::Io(e)) => CloneOutcome::Failed(CloneFailure::Launch(e.to_string())),
        }
    }
}

/// Repository names become a single path component
fn is_valid_dir_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every launch and answers with a canned result
    struct FakeRunner {
        launches: Mutex<Vec<LaunchSpec>>,
        respond: fn() -> Result<ProcessOutput, LaunchError>,
    }

    impl FakeRunner {
        fn new(respond: fn() -> Result<ProcessOutput, LaunchError>) -> Arc<Self> {
            Arc::new(Self {
                launches: Mutex::new(Vec::new()),
                respond,
            })
        }

        fn launches(&self) -> Vec<LaunchSpec> {
            self.launches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(&self, spec: &LaunchSpec) -> Result<ProcessOutput, LaunchError> {
            self.launches.lock().unwrap().push(spec.clone());
            (self.respond)()
        }
    }

    fn exit_ok() -> Result<ProcessOutput, LaunchError> {
        Ok(ProcessOutput {
            code: Some(0),
            ..Default::default()
        })
    }

    fn permission_denied() -> Result<ProcessOutput, LaunchError> {
        Ok(ProcessOutput {
            code: Some(128),
            stdout: String::new(),
            stderr: "git@github.com: Permission denied (publickey).\n".to_string(),
        })
    }

    fn repo1() -> RepositoryDescriptor {
        RepositoryDescriptor::new(
            "repo1",
            "https://github.com/org/repo1.git",
            "git@github.com:org/repo1.git",
        )
    }

    fn cloner(runner: Arc<FakeRunner>) -> Cloner {
        Cloner::new(runner, &CloneConfig::default())
    }

    #[tokio::test]
    async fn test_clone_success() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(exit_ok);

        let outcome = cloner(runner.clone()).clone_one(&repo1(), dir.path(), false).await;

        assert_eq!(outcome, CloneOutcome::Cloned);
        let launches = runner.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].program, "git");
        assert_eq!(launches[0].args[0], "clone");
        assert_eq!(launches[0].args[1], "https://github.com/org/repo1.git");
        assert_eq!(launches[0].args[2], dir.path().join("repo1").as_os_str());
        assert_eq!(launches[0].timeout, Duration::from_secs(300));
        assert!(launches[0].env.is_empty());
    }

    #[tokio::test]
    async fn test_existing_destination_skips_git() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("repo1")).unwrap();
        let runner = FakeRunner::new(exit_ok);

        let outcome = cloner(runner.clone()).clone_one(&repo1(), dir.path(), false).await;

        assert_eq!(outcome, CloneOutcome::AlreadyExists);
        assert!(outcome.is_success());
        assert!(runner.launches().is_empty());
    }

    #[tokio::test]
    async fn test_ssh_sets_batch_mode_and_ssh_url() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(exit_ok);

        cloner(runner.clone()).clone_one(&repo1(), dir.path(), true).await;

        let launches = runner.launches();
        assert_eq!(launches[0].args[1], "git@github.com:org/repo1.git");
        let ssh_command = launches[0].env.get("GIT_SSH_COMMAND").unwrap();
        assert!(ssh_command.contains("StrictHostKeyChecking=no"));
        assert!(ssh_command.contains("BatchMode=yes"));
    }

    #[tokio::test]
    async fn test_permission_denied_over_ssh_adds_hint() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(permission_denied);

        let outcome = cloner(runner).clone_one(&repo1(), dir.path(), true).await;

        let CloneOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(failure, CloneFailure::Exit { ssh_auth: true, .. }));
        let reason = failure.to_string();
        assert!(reason.contains("ssh-add"));
        assert!(reason.contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_permission_denied_over_https_has_no_hint() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(permission_denied);

        let outcome = cloner(runner).clone_one(&repo1(), dir.path(), false).await;

        let CloneOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(failure, CloneFailure::Exit { ssh_auth: false, code: Some(128), .. }));
        assert!(!failure.to_string().contains("ssh-add"));
    }

    #[tokio::test]
    async fn test_missing_git_is_client_missing() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(|| {
            Err(LaunchError::NotFound {
                program: "git".to_string(),
            })
        });

        let outcome = cloner(runner).clone_one(&repo1(), dir.path(), false).await;

        assert_eq!(
            outcome,
            CloneOutcome::Failed(CloneFailure::ClientMissing {
                program: "git".to_string()
            })
        );
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(|| Err(LaunchError::TimedOut(Duration::from_secs(300))));

        let outcome = cloner(runner).clone_one(&repo1(), dir.path(), false).await;

        let CloneOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure, CloneFailure::Timeout(Duration::from_secs(300)));
        assert!(failure.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn test_path_traversal_name_rejected() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new(exit_ok);
        let repo = RepositoryDescriptor::new("../escape", "https://x/e.git", "git@x:e.git");

        let outcome = cloner(runner.clone()).clone_one(&repo, dir.path(), false).await;

        assert!(matches!(outcome, CloneOutcome::Failed(CloneFailure::InvalidName(_))));
        assert!(runner.launches().is_empty());
    }
}
