//! SSH agent probing before SSH clones

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::process::{LaunchError, LaunchSpec, ProcessRunner};

/// How long `ssh-add -l` may take before the agent is considered unusable
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// State of the SSH agent as reported by `ssh-add -l`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshAgentStatus {
    /// Agent reachable with at least one identity
    Ready,
    /// Agent reachable but holds no identities
    NoKeys,
    /// Agent not reachable, or ssh-add missing
    Unavailable,
}

impl SshAgentStatus {
    /// Whether SSH clones are expected to authenticate
    pub fn is_ready(self) -> bool {
        self == SshAgentStatus::Ready
    }
}

impl fmt::Display for SshAgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SshAgentStatus::Ready => write!(f, "SSH agent is running with loaded keys"),
            SshAgentStatus::NoKeys => write!(
                f,
                "SSH agent is running but no keys are loaded (run: ssh-add ~/.ssh/id_ed25519)"
            ),
            SshAgentStatus::Unavailable => write!(f, "SSH agent not found or not reachable"),
        }
    }
}

/// Ask the SSH agent for its identities
///
/// `ssh-add -l` exits 0 when keys are listed, 1 when the agent has none,
/// and 2 when it cannot reach an agent.
pub async fn probe_ssh_agent(runner: &dyn ProcessRunner, ssh_add_path: &str) -> SshAgentStatus {
    let spec = LaunchSpec::new(ssh_add_path, PROBE_TIMEOUT).arg("-l");

    let status = match runner.run(&spec).await {
        Ok(output) if output.success() => SshAgentStatus::Ready,
        Ok(output) if output.code == Some(1) => SshAgentStatus::NoKeys,
        Ok(_) => SshAgentStatus::Unavailable,
        Err(LaunchError::NotFound { .. }) => SshAgentStatus::Unavailable,
        Err(e) => {
            debug!(error = %e, "ssh-add probe failed");
            SshAgentStatus::Unavailable
        }
    };

    debug!(?status, "SSH agent probed");
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use async_trait::async_trait;

    struct ExitWith(Option<i32>);

    #[async_trait]
    impl ProcessRunner for ExitWith {
        async fn run(&self, spec: &LaunchSpec) -> Result<ProcessOutput, LaunchError> {
            assert_eq!(spec.program, "ssh-add");
            assert_eq!(spec.args, vec!["-l"]);
            match self.0 {
                Some(code) => Ok(ProcessOutput {
                    code: Some(code),
                    ..Default::default()
                }),
                None => Err(LaunchError::NotFound {
                    program: spec.program.clone(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_keys_loaded() {
        assert_eq!(probe_ssh_agent(&ExitWith(Some(0)), "ssh-add").await, SshAgentStatus::Ready);
    }

    #[tokio::test]
    async fn test_no_keys() {
        let status = probe_ssh_agent(&ExitWith(Some(1)), "ssh-add").await;
        assert_eq!(status, SshAgentStatus::NoKeys);
        assert!(!status.is_ready());
        assert!(status.to_string().contains("ssh-add"));
    }

    #[tokio::test]
    async fn test_agent_unreachable() {
        assert_eq!(
            probe_ssh_agent(&ExitWith(Some(2)), "ssh-add").await,
            SshAgentStatus::Unavailable
        );
    }

    #[tokio::test]
    async fn test_ssh_add_missing() {
        assert_eq!(
            probe_ssh_agent(&ExitWith(None), "ssh-add").await,
            SshAgentStatus::Unavailable
        );
    }
}
