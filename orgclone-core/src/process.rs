//! Child process launching with an explicit environment overlay and timeout

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Everything needed to start one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Program to execute (looked up in PATH when not absolute)
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<OsString>,
    /// Working directory, inherited when unset
    pub current_dir: Option<PathBuf>,
    /// Variables added to the inherited environment
    pub env: BTreeMap<String, String>,
    /// Upper bound on the run time
    pub timeout: Duration,
}

impl LaunchSpec {
    /// Create a spec for `program` with no arguments
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: BTreeMap::new(),
            timeout,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the working directory
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Add an environment variable for the child only
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Captured result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Reasons a child process produced no exit status
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The executable could not be found
    #[error("executable not found: {program}")]
    NotFound {
        /// Program that was requested
        program: String,
    },

    /// The process ran past its timeout and was killed
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other spawn or wait failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs child processes described by a [`LaunchSpec`]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the process to completion and capture its output
    async fn run(&self, spec: &LaunchSpec) -> Result<ProcessOutput, LaunchError>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioRunner;

impl TokioRunner {
    /// Create a new runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, spec: &LaunchSpec) -> Result<ProcessOutput, LaunchError> {
        debug!(program = %spec.program, args = ?spec.args, timeout = ?spec.timeout, "Launching process");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = spec.current_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LaunchError::NotFound {
                    program: spec.program.clone(),
                }
            } else {
                LaunchError::Io(e)
            }
        })?;

        // Dropping the future on timeout kills the child via kill_on_drop
        let output = tokio::time::timeout(spec.timeout, child.wait_with_output())
            .await
            .map_err(|_| LaunchError::TimedOut(spec.timeout))??;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
