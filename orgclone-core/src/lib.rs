//! Orgclone Core - Core library for cloning a whole hosting organization
//!
//! This crate provides the repository model, filtering, the git cloner and
//! the sequential pipeline that ties listing, filtering and cloning together.

pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod model;
pub mod pipeline;
pub mod process;
pub mod ssh;

pub use config::{CloneConfig, Config, GitHubConfig};
pub use error::{Error, Result};
pub use filter::{Exclusion, FilterOptions};
pub use git::{CloneFailure, CloneOutcome, Cloner};
pub use model::{validate_org_name, RepositoryDescriptor};
pub use pipeline::{
    AssumeYes, Confirm, Pipeline, RepositorySource, RunObserver, RunOptions, RunSummary,
};
pub use process::{LaunchError, LaunchSpec, ProcessOutput, ProcessRunner, TokioRunner};
pub use ssh::{probe_ssh_agent, SshAgentStatus};
