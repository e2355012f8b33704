//! Configuration management for orgclone
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (ORGCLONE_*)
//! 3. Config file (~/.config/orgclone/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Largest page size the GitHub REST API accepts
pub const MAX_PER_PAGE: u32 = 100;

/// GitHub API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_url: String,

    /// Number of repositories requested per page
    pub per_page: u32,

    /// Pause between page requests
    #[serde(with = "humantime_serde")]
    pub page_delay: Duration,

    /// Timeout for a single page request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            per_page: MAX_PER_PAGE,
            page_delay: Duration::from_millis(100),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Clone-related settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CloneConfig {
    /// Path to the git executable
    pub git_path: String,

    /// Upper bound for a single `git clone`
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Value for GIT_SSH_COMMAND when cloning over SSH
    pub ssh_command: String,

    /// Path to the ssh-add executable used for the agent probe
    pub ssh_add_path: String,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            git_path: "git".to_string(),
            timeout: Duration::from_secs(300), // 5 minute default timeout
            ssh_command: "ssh -o StrictHostKeyChecking=no -o BatchMode=yes".to_string(),
            ssh_add_path: "ssh-add".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API configuration
    pub github: GitHubConfig,

    /// Clone configuration
    pub clone: CloneConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/orgclone/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("orgclone").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - ORGCLONE_API_URL: Base URL of the GitHub API
    /// - ORGCLONE_GIT_PATH: Path to git executable
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_url) = std::env::var("ORGCLONE_API_URL") {
            self.github.api_url = api_url;
        }

        if let Ok(git_path) = std::env::var("ORGCLONE_GIT_PATH") {
            self.clone.git_path = git_path;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, api_url: Option<String>, git_path: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.github.api_url = url;
        }

        if let Some(path) = git_path {
            self.clone.git_path = path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults. An explicit `path`
    /// replaces the default file location and must exist.
    pub fn load_with_overrides(
        path: Option<&Path>,
        api_url: Option<String>,
        git_path: Option<String>,
    ) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        let config = base
            .with_env_overrides()
            .with_cli_overrides(api_url, git_path);
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the API or the cloner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.github.per_page == 0 || self.github.per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "github.per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.github.per_page
            )));
        }

        url::Url::parse(&self.github.api_url).map_err(|e| {
            Error::Config(format!("Invalid github.api_url '{}': {}", self.github.api_url, e))
        })?;

        if self.clone.timeout.is_zero() {
            return Err(Error::Config("clone.timeout must be greater than zero".to_string()));
        }

        Ok(())
    }
}
