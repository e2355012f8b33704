//! Repository metadata as returned by the organization listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One repository of an organization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryDescriptor {
    /// Repository name, unique within the organization
    pub name: String,

    /// HTTPS clone URL
    pub clone_url: String,

    /// SSH clone URL
    pub ssh_url: String,

    /// Whether the repository is a fork
    #[serde(default)]
    pub fork: bool,

    /// Whether the repository is archived
    #[serde(default)]
    pub archived: bool,

    /// Short description, if any
    #[serde(default)]
    pub description: Option<String>,

    /// Last update time reported by the provider
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RepositoryDescriptor {
    /// Create a descriptor with the essential fields only
    pub fn new(
        name: impl Into<String>,
        clone_url: impl Into<String>,
        ssh_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            clone_url: clone_url.into(),
            ssh_url: ssh_url.into(),
            fork: false,
            archived: false,
            description: None,
            updated_at: None,
        }
    }

    /// Mark the descriptor as a fork
    pub fn with_fork(mut self, fork: bool) -> Self {
        self.fork = fork;
        self
    }

    /// Mark the descriptor as archived
    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// URL to hand to `git clone`
    pub fn clone_url_for(&self, use_ssh: bool) -> &str {
        if use_ssh {
            &self.ssh_url
        } else {
            &self.clone_url
        }
    }
}

/// Check that an organization name is safe to use in a URL path and as a directory
pub fn validate_org_name(org: &str) -> Result<()> {
    if org.is_empty() {
        return Err(Error::Config("Organization name must not be empty".to_string()));
    }

    let valid = org
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && org != "."
        && org != "..";

    if !valid {
        return Err(Error::Config(format!(
            "Invalid organization name: '{}'. Expected letters, digits, '-', '_' or '.'",
            org
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"{
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "clone_url": "https://github.com/octocat/Hello-World.git",
            "ssh_url": "git@github.com:octocat/Hello-World.git",
            "fork": true,
            "archived": false,
            "description": null,
            "updated_at": "2011-01-26T19:14:43Z"
        }"#;

        let repo: RepositoryDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "Hello-World");
        assert!(repo.fork);
        assert!(!repo.archived);
        assert!(repo.description.is_none());
        assert_eq!(
            repo.updated_at.unwrap().to_rfc3339(),
            "2011-01-26T19:14:43+00:00"
        );
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let json = r#"{"name": "r", "clone_url": "https://x/r.git", "ssh_url": "git@x:r.git"}"#;
        let repo: RepositoryDescriptor = serde_json::from_str(json).unwrap();
        assert!(!repo.fork);
        assert!(!repo.archived);
    }

    #[test]
    fn test_clone_url_selection() {
        let repo = RepositoryDescriptor::new(
            "repo1",
            "https://github.com/org/repo1.git",
            "git@github.com:org/repo1.git",
        );
        assert_eq!(repo.clone_url_for(false), "https://github.com/org/repo1.git");
        assert_eq!(repo.clone_url_for(true), "git@github.com:org/repo1.git");
    }

    #[test]
    fn test_validate_org_name() {
        assert!(validate_org_name("rust-lang").is_ok());
        assert!(validate_org_name("my_org.io").is_ok());
        assert!(validate_org_name("").is_err());
        assert!(validate_org_name("..").is_err());
        assert!(validate_org_name("org/../etc").is_err());
        assert!(validate_org_name("org name").is_err());
    }
}
