//! Fork/archived filtering of the repository list

use std::fmt;

use crate::RepositoryDescriptor;

/// Why a repository was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Repository is a fork and forks are excluded
    Fork,
    /// Repository is archived and archived repositories are excluded
    Archived,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Fork => write!(f, "fork"),
            Exclusion::Archived => write!(f, "archived repo"),
        }
    }
}

/// Which kinds of repositories to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Keep forked repositories
    pub include_forks: bool,
    /// Keep archived repositories
    pub include_archived: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            include_forks: true,
            include_archived: true,
        }
    }
}

impl FilterOptions {
    /// Create filter options
    pub fn new(include_forks: bool, include_archived: bool) -> Self {
        Self {
            include_forks,
            include_archived,
        }
    }

    /// Reason the repository would be dropped, if any. Forks are checked first.
    pub fn exclusion_reason(&self, repo: &RepositoryDescriptor) -> Option<Exclusion> {
        if !self.include_forks && repo.fork {
            return Some(Exclusion::Fork);
        }
        if !self.include_archived && repo.archived {
            return Some(Exclusion::Archived);
        }
        None
    }

    /// Keep the repositories that pass, preserving order
    pub fn filter(&self, repos: Vec<RepositoryDescriptor>) -> Vec<RepositoryDescriptor> {
        repos
            .into_iter()
            .filter(|repo| self.exclusion_reason(repo).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, fork: bool, archived: bool) -> RepositoryDescriptor {
        RepositoryDescriptor::new(name, "", "")
            .with_fork(fork)
            .with_archived(archived)
    }

    fn names(repos: &[RepositoryDescriptor]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_excludes_forks_and_archived() {
        let repos = vec![
            repo("repo1", false, false),
            repo("repo2", true, false),
            repo("repo3", false, true),
        ];
        let kept = FilterOptions::new(false, false).filter(repos);
        assert_eq!(names(&kept), vec!["repo1"]);
    }

    #[test]
    fn test_include_everything_is_identity() {
        let repos = vec![
            repo("c", true, true),
            repo("a", false, false),
            repo("b", true, false),
        ];
        let kept = FilterOptions::default().filter(repos.clone());
        assert_eq!(kept, repos);
    }

    #[test]
    fn test_preserves_order() {
        let repos = vec![
            repo("z", false, false),
            repo("fork", true, false),
            repo("m", false, false),
            repo("a", false, false),
        ];
        let kept = FilterOptions::new(false, true).filter(repos);
        assert_eq!(names(&kept), vec!["z", "m", "a"]);
    }

    #[test]
    fn test_only_archived_excluded() {
        let repos = vec![repo("fork", true, false), repo("old", false, true)];
        let kept = FilterOptions::new(true, false).filter(repos);
        assert_eq!(names(&kept), vec!["fork"]);
    }

    #[test]
    fn test_exclusion_reason_prefers_fork() {
        let options = FilterOptions::new(false, false);
        assert_eq!(
            options.exclusion_reason(&repo("both", true, true)),
            Some(Exclusion::Fork)
        );
        assert_eq!(
            options.exclusion_reason(&repo("old", false, true)),
            Some(Exclusion::Archived)
        );
        assert_eq!(options.exclusion_reason(&repo("ok", false, false)), None);
    }
}
