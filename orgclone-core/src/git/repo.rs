//! Git repository detection

use std::path::Path;

use git2::Repository;

/// Check whether `path` is itself the root of a git repository
///
/// Unlike discovery this does not search parent directories, so a plain
/// directory inside the target tree is reported as not a repository.
pub fn is_git_repo(path: impl AsRef<Path>) -> bool {
    Repository::open(path.as_ref()).is_ok()
}
