//! Git operations for orgclone
//!
//! This module provides cloning through the git executable and
//! repository detection for destinations that already exist.

mod clone;
mod repo;

pub use clone::{CloneFailure, CloneOutcome, Cloner, SSH_AUTH_HINT};
pub use repo::is_git_repo;
