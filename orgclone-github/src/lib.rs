//! Orgclone GitHub - organization repository listing
//!
//! This crate pages through the GitHub REST API to collect every repository
//! of an organization and exposes the result as a
//! [`orgclone_core::RepositorySource`].

mod client;
mod error;
mod lister;

pub use client::{ClientConfig, GitHubClient};
pub use error::{Error, Result};
pub use lister::{PageSource, RepositoryLister};
