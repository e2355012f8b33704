//! Pagination over the organization repository listing

use std::time::Duration;

use async_trait::async_trait;
use orgclone_core::config::MAX_PER_PAGE;
use orgclone_core::{RepositoryDescriptor, RepositorySource, RunObserver};
use tracing::{debug, info};

use crate::Result;

/// One page of the listing endpoint
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `page` (1-based) with up to `per_page` entries
    async fn fetch_page(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositoryDescriptor>>;
}

/// Collects every page of an organization's repositories
#[derive(Debug)]
pub struct RepositoryLister<S> {
    source: S,
    per_page: u32,
    page_delay: Duration,
}

impl<S: PageSource> RepositoryLister<S> {
    /// Lister with the maximum page size and a 100ms pause between pages
    pub fn new(source: S) -> Self {
        Self {
            source,
            per_page: MAX_PER_PAGE,
            page_delay: Duration::from_millis(100),
        }
    }

    /// Set the page size, clamped to 1..=100
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Set the pause between page requests
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// The wrapped page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch pages 1, 2, ... until an empty or short page
    pub async fn list(&self, org: &str) -> Result<Vec<RepositoryDescriptor>> {
        self.list_with_progress(org, &()).await
    }

    /// Like [`RepositoryLister::list`], reporting each page to `observer`
    pub async fn list_with_progress(
        &self,
        org: &str,
        observer: &dyn RunObserver,
    ) -> Result<Vec<RepositoryDescriptor>> {
        info!(org, "Fetching repositories for organization");

        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            observer.page_started(org, page);
            let page_repos = self.source.fetch_page(org, page, self.per_page).await?;
            let count = page_repos.len();
            debug!(org, page, count, "Fetched page");

            if count == 0 {
                break;
            }

            repos.extend(page_repos);
            observer.page_fetched(org, page, count);

            // A short page is the last one
            if count < self.per_page as usize {
                break;
            }

            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        info!(org, total = repos.len(), pages = page, "Total repositories found");
        Ok(repos)
    }
}

#[async_trait]
impl<S: PageSource> RepositorySource for RepositoryLister<S> {
    async fn list_repositories(
        &self,
        org: &str,
        observer: &dyn RunObserver,
    ) -> orgclone_core::Result<Vec<RepositoryDescriptor>> {
        Ok(self.list_with_progress(org, observer).await?)
    }
}
