//! GitHub REST client for the organization repository listing

use std::time::Duration;

use async_trait::async_trait;
use orgclone_core::{GitHubConfig, RepositoryDescriptor};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use crate::lister::{PageSource, RepositoryLister};
use crate::{Error, Result};

/// Explicit settings for [`GitHubClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API
    pub api_url: String,
    /// Token sent as a bearer credential, if any
    pub token: Option<String>,
    /// Repositories per page
    pub per_page: u32,
    /// Pause between page requests
    pub page_delay: Duration,
    /// Timeout for each request
    pub request_timeout: Duration,
    /// User-Agent header, required by the GitHub API
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("per_page", &self.per_page)
            .field("page_delay", &self.page_delay)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Build client settings from the loaded configuration and an optional token
    pub fn new(config: &GitHubConfig, token: Option<String>) -> Self {
        // Blank tokens behave like no token
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Self {
            api_url: config.api_url.clone(),
            token,
            per_page: config.per_page,
            page_delay: config.page_delay,
            request_timeout: config.request_timeout,
            user_agent: format!("orgclone/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// GitHub API client for listing organization repositories
pub struct GitHubClient {
    http: reqwest::Client,
    config: ClientConfig,
    base: Url,
}

impl GitHubClient {
    /// Create a client from explicit settings
    ///
    /// Without a token requests are unauthenticated and subject to lower
    /// rate limits; callers can check [`GitHubClient::is_authenticated`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", config.api_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?,
        );

        if let Some(ref token) = config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::Config("GitHub token contains invalid characters".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        } else {
            warn!("No GitHub token provided. API rate limits will be lower.");
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        info!(api_url = %config.api_url, authenticated = config.token.is_some(), "Created GitHub client");

        Ok(Self { http, config, base })
    }

    /// Whether requests carry a token
    pub fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Wrap this client in a paginating lister using its page settings
    pub fn into_lister(self) -> RepositoryLister<GitHubClient> {
        let per_page = self.config.per_page;
        let page_delay = self.config.page_delay;
        RepositoryLister::new(self)
            .with_per_page(per_page)
            .with_page_delay(page_delay)
    }

    /// URL of one page of `GET /orgs/{org}/repos`
    pub fn page_url(&self, org: &str, page: u32, per_page: u32) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API URL cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(["orgs", org, "repos"]);

        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string())
            .append_pair("type", "all")
            .append_pair("sort", "updated")
            .append_pair("direction", "desc");

        Ok(url)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource for GitHubClient {
    async fn fetch_page(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositoryDescriptor>> {
        let url = self.page_url(org, page, per_page)?;
        debug!(org, page, per_page, "Fetching repository page");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        check_status(org, status, body.as_str())?;

        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Failed to parse repository page {}: {}", page, e)))
    }
}

/// Map a listing response status to the error taxonomy
fn check_status(org: &str, status: StatusCode, body: &str) -> Result<()> {
    match status {
        StatusCode::NOT_FOUND => Err(Error::NotFound(org.to_string())),
        StatusCode::FORBIDDEN => Err(Error::RateLimited),
        s if !s.is_success() => Err(Error::Api {
            status: s.as_u16(),
            body: body.to_string(),
        }),
        _ => Ok(()),
    }
}
