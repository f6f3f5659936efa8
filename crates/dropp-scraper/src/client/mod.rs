//! HTTP fetch collaborator for item sources.
//!
//! Owns timeouts, retries, and status handling so the normalizers only ever
//! see response bodies.

mod origin;

use std::time::Duration;

use dropp_core::{ItemConfig, SourceConfig, SourceKind};
use futures::future::join_all;
use reqwest::Client;

use crate::builder::RawResponse;
use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Responses and fetch errors for every configured source of one item.
#[derive(Debug, Default)]
pub struct ItemFetch {
    pub responses: Vec<RawResponse>,
    pub errors: Vec<(SourceKind, ScraperError)>,
}

/// HTTP client for storefront pages and the two JSON endpoints.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors are retried with exponential backoff up
/// to `max_retries` additional attempts.
pub struct SourceClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
}

impl SourceClient {
    /// Creates a `SourceClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches the body at `url`, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` is not an absolute http(s) URL.
    /// - [`ScraperError::RateLimited`] on HTTP 429 once retries are exhausted.
    /// - [`ScraperError::NotFound`] on HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on a network or TLS failure once retries are exhausted.
    pub async fn fetch_body(&self, url: &str, accept: &str) -> Result<String, ScraperError> {
        let parsed = origin::validate_source_url(url)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let parsed = parsed.clone();
            async move {
                let response = self
                    .client
                    .get(parsed)
                    .header(reqwest::header::ACCEPT, accept)
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScraperError::RateLimited {
                        domain: origin::extract_domain(url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound {
                        url: url.to_owned(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Fetches one configured source and tags the body with its kind.
    ///
    /// # Errors
    ///
    /// See [`SourceClient::fetch_body`].
    pub async fn fetch_source(&self, source: &SourceConfig) -> Result<RawResponse, ScraperError> {
        let body = self.fetch_body(&source.url, accept_for(source.kind)).await?;
        Ok(RawResponse::new(source.kind, body))
    }

    /// Fetches every configured source of `item` concurrently.
    ///
    /// Never fails as a whole: each source's error is returned alongside the
    /// responses that did arrive.
    pub async fn fetch_item(&self, item: &ItemConfig) -> ItemFetch {
        let results = join_all(item.sources.iter().map(|source| async move {
            (source.kind, self.fetch_source(source).await)
        }))
        .await;

        let mut fetch = ItemFetch::default();
        for (kind, result) in results {
            match result {
                Ok(response) => fetch.responses.push(response),
                Err(e) => fetch.errors.push((kind, e)),
            }
        }
        fetch
    }
}

fn accept_for(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::HtmlScrape => "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
        SourceKind::StatusJson | SourceKind::MarketplaceJson => "application/json",
    }
}
