use dropp_core::SourceKind;
use thiserror::Error;

/// Failures of the HTTP fetch collaborator.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid source URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Per-source normalization failures. Always recoverable: the affected
/// snapshot fields are left untouched and the build carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("malformed {kind} data: {reason}")]
    MalformedSourceData { kind: SourceKind, reason: String },

    #[error("expected element '{selector}' not found in scraped page")]
    MissingExpectedElement { selector: String },

    #[error("no response supplied for configured source {kind}")]
    MissingResponse { kind: SourceKind },
}

impl NormalizeError {
    pub(crate) fn malformed(kind: SourceKind, err: &serde_json::Error) -> Self {
        NormalizeError::MalformedSourceData {
            kind,
            reason: err.to_string(),
        }
    }
}
