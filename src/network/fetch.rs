// src/network/fetch.rs

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("network access is disabled")]
    Disabled,

    #[error("unsupported URL '{url}' (only http:// and https:// are allowed)")]
    InvalidUrl { url: String },

    #[error("request timed out after {ms} ms")]
    Timeout { ms: u64 },

    #[error("response exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("{message}")]
    FetchError { message: String },
}

/// Collaborator that performs the actual request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, NetworkError>;
}

/// Only absolute http(s) URLs with a host are accepted.
pub fn is_fetchable_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty()
        }
        None => false,
    }
}

/// Fetch through `fetcher`, giving up after `timeout` and rejecting bodies
/// larger than `max_bytes`.
pub async fn fetch_bounded(
    fetcher: &dyn Fetcher,
    url: &str,
    timeout: Duration,
    max_bytes: usize,
) -> Result<String, NetworkError> {
    if !is_fetchable_url(url) {
        return Err(NetworkError::InvalidUrl {
            url: url.to_string(),
        });
    }
    debug!(url, "fetch");
    let body = tokio::time::timeout(timeout, fetcher.fetch(url))
        .await
        .map_err(|_| NetworkError::Timeout {
            ms: timeout.as_millis() as u64,
        })??;
    if body.len() > max_bytes {
        return Err(NetworkError::TooLarge { limit: max_bytes });
    }
    Ok(body)
}
