//! Image byte fetching.

use crate::model::error::PreviewError;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Downloads image bytes under a size ceiling.
pub trait ByteFetcher: Send + Sync {
    /// Fetch `url`, failing if the body is larger than `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, error statuses, and bodies
    /// exceeding the ceiling.
    fn fetch(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, PreviewError>;
}

/// Blocking HTTP fetcher with a wall-clock timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, PreviewError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("threadview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PreviewError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl ByteFetcher for HttpFetcher {
    fn fetch(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, PreviewError> {
        let fetch_error = |e: reqwest::Error| PreviewError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let oversize = || PreviewError::Oversize {
            url: url.to_string(),
            limit: max_bytes,
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(fetch_error)?;

        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return Err(oversize());
        }

        // Read one byte past the ceiling so an oversize body is detected
        // without buffering all of it.
        let mut body = Vec::new();
        response
            .take(max_bytes as u64 + 1)
            .read_to_end(&mut body)?;
        if body.len() > max_bytes {
            return Err(oversize());
        }

        debug!(url, bytes = body.len(), "Fetched image");
        Ok(body)
    }
}
