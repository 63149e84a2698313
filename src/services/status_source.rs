use crate::models::StatusSnapshot;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a status snapshot
#[derive(Error, Debug)]
pub enum StatusFetchError {
    #[error("status endpoint returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("fetch timed out after {0:?}")]
    TimedOut(Duration),
}

/// Source of ingestion status snapshots.
///
/// The poll loop is written against this seam so tests can script snapshot
/// sequences without a network; [`HttpStatusSource`] is the production
/// implementation.
pub trait StatusSource: Send + Sync + 'static {
    /// Fetch the pipeline's current aggregate status.
    fn fetch_status(
        &self,
    ) -> impl Future<Output = Result<StatusSnapshot, StatusFetchError>> + Send;
}

/// Status source backed by the pipeline's HTTP endpoint.
///
/// Performs a plain unauthenticated `GET` and deserializes the JSON body.
/// Timeouts are enforced by the poll loop, not here, so the per-fetch
/// budget always tracks the configured poll interval.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusSource {
    /// Create a new source polling the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// The endpoint this source polls.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot, StatusFetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusFetchError::HttpStatus(status));
        }

        Ok(response.json::<StatusSnapshot>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_retained() {
        let source = HttpStatusSource::new("http://127.0.0.1:8181/api/ingestion/status");
        assert_eq!(source.url(), "http://127.0.0.1:8181/api/ingestion/status");
    }

    #[test]
    fn test_error_display() {
        let err = StatusFetchError::TimedOut(Duration::from_secs(2));
        assert!(err.to_string().contains("timed out"));

        let err = StatusFetchError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("503"));
    }
}
