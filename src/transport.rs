//! Network transport for fetching external resources
//!
//! The cache issues one GET-style request per uncached URL through the
//! `Transport` trait, which keeps the HTTP layer swappable for tests. The
//! production implementation is a thin wrapper around reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Errors that can occur while performing a request
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be completed (connection, DNS, timeout, ...)
    ///
    /// No response was received, so there is no body to report.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("server returned {status}")]
    Status {
        /// The response status code
        status: StatusCode,
        /// The response body text, possibly empty
        body: String,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

/// Performs the network request for a single URL
///
/// Implementations return the raw response body text on success. A non-2xx
/// response is a failure and must surface its body through
/// `TransportError::Status` so callers can report what the server said.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the response body text
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Transport backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport reusing an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status { status, body });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_status() {
        let err = TransportError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "bad request".to_string(),
        };
        assert!(err.to_string().contains("400"));
    }
}
