//! # sheetview-http
//!
//! Read-only client for publicly shared spreadsheets.
//!
//! Rows are fetched through the Google Visualization query endpoint
//! (`/gviz/tq`), worksheets are discovered through a metadata endpoint with a
//! synthetic single-worksheet fallback. Supports HTTP/2 via ALPN negotiation
//! with fallback to HTTP/1.1.

mod discovery;
pub mod gviz;
mod source;

pub use discovery::parse_worksheets;
pub use source::{Endpoints, GvizSource, DEFAULT_BASE_URL, DEFAULT_DISCOVERY_URL};

use reqwest::Client;
use sheetview_core::{NetworkFailure, ViewError, ViewResult};
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for text endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Constructs a client with the 30-second default timeout.
    ///
    /// # Errors
    ///
    /// Returns a transport `ViewError::Network` if building the underlying
    /// HTTP client fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetview_http::HttpClient;
    /// let client = HttpClient::new().expect("failed to create HttpClient");
    /// ```
    pub fn new() -> ViewResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Constructs a client with a custom per-request timeout.
    ///
    /// ```
    /// use std::time::Duration;
    /// let client = sheetview_http::HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
    /// assert_eq!(client.timeout(), Duration::from_secs(5));
    /// ```
    pub fn with_timeout(timeout: Duration) -> ViewResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| ViewError::network(NetworkFailure::Transport, e.to_string()))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with `query` parameters and return the body as text.
    ///
    /// # Errors
    ///
    /// Timeouts, transport failures and non-success statuses all map to
    /// `ViewError::Network` with the matching [`NetworkFailure`] kind.
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> ViewResult<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewError::network(
                NetworkFailure::Status(status.as_u16()),
                format!(
                    "{url} answered {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        response.text().await.map_err(|e| self.classify(&e))
    }

    fn classify(&self, err: &reqwest::Error) -> ViewError {
        let kind = if err.is_timeout() {
            NetworkFailure::Timeout
        } else if let Some(status) = err.status() {
            NetworkFailure::Status(status.as_u16())
        } else {
            NetworkFailure::Transport
        };
        let message = match kind {
            NetworkFailure::Timeout => format!("no response within {:?}", self.timeout),
            _ => err.to_string(),
        };
        ViewError::network(kind, message)
    }
}
