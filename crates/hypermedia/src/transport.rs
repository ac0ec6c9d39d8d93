//! Transport - the fetch seam of the client
//!
//! Design decisions:
//! 1. One trait, two verbs: GET a URL, POST an encoded form body
//! 2. Blocking calls - every navigation blocks until the server
//!    answers or fails, there is no queuing and no retry
//! 3. Fail fast - a connection error or non-success status aborts the
//!    navigation that triggered it. Let the caller decide.

use crate::error::{ClientError, Result};
use std::time::Duration;

/// Fetch capability used by every navigation.
///
/// Implemented by [`HttpTransport`] for real traffic; tests inject an
/// in-memory implementation instead.
pub trait Transport: Send + Sync {
    /// GET the URL, returning the response body
    fn get(&self, url: &str) -> Result<Vec<u8>>;

    /// POST a urlencoded form body to the URL, returning the response body
    fn post(&self, url: &str, body: &str) -> Result<Vec<u8>>;
}

/// Transport configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("hypermedia/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking HTTP transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    fn read_success(response: reqwest::blocking::Response) -> Result<Vec<u8>> {
        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        Self::read_success(response)
    }

    fn post(&self, url: &str, body: &str) -> Result<Vec<u8>> {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body.to_string())
            .send()?;
        Self::read_success(response)
    }
}
